//! Decoder for the directory table of raw PS2 memory-card images.
//!
//! The card is never mutated. [`parse`] works over an in-memory image and
//! cannot fail; [`parse_reader`] and [`parse_file`] read only the pages they
//! need and surface I/O failures as [`Error::Io`] without returning partial
//! listings.

pub mod card;
pub mod dir_entry;
mod error;
pub mod name;
pub mod scan;
pub mod source;
pub mod superblock;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

pub use card::Memcard;
pub use dir_entry::{DirectoryEntry, EntryKind, Mode, SaveRecord};
pub use error::Error;
pub use scan::{Locator, ScanOptions};
pub use source::{CardSource, ReaderSource, SliceSource};
pub use superblock::Superblock;

/// Size of one page and of one directory slot.
pub const PAGE_SIZE: usize = 512;

/// Lists the saves of `image` using the default heuristic scan.
pub fn parse(image: &[u8]) -> Vec<DirectoryEntry> {
    parse_with(image, &ScanOptions::default())
}

pub fn parse_with(image: &[u8], options: &ScanOptions) -> Vec<DirectoryEntry> {
    let mut source = SliceSource::new(image);
    match scan::scan(&mut source, options) {
        Ok(entries) => entries,
        Err(never) => match never {},
    }
}

pub fn parse_reader<R: Read + Seek>(
    reader: R,
    options: &ScanOptions,
) -> Result<Vec<DirectoryEntry>, Error> {
    let mut source = ReaderSource::new(reader)?;
    Ok(scan::scan(&mut source, options)?)
}

pub fn parse_file(path: impl AsRef<Path>, options: &ScanOptions) -> Result<Vec<DirectoryEntry>, Error> {
    let path = path.as_ref();
    log::debug!("parsing memory card: {}", path.display());
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), options)
}
