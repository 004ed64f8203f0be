use std::path::Path;

use crate::superblock::{read_magic, Superblock};
use crate::{parse_with, DirectoryEntry, Error, ScanOptions};

/// An in-memory card image.
#[derive(Clone, Debug)]
pub struct Memcard {
    data: Vec<u8>,
}

impl Memcard {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Reads the whole image; the file is closed before this returns.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let data = std::fs::read(path)?;
        Ok(Self::new(data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The card-type magic, trimmed. Empty for blank images.
    pub fn magic(&self) -> String {
        read_magic(&self.data)
    }

    pub fn superblock(&self) -> Option<Superblock> {
        Superblock::parse(&self.data)
    }

    pub fn saves(&self, options: &ScanOptions) -> Vec<DirectoryEntry> {
        parse_with(&self.data, options)
    }
}

