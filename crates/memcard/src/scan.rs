//! Locating and scanning the directory table.
//!
//! Two strategies are available. The heuristic scan tries a fixed list of
//! candidate offsets and keeps the first region that yields at least one
//! valid entry. The superblock scan follows `alloc_offset` and
//! `rootdir_cluster` from the card header instead.

use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, log_enabled, warn, Level};
use serde::{Deserialize, Serialize};

use crate::dir_entry::{DirectoryEntry, Mode, LENGTH_OFFSET, MODE_OFFSET, NAME_OFFSET};
use crate::name::{decode_ascii_name, decode_magic, decode_name, is_placeholder_name, NAME_LEN};
use crate::source::CardSource;
use crate::superblock::{Superblock, MAGIC_LEN};
use crate::{Error, PAGE_SIZE};

/// Page 13 of a standard card, then two fallbacks.
pub const DEFAULT_OFFSETS: [u64; 3] = [0x1A00, 0x2000, 0x4000];
pub const DEFAULT_MAX_SLOTS: usize = 100;
/// Exclusive upper bound on a plausible size or child count.
pub const DEFAULT_MAX_LENGTH: u32 = 10 * 1024 * 1024;
/// Sanity bound of the superblock scan, inclusive.
pub const SUPERBLOCK_MAX_LENGTH: u32 = 1_000_000_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    #[default]
    Heuristic,
    Superblock,
    /// Superblock scan on formatted cards, heuristic scan otherwise or when
    /// the superblock directory is empty.
    Auto,
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "heuristic" => Ok(Locator::Heuristic),
            "superblock" => Ok(Locator::Superblock),
            "auto" => Ok(Locator::Auto),
            _ => Err(Error::UnknownLocator(value.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Candidate directory offsets, in priority order.
    pub offsets: Vec<u64>,
    pub max_slots: usize,
    pub max_length: u32,
    pub locator: Locator,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            offsets: DEFAULT_OFFSETS.to_vec(),
            max_slots: DEFAULT_MAX_SLOTS,
            max_length: DEFAULT_MAX_LENGTH,
            locator: Locator::default(),
        }
    }
}

impl ScanOptions {
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }
}

/// Runs the strategy selected by `options.locator`.
pub fn scan<S: CardSource>(
    source: &mut S,
    options: &ScanOptions,
) -> Result<Vec<DirectoryEntry>, S::Error> {
    log_header(source)?;

    let entries = match options.locator {
        Locator::Heuristic => scan_candidates(source, options)?,
        Locator::Superblock => scan_superblock(source, options)?,
        Locator::Auto => {
            let formatted = read_superblock(source)?
                .as_ref()
                .is_some_and(Superblock::is_formatted);
            let entries = if formatted {
                scan_superblock(source, options)?
            } else {
                Vec::new()
            };
            if entries.is_empty() {
                debug!("falling back to heuristic directory scan");
                scan_candidates(source, options)?
            } else {
                entries
            }
        }
    };

    if entries.is_empty() {
        warn!("No saves found in memory card");
    }
    Ok(entries)
}

/// Probes each candidate offset and returns the entries of the first one
/// that yields anything. Candidates are never merged.
pub fn scan_candidates<S: CardSource>(
    source: &mut S,
    options: &ScanOptions,
) -> Result<Vec<DirectoryEntry>, S::Error> {
    let len = source.len();

    for &dir_start in &options.offsets {
        if dir_start >= len {
            debug!("skipping directory offset {dir_start:#x}: past end of image");
            continue;
        }

        debug!("trying directory at offset {dir_start:#x}");
        let entries = scan_region(source, dir_start, options.max_slots, |slot, index, offset| {
            decode_slot(slot, index, offset, options.max_length)
        })?;

        if !entries.is_empty() {
            debug!("found {} saves at offset {dir_start:#x}", entries.len());
            return Ok(entries);
        }
    }

    Ok(Vec::new())
}

/// Scans the root directory named by the superblock.
pub fn scan_superblock<S: CardSource>(
    source: &mut S,
    options: &ScanOptions,
) -> Result<Vec<DirectoryEntry>, S::Error> {
    let Some(superblock) = read_superblock(source)? else {
        debug!("image too short for a superblock");
        return Ok(Vec::new());
    };

    let dir_start = superblock.rootdir_offset();
    debug!(
        "superblock root directory at offset {dir_start:#x} (alloc_offset={}, rootdir_cluster={})",
        superblock.alloc_offset, superblock.rootdir_cluster
    );
    scan_region(source, dir_start, options.max_slots, decode_superblock_slot)
}

pub fn read_superblock<S: CardSource>(source: &mut S) -> Result<Option<Superblock>, S::Error> {
    if source.len() < PAGE_SIZE as u64 {
        return Ok(None);
    }
    let mut page = [0u8; PAGE_SIZE];
    source.read_at(0, &mut page)?;
    Ok(Superblock::parse(&page))
}

fn log_header<S: CardSource>(source: &mut S) -> Result<(), S::Error> {
    if !log_enabled!(Level::Debug) {
        return Ok(());
    }

    let len = source.len();
    let mut magic = [0u8; MAGIC_LEN];
    let available = usize::try_from(len).map_or(MAGIC_LEN, |len| len.min(MAGIC_LEN));
    source.read_at(0, &mut magic[..available])?;
    debug!("parsing memory card ({len} bytes)");
    debug!("magic: {}", decode_magic(&magic[..available]));
    Ok(())
}

/// Reads up to `max_slots` consecutive slots from `dir_start`, stopping at
/// the first slot that does not fit in the image.
fn scan_region<S, F>(
    source: &mut S,
    dir_start: u64,
    max_slots: usize,
    mut decode: F,
) -> Result<Vec<DirectoryEntry>, S::Error>
where
    S: CardSource,
    F: FnMut(&[u8; PAGE_SIZE], usize, u64) -> Option<DirectoryEntry>,
{
    let len = source.len();
    let mut entries = Vec::new();
    let mut slot = [0u8; PAGE_SIZE];

    for index in 0..max_slots {
        let Some(offset) = (index as u64)
            .checked_mul(PAGE_SIZE as u64)
            .and_then(|delta| dir_start.checked_add(delta))
        else {
            break;
        };
        match offset.checked_add(PAGE_SIZE as u64) {
            Some(end) if end <= len => {}
            _ => break,
        }

        source.read_at(offset, &mut slot)?;
        if let Some(entry) = decode(&slot, index, offset) {
            entries.push(entry);
        }
    }

    Ok(entries)
}

fn read_mode(slot: &[u8; PAGE_SIZE]) -> Mode {
    Mode::new(LittleEndian::read_u32(&slot[MODE_OFFSET..]))
}

fn read_length(slot: &[u8; PAGE_SIZE]) -> u32 {
    LittleEndian::read_u32(&slot[LENGTH_OFFSET..])
}

fn name_field(slot: &[u8; PAGE_SIZE]) -> &[u8] {
    &slot[NAME_OFFSET..NAME_OFFSET + NAME_LEN]
}

fn decode_slot(
    slot: &[u8; PAGE_SIZE],
    index: usize,
    offset: u64,
    max_length: u32,
) -> Option<DirectoryEntry> {
    let mode = read_mode(slot);
    if mode.is_empty_marker() {
        return None;
    }

    let name = decode_name(name_field(slot));
    if is_placeholder_name(&name) {
        return None;
    }

    let length = read_length(slot);
    debug!("entry: mode={mode:#010X}, name={name}, length={length}");

    if !mode.is_used() || length == 0 || length >= max_length {
        return None;
    }

    Some(DirectoryEntry {
        slot: index,
        offset,
        mode,
        length,
        name,
    })
}

fn decode_superblock_slot(slot: &[u8; PAGE_SIZE], index: usize, offset: u64) -> Option<DirectoryEntry> {
    let mode = read_mode(slot);
    if mode.is_empty_marker() || !mode.is_used() {
        return None;
    }

    let name = decode_ascii_name(name_field(slot));
    if is_placeholder_name(&name) {
        return None;
    }

    let length = read_length(slot);
    if length > SUPERBLOCK_MAX_LENGTH {
        return None;
    }

    Some(DirectoryEntry {
        slot: index,
        offset,
        mode,
        length,
        name,
    })
}
