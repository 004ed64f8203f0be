use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Byte offsets of the fields read from a 512-byte directory slot.
pub const MODE_OFFSET: usize = 0x00;
pub const LENGTH_OFFSET: usize = 0x04;
pub const NAME_OFFSET: usize = 0x40;

/// The 32-bit mode word at the start of a directory slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mode(u32);

impl Mode {
    pub const USED: u32 = 0x8000;
    pub const DIRECTORY: u32 = 0x0020;
    pub const FILE: u32 = 0x0010;

    /// Values written into slots that never held an entry.
    const EMPTY_MARKERS: [u32; 2] = [0x0000_0000, 0xFFFF_FFFF];

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty_marker(self) -> bool {
        Self::EMPTY_MARKERS.contains(&self.0)
    }

    pub fn is_used(self) -> bool {
        self.0 & Self::USED != 0
    }

    pub fn is_directory(self) -> bool {
        self.0 & Self::DIRECTORY != 0
    }

    pub fn is_file(self) -> bool {
        self.0 & Self::FILE != 0
    }
}

impl fmt::LowerHex for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// Classification used for display. The raw format allows both the file and
/// the directory bit at once; the directory bit wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

impl From<Mode> for EntryKind {
    fn from(mode: Mode) -> Self {
        if mode.is_directory() {
            EntryKind::Directory
        } else if mode.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One reportable slot of the card's directory table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Slot index inside the scanned directory region.
    pub slot: usize,
    /// Absolute byte offset of the slot in the image.
    pub offset: u64,
    pub mode: Mode,
    /// Byte size for files, child-entry count for directories.
    pub length: u32,
    pub name: String,
}

impl DirectoryEntry {
    pub fn kind(&self) -> EntryKind {
        self.mode.into()
    }

    pub fn is_directory(&self) -> bool {
        self.mode.is_directory()
    }

    pub fn is_file(&self) -> bool {
        self.mode.is_file()
    }

    /// `NAME (N files)` for directories, `NAME (N KB)` for everything else.
    pub fn display_label(&self) -> String {
        if self.is_directory() {
            format!("{} ({} files)", self.name, self.length)
        } else {
            format!("{} ({} KB)", self.name, self.length / 1024)
        }
    }

    pub fn to_record(&self) -> SaveRecord {
        SaveRecord::from(self)
    }
}

/// The pipe-separated `name|size|isDirectory` line exchanged with the
/// emulator core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub name: String,
    pub size: u32,
    pub is_directory: bool,
}

impl SaveRecord {
    pub fn display_label(&self) -> String {
        if self.is_directory {
            format!("{} ({} files)", self.name, self.size)
        } else {
            format!("{} ({} KB)", self.name, self.size / 1024)
        }
    }
}

impl From<&DirectoryEntry> for SaveRecord {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            name: entry.name.clone(),
            size: entry.length,
            is_directory: entry.is_directory(),
        }
    }
}

impl fmt::Display for SaveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.name,
            self.size,
            if self.is_directory { 1 } else { 0 }
        )
    }
}

impl FromStr for SaveRecord {
    type Err = Error;

    /// Extra trailing fields are ignored; anything other than `1` in the
    /// third field means "not a directory".
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split('|');
        let (Some(name), Some(size), Some(flag)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidRecord(line.to_owned()));
        };
        if flag.is_empty() {
            return Err(Error::InvalidRecord(line.to_owned()));
        }
        let size = size
            .parse::<u32>()
            .map_err(|_| Error::InvalidRecord(line.to_owned()))?;

        Ok(Self {
            name: name.to_owned(),
            size,
            is_directory: flag == "1",
        })
    }
}
