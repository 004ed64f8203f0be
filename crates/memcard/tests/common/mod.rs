#![allow(dead_code)]

use byteorder::{ByteOrder, LittleEndian};
use memcard::superblock::MAGIC;
use memcard::PAGE_SIZE;

pub const CARD_SIZE: usize = 8 * 1024 * 1024;

/// Builds synthetic card images one slot at a time.
pub struct CardBuilder {
    data: Vec<u8>,
}

impl CardBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
        }
    }

    pub fn standard() -> Self {
        Self::new(CARD_SIZE)
    }

    pub fn fill(mut self, byte: u8) -> Self {
        self.data.fill(byte);
        self
    }

    pub fn slot(mut self, offset: usize, mode: u32, length: u32, name: &[u8]) -> Self {
        let slot = &mut self.data[offset..offset + PAGE_SIZE];
        slot.fill(0);
        LittleEndian::write_u32(&mut slot[0x00..], mode);
        LittleEndian::write_u32(&mut slot[0x04..], length);
        slot[0x40..0x40 + name.len()].copy_from_slice(name);
        self
    }

    /// Writes a slot at `index` of the directory starting at `dir_start`.
    pub fn entry(self, dir_start: usize, index: usize, mode: u32, length: u32, name: &[u8]) -> Self {
        self.slot(dir_start + index * PAGE_SIZE, mode, length, name)
    }

    pub fn superblock(mut self, alloc_offset: u32, rootdir_cluster: u32) -> Self {
        self.data[..MAGIC.len()].copy_from_slice(MAGIC.as_bytes());
        LittleEndian::write_u16(&mut self.data[0x28..], 512);
        LittleEndian::write_u16(&mut self.data[0x2A..], 2);
        LittleEndian::write_u32(&mut self.data[0x34..], alloc_offset);
        LittleEndian::write_u32(&mut self.data[0x3C..], rootdir_cluster);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}
