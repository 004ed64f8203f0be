//! The first page of a formatted card.
//!
//! Only the fields needed for diagnostics and for locating the root
//! directory are decoded. Nothing here gates the heuristic scan.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::name::decode_magic;
use crate::PAGE_SIZE;

pub const MAGIC: &str = "Sony PS2 Memory Card Format ";
pub const MAGIC_LEN: usize = 28;
/// Cluster size assumed when turning `alloc_offset + rootdir_cluster` into a
/// byte offset.
pub const CLUSTER_SIZE: u64 = 1024;

const VERSION_OFFSET: usize = 0x1C;
const VERSION_LEN: usize = 12;
const PAGE_LEN_OFFSET: usize = 0x28;
const PAGES_PER_CLUSTER_OFFSET: usize = 0x2A;
const PAGES_PER_BLOCK_OFFSET: usize = 0x2C;
const CLUSTERS_PER_CARD_OFFSET: usize = 0x30;
const ALLOC_OFFSET_OFFSET: usize = 0x34;
const ALLOC_END_OFFSET: usize = 0x38;
const ROOTDIR_CLUSTER_OFFSET: usize = 0x3C;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Superblock {
    pub magic: String,
    pub version: String,
    pub page_len: u16,
    pub pages_per_cluster: u16,
    pub pages_per_block: u16,
    pub clusters_per_card: u32,
    pub alloc_offset: u32,
    pub alloc_end: u32,
    pub rootdir_cluster: u32,
    formatted: bool,
}

impl Superblock {
    /// Decodes the superblock from the first page of the image. Returns
    /// `None` when less than a full page is available.
    pub fn parse(page: &[u8]) -> Option<Self> {
        if page.len() < PAGE_SIZE {
            return None;
        }

        Some(Self {
            magic: decode_magic(&page[..MAGIC_LEN]),
            version: decode_magic(&page[VERSION_OFFSET..VERSION_OFFSET + VERSION_LEN]),
            page_len: LittleEndian::read_u16(&page[PAGE_LEN_OFFSET..]),
            pages_per_cluster: LittleEndian::read_u16(&page[PAGES_PER_CLUSTER_OFFSET..]),
            pages_per_block: LittleEndian::read_u16(&page[PAGES_PER_BLOCK_OFFSET..]),
            clusters_per_card: LittleEndian::read_u32(&page[CLUSTERS_PER_CARD_OFFSET..]),
            alloc_offset: LittleEndian::read_u32(&page[ALLOC_OFFSET_OFFSET..]),
            alloc_end: LittleEndian::read_u32(&page[ALLOC_END_OFFSET..]),
            rootdir_cluster: LittleEndian::read_u32(&page[ROOTDIR_CLUSTER_OFFSET..]),
            formatted: page.starts_with(MAGIC.as_bytes()),
        })
    }

    /// `true` when the page starts with the formatted-card magic.
    pub fn is_formatted(&self) -> bool {
        self.formatted
    }

    /// Byte offset of the root directory. The cluster sum wraps at 32 bits
    /// like the card's own cluster arithmetic.
    pub fn rootdir_offset(&self) -> u64 {
        u64::from(self.alloc_offset.wrapping_add(self.rootdir_cluster)) * CLUSTER_SIZE
    }
}

/// Reads the magic for logging; works on images shorter than a page.
pub fn read_magic(image: &[u8]) -> String {
    decode_magic(&image[..image.len().min(MAGIC_LEN)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted_page() -> Vec<u8> {
        let mut page = vec![0u8; PAGE_SIZE];
        page[..MAGIC_LEN].copy_from_slice(MAGIC.as_bytes());
        page[VERSION_OFFSET..VERSION_OFFSET + 6].copy_from_slice(b"1.2.0.");
        LittleEndian::write_u16(&mut page[PAGE_LEN_OFFSET..], 512);
        LittleEndian::write_u16(&mut page[PAGES_PER_CLUSTER_OFFSET..], 2);
        LittleEndian::write_u16(&mut page[PAGES_PER_BLOCK_OFFSET..], 16);
        LittleEndian::write_u32(&mut page[CLUSTERS_PER_CARD_OFFSET..], 8192);
        LittleEndian::write_u32(&mut page[ALLOC_OFFSET_OFFSET..], 41);
        LittleEndian::write_u32(&mut page[ALLOC_END_OFFSET..], 8135);
        LittleEndian::write_u32(&mut page[ROOTDIR_CLUSTER_OFFSET..], 0);
        page
    }

    #[test]
    fn decodes_standard_layout() {
        let superblock = Superblock::parse(&formatted_page()).expect("full page");
        assert!(superblock.is_formatted());
        assert_eq!(superblock.magic, "Sony PS2 Memory Card Format");
        assert_eq!(superblock.version, "1.2.0.");
        assert_eq!(superblock.page_len, 512);
        assert_eq!(superblock.pages_per_cluster, 2);
        assert_eq!(superblock.pages_per_block, 16);
        assert_eq!(superblock.clusters_per_card, 8192);
        assert_eq!(superblock.alloc_end, 8135);
        assert_eq!(superblock.rootdir_offset(), 41 * 1024);
    }

    #[test]
    fn short_page_is_rejected() {
        assert!(Superblock::parse(&[0u8; PAGE_SIZE - 1]).is_none());
    }

    #[test]
    fn blank_page_is_not_formatted() {
        let superblock = Superblock::parse(&[0xFFu8; PAGE_SIZE]).expect("full page");
        assert!(!superblock.is_formatted());
        assert_eq!(
            superblock.rootdir_offset(),
            u64::from(u32::MAX - 1) * 1024
        );
    }

    #[test]
    fn rootdir_cluster_sum_wraps() {
        let mut page = formatted_page();
        LittleEndian::write_u32(&mut page[ALLOC_OFFSET_OFFSET..], u32::MAX);
        LittleEndian::write_u32(&mut page[ROOTDIR_CLUSTER_OFFSET..], 2);
        let superblock = Superblock::parse(&page).expect("full page");
        assert_eq!(superblock.rootdir_offset(), 1024);
    }

    #[test]
    fn magic_of_tiny_image() {
        assert_eq!(read_magic(b"Sony"), "Sony");
        assert_eq!(read_magic(&[]), "");
    }
}
