use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use memcard::{Memcard, Superblock};

use crate::Error;

const MODIFIED_FORMAT: &str = "%b %d, %Y %H:%M";

/// Summary of a card image shown by `mcsaves info`.
#[derive(Debug, Clone)]
pub struct CardInfo {
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub magic: String,
    pub superblock: Option<Superblock>,
}

impl CardInfo {
    pub fn read(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::MissingCard(path.display().to_string()));
        }

        let metadata = std::fs::metadata(path)?;
        let card = Memcard::open(path)?;
        Ok(Self {
            size: metadata.len(),
            modified: metadata.modified().ok(),
            magic: card.magic(),
            superblock: card.superblock(),
        })
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Size: {}", format_size_mb(self.size)),
            format!(
                "Last Modified: {}",
                self.modified
                    .map(format_modified)
                    .unwrap_or_else(|| "unknown".to_string())
            ),
            format!("Magic: {}", self.magic),
        ];

        match &self.superblock {
            Some(superblock) => {
                lines.push(format!(
                    "Formatted: {}",
                    if superblock.is_formatted() { "yes" } else { "no" }
                ));
                if superblock.is_formatted() {
                    lines.push(format!("Version: {}", superblock.version));
                    lines.push(format!("Page size: {}", superblock.page_len));
                    lines.push(format!("Pages per cluster: {}", superblock.pages_per_cluster));
                    lines.push(format!("Pages per block: {}", superblock.pages_per_block));
                    lines.push(format!("Clusters per card: {}", superblock.clusters_per_card));
                    lines.push(format!("Allocation offset: {}", superblock.alloc_offset));
                    lines.push(format!("Allocation end: {}", superblock.alloc_end));
                    lines.push(format!("Root directory cluster: {}", superblock.rootdir_cluster));
                    lines.push(format!(
                        "Root directory offset: {:#X}",
                        superblock.rootdir_offset()
                    ));
                }
            }
            None => lines.push("Formatted: no".to_string()),
        }

        lines
    }
}

pub fn format_size_mb(size: u64) -> String {
    format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
}

pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(MODIFIED_FORMAT).to_string()
}
