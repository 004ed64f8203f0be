use std::env;
use std::process;

use memcard::{Locator, Memcard, ScanOptions};

fn main() -> Result<(), memcard::Error> {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example inspect -- <path-to-memcard>");
        process::exit(1);
    });

    let mc = Memcard::open(&path)?;

    match mc.superblock() {
        Some(superblock) => eprintln!("{:#?}", superblock),
        None => eprintln!("Image is too short for a superblock."),
    }

    for locator in [Locator::Heuristic, Locator::Superblock] {
        let entries = mc.saves(&ScanOptions::default().with_locator(locator));
        eprintln!("{locator:?}: {} entries", entries.len());
        for entry in entries {
            eprintln!("  [{:>3}] {:#010X} {}", entry.slot, entry.mode, entry.display_label());
        }
    }

    Ok(())
}
