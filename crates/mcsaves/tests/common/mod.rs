#![allow(dead_code)]

use std::path::Path;

use argh::FromArgs;
use byteorder::{ByteOrder, LittleEndian};
use mcsaves::cli::{run, Args};
use mcsaves::Error;

pub const CARD_SIZE: usize = 8 * 1024 * 1024;

/// A card with one save directory and one loose file at page 13.
pub fn sample_card() -> Vec<u8> {
    let mut data = vec![0u8; CARD_SIZE];
    write_slot(&mut data, 0x1A00, 0x8427, 3, b"BASLUS-20001");
    write_slot(&mut data, 0x1C00, 0x8000, 2048, b"MYGAME.PS2");
    data
}

pub fn write_slot(data: &mut [u8], offset: usize, mode: u32, length: u32, name: &[u8]) {
    LittleEndian::write_u32(&mut data[offset..], mode);
    LittleEndian::write_u32(&mut data[offset + 4..], length);
    data[offset + 0x40..offset + 0x40 + name.len()].copy_from_slice(name);
}

pub fn write_card(path: &Path, data: &[u8]) {
    std::fs::write(path, data).expect("write card");
}

/// Runs the CLI with colors disabled and returns its stdout.
pub fn run_cli(args: &[&str]) -> Result<String, Error> {
    colored::control::set_override(false);
    let args = Args::from_args(&["mcsaves"], args).expect("valid arguments");
    let mut out = Vec::new();
    run(args, &mut out)?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}
