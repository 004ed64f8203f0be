mod common;

use std::fs;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use common::CardBuilder;
use memcard::{parse, parse_file, parse_reader, Error, Memcard, ScanOptions};
use tempfile::tempdir;

fn sample_card() -> Vec<u8> {
    CardBuilder::standard()
        .entry(0x1A00, 0, 0x8427, 3, b"BASLUS-20001")
        .entry(0x1A00, 1, 0x8497, 964, b"icon.sys")
        .build()
}

/// Seeks fine but fails every read.
struct BrokenReader {
    len: u64,
}

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "device removed"))
    }
}

impl Seek for BrokenReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::End(_) => Ok(self.len),
            SeekFrom::Start(offset) => Ok(offset),
            SeekFrom::Current(_) => Ok(0),
        }
    }
}

#[test]
fn reader_matches_slice_parse() {
    let image = sample_card();
    let from_reader =
        parse_reader(Cursor::new(image.clone()), &ScanOptions::default()).expect("parse reader");
    assert_eq!(from_reader, parse(&image));
    assert_eq!(from_reader.len(), 2);
}

#[test]
fn read_failure_is_propagated_without_partial_entries() {
    let result = parse_reader(BrokenReader { len: 8 * 1024 * 1024 }, &ScanOptions::default());
    match result {
        Err(Error::Io(err)) => assert_eq!(err.to_string(), "device removed"),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn reader_shorter_than_directory_is_empty() {
    let entries = parse_reader(Cursor::new(vec![0u8; 0x100]), &ScanOptions::default())
        .expect("short image parses");
    assert!(entries.is_empty());
}

#[test]
fn parse_file_reads_card_from_disk() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("Mcd001.ps2");
    fs::write(&path, sample_card()).expect("write card");

    let entries = parse_file(&path, &ScanOptions::default()).expect("parse file");
    assert_eq!(entries[0].name, "BASLUS-20001");
    assert_eq!(entries[1].display_label(), "icon.sys (0 KB)");

    let card = Memcard::open(&path).expect("open card");
    assert_eq!(card.len(), 8 * 1024 * 1024);
    assert!(!card.is_empty());
    assert_eq!(card.saves(&ScanOptions::default()), entries);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("missing.ps2");

    assert!(matches!(
        parse_file(&missing, &ScanOptions::default()),
        Err(Error::Io(_))
    ));
    assert!(matches!(Memcard::open(&missing), Err(Error::Io(_))));
}
