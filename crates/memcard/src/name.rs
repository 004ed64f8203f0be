//! Decoding of the fixed-width name fields stored in directory slots.

/// Width of the name field of a directory slot.
pub const NAME_LEN: usize = 32;

/// Decodes a null-terminated Latin-1 name, dropping unprintable characters.
///
/// Only the bytes before the first NUL are considered (all of them when
/// there is none). Characters outside `32..=126` and `160..=255` are dropped
/// rather than substituted, and surrounding spaces are trimmed afterwards.
pub fn decode_name(raw: &[u8]) -> String {
    let decoded = terminated(raw)
        .iter()
        .map(|&byte| char::from(byte))
        .filter(|&c| is_printable_latin1(c))
        .collect::<String>();
    decoded.trim_matches(' ').to_owned()
}

/// Stricter variant used by the superblock locator: printable ASCII only and
/// no trimming.
pub fn decode_ascii_name(raw: &[u8]) -> String {
    terminated(raw)
        .iter()
        .filter(|&&byte| matches!(byte, 32..=126))
        .map(|&byte| char::from(byte))
        .collect()
}

/// Decodes the card-type magic for display, trimming padding and control
/// characters from both ends.
pub fn decode_magic(raw: &[u8]) -> String {
    raw.iter()
        .map(|&byte| char::from(byte))
        .collect::<String>()
        .trim_matches(|c: char| c <= ' ')
        .to_owned()
}

/// `true` for names that never describe a save: empty, `.` and `..`.
pub fn is_placeholder_name(name: &str) -> bool {
    matches!(name, "" | "." | "..")
}

fn terminated(raw: &[u8]) -> &[u8] {
    let used = raw.iter().position(|&byte| byte == 0).unwrap_or(raw.len());
    &raw[..used]
}

fn is_printable_latin1(c: char) -> bool {
    matches!(u32::from(c), 32..=126 | 160..=255)
}
