//! WinAnsiEncoding (Windows-1252) for the standard Type1 fonts.

/// Byte substituted for characters the encoding cannot represent.
pub const REPLACEMENT: u8 = b'?';

/// Maps a character to its WinAnsi code, if it has one.
pub fn encode_char(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '\u{20AC}' => Some(0x80),
            '\u{201A}' => Some(0x82),
            '\u{0192}' => Some(0x83),
            '\u{201E}' => Some(0x84),
            '\u{2026}' => Some(0x85),
            '\u{2020}' => Some(0x86),
            '\u{2021}' => Some(0x87),
            '\u{02C6}' => Some(0x88),
            '\u{2030}' => Some(0x89),
            '\u{0160}' => Some(0x8A),
            '\u{2039}' => Some(0x8B),
            '\u{0152}' => Some(0x8C),
            '\u{017D}' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{02DC}' => Some(0x98),
            '\u{2122}' => Some(0x99),
            '\u{0161}' => Some(0x9A),
            '\u{203A}' => Some(0x9B),
            '\u{0153}' => Some(0x9C),
            '\u{017E}' => Some(0x9E),
            '\u{0178}' => Some(0x9F),
            _ => None,
        },
    }
}

pub fn is_encodable(c: char) -> bool {
    encode_char(c).is_some()
}

/// Encodes a string, replacing unrepresentable characters with `?`.
/// Tabs and newlines become spaces.
pub fn encode(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => b' ',
            c => encode_char(c).unwrap_or(REPLACEMENT),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_and_latin1_pass_through() {
        assert_eq!(encode("Zoë café"), b"Zo\xEB caf\xE9".to_vec());
    }

    #[test]
    fn test_typographic_punctuation() {
        assert_eq!(encode("\u{2022} 2019\u{2013}2021"), b"\x95 2019\x962021".to_vec());
        assert_eq!(encode("\u{201C}ok\u{201D}"), b"\x93ok\x94".to_vec());
    }

    #[test]
    fn test_unencodable_is_replaced() {
        assert_eq!(encode("東京"), b"??".to_vec());
        assert!(!is_encodable('\u{1F600}'));
        assert!(is_encodable('\u{2014}'));
    }
}
