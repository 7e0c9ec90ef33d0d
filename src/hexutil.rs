//! Hex string helpers shared by the decoders
//!
//! Raw messages arrive as hex text captured from debug logs. Everything in
//! here is a pure function: normalization, BCD nibble swapping, ICCID
//! decoding and the lenient text conversions used by TLV builders.

use crate::error::DecodeError;

/// Normalize arbitrary captured text into a canonical hex string.
///
/// Whitespace is stripped, letters are uppercased. Any other non-hex
/// character or an odd digit count is rejected.
///
/// # Example
/// ```ignore
/// let s = normalize("d0 06 81 03 01 21 00").unwrap();
/// assert_eq!(s, "D0068103012100");
/// ```
pub fn normalize(input: &str) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_whitespace() {
            continue;
        }
        if !ch.is_ascii_hexdigit() {
            return Err(DecodeError::NotHex);
        }
        out.push(ch.to_ascii_uppercase());
    }
    if out.len() % 2 != 0 {
        return Err(DecodeError::OddLength);
    }
    Ok(out)
}

/// Decode a canonical hex string into bytes.
///
/// Only called on strings the core produced itself, so a decode failure
/// maps to an empty buffer rather than an error.
pub fn bytes_of(hexstr: &str) -> Vec<u8> {
    hex::decode(hexstr).unwrap_or_default()
}

/// Uppercase hex rendering of a byte buffer.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Swap the two nibbles of every byte, BCD semi-octet style.
///
/// `98 10` becomes `89 01`.
pub fn nibble_swap(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:X}{:X}", b & 0x0F, b >> 4);
    }
    out
}

/// Decode an ICCID from swapped BCD, trimming trailing `F` padding.
pub fn decode_iccid(bytes: &[u8]) -> String {
    let swapped = nibble_swap(bytes);
    swapped.trim_end_matches('F').to_string()
}

/// Interpret a value as UTF-8 text, falling back to raw hex on failure.
///
/// Malformed text is not an error anywhere in the tree, the reader just
/// sees the bytes instead.
pub fn utf8_or_hex(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => to_hex(bytes),
    }
}

/// Big-endian unsigned integer of up to 8 value bytes.
///
/// Longer values keep only the low-order 8 bytes, which is far beyond
/// anything the protocols encode as an integer.
pub fn be_uint(bytes: &[u8]) -> u64 {
    let start = bytes.len().saturating_sub(8);
    bytes[start..].iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mixed_case_and_spaces() {
        assert_eq!(normalize("bf 22 80 03").unwrap(), "BF228003");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize("BF2G"), Err(DecodeError::NotHex));
        assert_eq!(normalize("BF2"), Err(DecodeError::OddLength));
    }

    #[test]
    fn test_nibble_swap() {
        let bytes = hex::decode("9810").unwrap();
        assert_eq!(nibble_swap(&bytes), "8901");
    }

    #[test]
    fn test_iccid_strips_padding() {
        // 20 hex chars of swapped BCD with F padding in the last byte
        let bytes = hex::decode("981010325476987612F1").unwrap();
        let iccid = decode_iccid(&bytes);
        assert!(!iccid.ends_with('F'));
        assert!(iccid.starts_with("8901"));
    }

    #[test]
    fn test_utf8_fallback() {
        assert_eq!(utf8_or_hex(b"smdp.example.com"), "smdp.example.com");
        assert_eq!(utf8_or_hex(&[0xFF, 0xFE]), "FFFE");
    }

    #[test]
    fn test_be_uint() {
        assert_eq!(be_uint(&[0x01, 0x00]), 256);
        assert_eq!(be_uint(&[]), 0);
    }
}
