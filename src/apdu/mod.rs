//! APDU header handling
//!
//! Captured messages are not always full ISO 7816-4 APDUs: proactive
//! fetch results start with a bare `D0` TLV and eSIM responses with a
//! `BFxx` tag, so header parsing must tolerate arbitrarily short input.
//! Every field is optional and absence propagates instead of being
//! coerced to zero.
//!
//! # Example
//! ```ignore
//! use apduscope::apdu::parse_header;
//!
//! let hdr = parse_header("80E2910003BF2E00");
//! assert_eq!(hdr.ins, Some(0xE2));
//! ```

pub mod reassemble;

use crate::hexutil;

/// STORE DATA instruction byte carrying eSIM RSP objects.
pub const INS_STORE_DATA: u8 = 0xE2;

/// A leniently parsed APDU header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApduHeader {
    pub cla: Option<u8>,
    pub ins: Option<u8>,
    pub p1: Option<u8>,
    pub p2: Option<u8>,
    pub lc: Option<u8>,
}

impl ApduHeader {
    /// True for the CLA ranges eSIM STORE DATA is observed on.
    pub fn has_store_data_class(&self) -> bool {
        matches!(self.cla, Some(c) if (0x80..=0x83).contains(&c) || (0xC0..=0xCF).contains(&c))
    }

    /// True when this header carries an eSIM STORE DATA request.
    pub fn is_store_data(&self) -> bool {
        self.ins == Some(INS_STORE_DATA) && self.has_store_data_class()
    }
}

/// Parse the leading `CLA INS P1 P2 [Lc]` bytes of a hex message.
///
/// Fewer than four bytes leaves the whole header empty; a missing fifth
/// byte leaves only `lc` empty.
pub fn parse_header(raw: &str) -> ApduHeader {
    let bytes = hexutil::bytes_of(raw);
    let mut hdr = ApduHeader::default();
    if bytes.len() < 4 {
        return hdr;
    }
    hdr.cla = Some(bytes[0]);
    hdr.ins = Some(bytes[1]);
    hdr.p1 = Some(bytes[2]);
    hdr.p2 = Some(bytes[3]);
    if bytes.len() >= 5 {
        hdr.lc = Some(bytes[4]);
    }
    hdr
}

/// Locate the first BER tag behind a 5-byte STORE DATA header.
///
/// Returns the one- or two-byte tag in canonical hex, or `None` when the
/// body is too short to hold one.
pub fn first_tag_after_store_header(raw: &str) -> Option<String> {
    if raw.len() < 12 {
        return None;
    }
    let body = &raw[10..];
    let t1 = &body[..2];
    if matches!(t1, "9F" | "5F" | "7F" | "BF") && body.len() >= 4 {
        return Some(format!("{}{}", t1, &body[2..4]));
    }
    Some(t1.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_header() {
        let hdr = parse_header("80E2110000");
        assert_eq!(hdr.cla, Some(0x80));
        assert_eq!(hdr.ins, Some(0xE2));
        assert_eq!(hdr.p1, Some(0x11));
        assert_eq!(hdr.p2, Some(0x00));
        assert_eq!(hdr.lc, Some(0x00));
    }

    #[test]
    fn test_short_input_leaves_fields_absent() {
        let hdr = parse_header("80E211");
        assert_eq!(hdr.cla, None);
        assert_eq!(hdr.ins, None);

        let hdr = parse_header("80E21100");
        assert_eq!(hdr.p2, Some(0x00));
        assert_eq!(hdr.lc, None);
    }

    #[test]
    fn test_store_data_detection() {
        assert!(parse_header("80E2910010").is_store_data());
        assert!(parse_header("C1E2110020").is_store_data());
        assert!(!parse_header("80C2000005").is_store_data());
        assert!(!parse_header("00E2110020").is_store_data());
    }

    #[test]
    fn test_first_tag_after_store_header() {
        assert_eq!(
            first_tag_after_store_header("81E291000ABF2E00").as_deref(),
            Some("BF2E")
        );
        assert_eq!(
            first_tag_after_store_header("81E29100034F0102").as_deref(),
            Some("4F")
        );
        assert_eq!(first_tag_after_store_header("81E29100"), None);
    }
}
