//! BER-TLV decoding for the eSIM/ASN.1 dialect
//!
//! The eSIM RSP messages use a restricted BER encoding: tags are one byte,
//! or two bytes when the first byte is one of the markers `9F`, `5F`, `7F`,
//! `BF`; lengths use the usual short/long forms. The decoder is flat, it
//! returns the sibling TLVs of one level and leaves recursion into
//! constructed values (`30`, `A0`..`AF`, `BFxx`, `E3`, ...) to the caller.
//!
//! Truncation is never an error here. The decoder returns every complete
//! TLV that fits and silently stops at the first incomplete one.

/// Practical guard for caller-driven recursion. Observed protocol nesting
/// stays below 10.
pub const MAX_DEPTH: usize = 32;

use super::Tlv;

/// First tag bytes that introduce a two-byte tag.
fn is_two_byte_marker(b: u8) -> bool {
    matches!(b, 0x9F | 0x5F | 0x7F | 0xBF)
}

/// Decode a flat run of BER TLVs.
///
/// Returns the decoded entries plus the number of bytes consumed. Trailing
/// bytes that do not form a complete TLV are left unconsumed.
pub fn read_list(data: &[u8]) -> (Vec<Tlv>, usize) {
    let mut out = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let start = i;

        let t1 = data[i];
        i += 1;
        let tag = if is_two_byte_marker(t1) && i < data.len() {
            let t2 = data[i];
            i += 1;
            format!("{:02X}{:02X}", t1, t2)
        } else {
            format!("{:02X}", t1)
        };

        if i >= data.len() {
            return (out, start);
        }
        let first = data[i];
        i += 1;
        let length = if first < 0x80 {
            first as usize
        } else {
            let n = (first & 0x7F) as usize;
            if n == 0 || i + n > data.len() {
                return (out, start);
            }
            let mut v: usize = 0;
            for _ in 0..n {
                v = (v << 8) | data[i] as usize;
                i += 1;
            }
            v
        };

        if i + length > data.len() {
            return (out, start);
        }
        out.push(Tlv::new(tag, data[i..i + length].to_vec()));
        i += length;
    }

    (out, i)
}

/// Decode the nested content of a constructed TLV value.
///
/// Identical to [`read_list`] but bounded by [`MAX_DEPTH`]; past the limit
/// the value is treated as opaque and nothing is returned.
pub fn read_nested(value: &[u8], depth: usize) -> Vec<Tlv> {
    if depth >= MAX_DEPTH {
        return Vec::new();
    }
    read_list(value).0
}

/// Canonical BER length encoding for `length` bytes.
///
/// Short form below `0x80`, otherwise `0x80 | n` followed by `n` big-endian
/// count bytes. Used when re-emitting a reassembled STORE DATA chain.
pub fn encode_length(length: usize) -> Vec<u8> {
    if length < 0x80 {
        return vec![length as u8];
    }
    let mut be: Vec<u8> = length.to_be_bytes().to_vec();
    while be.len() > 1 && be[0] == 0 {
        be.remove(0);
    }
    let mut out = Vec::with_capacity(1 + be.len());
    out.push(0x80 | be.len() as u8);
    out.extend(be);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_tag() {
        let data = hex::decode("800101").unwrap();
        let (tlvs, consumed) = read_list(&data);
        assert_eq!(tlvs.len(), 1);
        assert_eq!(tlvs[0].tag, "80");
        assert_eq!(tlvs[0].value, vec![0x01]);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_two_byte_tag_markers() {
        let data = hex::decode("BF220180").unwrap();
        let (tlvs, _) = read_list(&data);
        assert_eq!(tlvs[0].tag, "BF22");

        let data = hex::decode("5F3702AABB").unwrap();
        let (tlvs, _) = read_list(&data);
        assert_eq!(tlvs[0].tag, "5F37");
        assert_eq!(tlvs[0].length(), 2);
    }

    #[test]
    fn test_long_form_length() {
        let mut data = hex::decode("A48181").unwrap();
        data.extend(vec![0xAB; 0x81]);
        let (tlvs, consumed) = read_list(&data);
        assert_eq!(tlvs.len(), 1);
        assert_eq!(tlvs[0].tag, "A4");
        assert_eq!(tlvs[0].length(), 0x81);
        assert_eq!(consumed, data.len());
    }

    #[test]
    fn test_multiple_siblings() {
        let data = hex::decode("8001015A020102").unwrap();
        let (tlvs, _) = read_list(&data);
        assert_eq!(tlvs.len(), 2);
        assert_eq!(tlvs[0].tag, "80");
        assert_eq!(tlvs[1].tag, "5A");
    }

    #[test]
    fn test_truncated_value_keeps_siblings() {
        // Complete 80 01 01, then 81 04 with only 2 of 4 value bytes
        let data = hex::decode("8001018104AABB").unwrap();
        let (tlvs, consumed) = read_list(&data);
        assert_eq!(tlvs.len(), 1);
        assert_eq!(tlvs[0].tag, "80");
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_truncated_length_field() {
        // 9F70 with long-form marker but no count bytes
        let data = hex::decode("9F7081").unwrap();
        let (tlvs, consumed) = read_list(&data);
        assert!(tlvs.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_missing_length_byte() {
        let data = hex::decode("BF22").unwrap();
        let (tlvs, _) = read_list(&data);
        assert!(tlvs.is_empty());
    }

    #[test]
    fn test_encode_length_forms() {
        assert_eq!(encode_length(0x00), vec![0x00]);
        assert_eq!(encode_length(0x7F), vec![0x7F]);
        assert_eq!(encode_length(0x80), vec![0x81, 0x80]);
        assert_eq!(encode_length(0x1FF), vec![0x82, 0x01, 0xFF]);
    }

    #[test]
    fn test_read_nested_depth_guard() {
        let data = hex::decode("300480020102").unwrap();
        assert_eq!(read_nested(&data, 0).len(), 1);
        assert!(read_nested(&data, MAX_DEPTH).is_empty());
    }
}
