//! Comprehension-TLV decoding for SIM Toolkit payloads
//!
//! Proactive command payloads use a simpler dialect than BER: the tag is
//! exactly one byte (bit 7 is the comprehension-required flag, so `01` and
//! `81` name the same field), the length is one byte with a single `0x81`
//! extension for values of 128..255 bytes. A two-byte `0x82` extension
//! exists in the standard but was never emitted by the equipment this
//! decoder targets; seeing one produces a diagnostic instead of a guess.
//!
//! Unlike the BER decoder, truncation here leaves a visible trace: a
//! diagnostic entry is appended and the rest of the container is skipped,
//! keeping the siblings decoded so far.

use super::Tlv;

/// One scan result: either a decoded field or an in-band diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompEntry {
    Tlv(Tlv),
    /// Verbatim diagnostic text, surfaced as a leaf node and a warning.
    Error(String),
}

/// Strip the comprehension-required bit, giving the canonical tag byte.
pub fn canonical_tag(tag: u8) -> u8 {
    tag & 0x7F
}

/// Scan a flat Comprehension-TLV container.
///
/// Returns entries in encounter order. The scan stops after the first
/// diagnostic; prior siblings remain.
pub fn scan(data: &[u8]) -> Vec<CompEntry> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let tag = data[i];
        i += 1;

        if i >= data.len() {
            out.push(CompEntry::Error(format!(
                "Parsing error: not enough length for tag {:02X}",
                tag
            )));
            break;
        }
        let first = data[i];
        i += 1;
        let length = if first < 0x80 {
            first as usize
        } else if first == 0x81 {
            if i >= data.len() {
                out.push(CompEntry::Error(format!(
                    "Parsing error: not enough length for tag {:02X}",
                    tag
                )));
                break;
            }
            let l = data[i] as usize;
            i += 1;
            l
        } else {
            // 0x82 two-byte extension (and anything else above 0x81) is
            // outside what this dialect's senders produce.
            out.push(CompEntry::Error(format!(
                "Parsing error: unsupported length encoding {:02X} for tag {:02X}",
                first, tag
            )));
            break;
        };

        if i + length > data.len() {
            out.push(CompEntry::Error(format!(
                "Parsing error: not enough length for tag {:02X} value",
                tag
            )));
            break;
        }
        out.push(CompEntry::Tlv(Tlv::new(
            format!("{:02X}", tag),
            data[i..i + length].to_vec(),
        )));
        i += length;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tlvs(entries: &[CompEntry]) -> Vec<&Tlv> {
        entries
            .iter()
            .filter_map(|e| match e {
                CompEntry::Tlv(t) => Some(t),
                CompEntry::Error(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_basic_scan() {
        // Command details + device identities
        let data = hex::decode("810301210002028281").unwrap();
        let entries = scan(&data);
        let fields = tlvs(&entries);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].tag, "81");
        assert_eq!(fields[0].value, vec![0x01, 0x21, 0x00]);
        assert_eq!(fields[1].tag, "02");
    }

    #[test]
    fn test_comprehension_bit_preserved_in_tag() {
        let data = hex::decode("0103012100").unwrap();
        let entries = scan(&data);
        match &entries[0] {
            CompEntry::Tlv(t) => assert_eq!(t.tag, "01"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(canonical_tag(0x81), 0x01);
        assert_eq!(canonical_tag(0x01), 0x01);
    }

    #[test]
    fn test_extended_length_81() {
        let mut data = hex::decode("8581").unwrap();
        data.push(0x85);
        data.extend(vec![0x41; 0x85]);
        let entries = scan(&data);
        let fields = tlvs(&entries);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].length(), 0x85);
    }

    #[test]
    fn test_truncated_value_emits_diagnostic() {
        let data = hex::decode("810501").unwrap();
        let entries = scan(&data);
        assert_eq!(
            entries.last(),
            Some(&CompEntry::Error(
                "Parsing error: not enough length for tag 81 value".to_string()
            ))
        );
    }

    #[test]
    fn test_missing_length_emits_diagnostic() {
        let data = hex::decode("8103012100B8").unwrap();
        let entries = scan(&data);
        let fields = tlvs(&entries);
        assert_eq!(fields.len(), 1);
        assert_eq!(
            entries.last(),
            Some(&CompEntry::Error(
                "Parsing error: not enough length for tag B8".to_string()
            ))
        );
    }

    #[test]
    fn test_length_82_is_diagnosed_not_decoded() {
        let data = hex::decode("0582010041").unwrap();
        let entries = scan(&data);
        assert_eq!(entries.len(), 1);
        assert!(matches!(
            &entries[0],
            CompEntry::Error(msg) if msg.contains("unsupported length encoding 82")
        ));
    }
}
