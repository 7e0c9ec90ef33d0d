//! Bare profile-element status responses
//!
//! During a bound profile package load some cards answer STORE DATA with
//! a raw status sequence instead of a tagged RSP object. The status (`80`)
//! and identification number (`81`) pairs can sit at any nesting depth
//! inside `30` or `A0`..`AF` containers, and a few card OSes prepend four
//! bytes of session framing, so a positional rescan is tried before
//! giving up.

use crate::hexutil;
use crate::model::DecodeNode;
use crate::tlv::ber;

use super::common;

/// One recovered status pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: u64,
    pub id: Option<u64>,
}

fn is_container(tag: &str) -> bool {
    if tag == "30" {
        return true;
    }
    matches!(
        hexutil::bytes_of(tag).first(),
        Some(b) if (0xA0..=0xAF).contains(b)
    )
}

fn hunt(value: &[u8], depth: usize, out: &mut Vec<StatusEntry>) {
    if depth >= ber::MAX_DEPTH {
        return;
    }
    for tlv in ber::read_nested(value, depth) {
        match tlv.tag.as_str() {
            "80" => out.push(StatusEntry {
                status: hexutil::be_uint(&tlv.value),
                id: None,
            }),
            "81" => {
                if let Some(last) = out.last_mut() {
                    if last.id.is_none() {
                        last.id = Some(hexutil::be_uint(&tlv.value));
                    }
                }
            }
            tag if is_container(tag) => hunt(&tlv.value, depth + 1, out),
            _ => {}
        }
    }
}

/// Collect all status pairs in a response buffer.
///
/// When the buffer yields nothing as-is, the first four bytes are assumed
/// to be framing and the scan is repeated behind them.
pub fn status_entries(value: &[u8]) -> Vec<StatusEntry> {
    let mut out = Vec::new();
    hunt(value, 0, &mut out);
    if out.is_empty() && value.len() > 4 {
        hunt(&value[4..], 0, &mut out);
    }
    out
}

/// Decode a bare status response into a tree.
pub fn decode(value: &[u8]) -> DecodeNode {
    let entries = status_entries(value);
    let mut root = DecodeNode::new("EUICCResponse");
    if entries.is_empty() {
        return root.with_hint(format!("No status found in {}", hexutil::to_hex(value)));
    }
    for (i, entry) in entries.iter().enumerate() {
        let mut node = DecodeNode::leaf(
            format!("peStatus {}", i + 1),
            format!("{}({})", common::pe_status_name(entry.status), entry.status),
        );
        if let Some(id) = entry.id {
            node.hint = Some(format!("identification number: {}", id));
        }
        root.push(node);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_status_pairs() {
        // A0 { 30 { 80 00, 81 03 }, 30 { 80 02 } }
        let value = hex::decode("A00D30068001008101033003800102").unwrap();
        let entries = status_entries(&value);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, 0);
        assert_eq!(entries[0].id, Some(3));
        assert_eq!(entries[1].status, 2);
        assert_eq!(entries[1].id, None);
    }

    #[test]
    fn test_positional_fallback() {
        // Four framing bytes that do not decode as TLVs, then 30 { 80 00 }.
        let value = hex::decode("FFFFFFFF3003800100").unwrap();
        let entries = status_entries(&value);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, 0);
    }

    #[test]
    fn test_decode_tree_names_statuses() {
        let value = hex::decode("3006800102810102").unwrap();
        let root = decode(&value);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].value.as_deref(), Some("memory-failure(2)"));
    }

    #[test]
    fn test_empty_buffer_gets_hint() {
        let root = decode(&[]);
        assert!(root.hint.is_some());
        assert!(root.children.is_empty());
    }
}
