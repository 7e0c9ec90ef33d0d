//! Shared decoding helpers for eSIM RSP objects
//!
//! ASN.1 BIT STRING handling plus the small value renderers several of
//! the `BFxx` builders need: profile state and class names, and the
//! notification metadata block that appears both in list responses and
//! installation results.

use crate::hexutil;
use crate::model::DecodeNode;
use crate::tlv::ber;

/// Names of the `profileManagementOperation` BIT STRING, bit 0 first.
pub const PROFILE_MGMT_EVENTS: [&str; 8] = [
    "notificationInstall",
    "notificationLocalEnable",
    "notificationLocalDisable",
    "notificationLocalDelete",
    "notificationRpmEnable",
    "notificationRpmDisable",
    "notificationRpmDelete",
    "loadRpmPackageResult",
];

/// Number of logical bits in a DER BIT STRING value.
///
/// The first content byte counts unused trailing bits; a malformed or
/// empty value has zero bits.
pub fn bit_count(value: &[u8]) -> usize {
    if value.len() < 2 {
        return 0;
    }
    let unused = value[0] as usize;
    let total = 8 * (value.len() - 1);
    total.saturating_sub(unused.min(7))
}

/// Logical bit `i` of a DER BIT STRING, MSB of the first content byte
/// being bit 0. Out-of-range bits read as clear.
pub fn bit_is_set(value: &[u8], i: usize) -> bool {
    if i >= bit_count(value) {
        return false;
    }
    let byte = value[1 + i / 8];
    byte & (0x80 >> (i % 8)) != 0
}

/// Render a capability BIT STRING as one leaf per name.
///
/// Every name appears; bits past the end of the encoded string show as
/// not supported.
pub fn capability_nodes(value: &[u8], names: &[&str]) -> Vec<DecodeNode> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let text = if bit_is_set(value, i) { "Support" } else { "Not Support" };
            DecodeNode::leaf(*name, text)
        })
        .collect()
}

/// Render an event BIT STRING, listing only the bits the encoding covers.
pub fn event_nodes(value: &[u8], names: &[&str], set: &str, clear: &str) -> Vec<DecodeNode> {
    let total = bit_count(value);
    names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i < total)
        .map(|(i, name)| {
            let text = if bit_is_set(value, i) { set } else { clear };
            DecodeNode::leaf(*name, text)
        })
        .collect()
}

/// Names of the set bits, in bit order.
pub fn set_bit_names<'a>(value: &[u8], names: &[&'a str]) -> Vec<&'a str> {
    names
        .iter()
        .enumerate()
        .filter(|(i, _)| bit_is_set(value, *i))
        .map(|(_, name)| *name)
        .collect()
}

/// Profile element status codes from the installation result blocks.
pub fn pe_status_name(code: u64) -> &'static str {
    match code {
        0 => "ok",
        1 => "pe-not-supported",
        2 => "memory-failure",
        3 => "bad-values",
        4 => "not-enough-memory",
        5 => "invalid-request-format",
        6 => "invalid-parameter",
        7 => "runtime-not-supported",
        8 => "lib-not-supported",
        9 => "template-not-supported",
        10 => "feature-not-supported",
        11 => "pin-code-missing",
        31 => "unsupported-profile-version",
        _ => "unknown",
    }
}

/// Dotted rendering of a VersionType value, `020200` becoming `2.2.0`.
pub fn version(value: &[u8]) -> String {
    if value.is_empty() {
        return String::new();
    }
    value
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Profile state byte per SGP.22.
pub fn profile_state(value: &[u8]) -> String {
    match value.first() {
        Some(0x00) => "Disabled".to_string(),
        Some(0x01) => "Enabled".to_string(),
        _ => format!("Unknown({})", hexutil::to_hex(value)),
    }
}

/// Profile class byte per SGP.22.
pub fn profile_class(value: &[u8]) -> String {
    match value.first() {
        Some(0x00) => "test".to_string(),
        Some(0x01) => "provisioning".to_string(),
        Some(0x02) => "operational".to_string(),
        _ => format!("Unknown({})", hexutil::to_hex(value)),
    }
}

/// Recursive raw dump of a BER-TLV buffer.
///
/// Used wherever no field-level decoder exists: constructed values get a
/// child per inner TLV, primitives a hex leaf. Depth is bounded by the
/// BER recursion guard.
pub fn generic_tree(node: &mut DecodeNode, value: &[u8], depth: usize) {
    for tlv in ber::read_nested(value, depth) {
        let constructed = hexutil::bytes_of(&tlv.tag)
            .first()
            .map(|b| b & 0x20 != 0)
            .unwrap_or(false);
        if constructed && !tlv.value.is_empty() {
            let mut child = DecodeNode::new(format!("TLV {}", tlv.tag));
            generic_tree(&mut child, &tlv.value, depth + 1);
            if child.children.is_empty() {
                node.push(DecodeNode::leaf(format!("TLV {}", tlv.tag), tlv.value_hex()));
            } else {
                node.push(child);
            }
        } else {
            node.push(DecodeNode::leaf(format!("TLV {}", tlv.tag), tlv.value_hex()));
        }
    }
}

/// Decode the request side of an enable/disable profile operation.
///
/// Both operations target a profile by ISD-P AID or ICCID, wrapped in an
/// `A0` profileIdentifier or given bare, plus the refresh flag and an
/// optional eSIM port.
pub fn switch_request_tree(root_name: &str, value: &[u8]) -> DecodeNode {
    let mut root = DecodeNode::new(root_name);
    for tlv in ber::read_nested(value, 0) {
        match tlv.tag.as_str() {
            "A0" => {
                let mut id = DecodeNode::new("profileIdentifier");
                for inner in ber::read_nested(&tlv.value, 1) {
                    let child = match inner.tag.as_str() {
                        "4F" => DecodeNode::leaf("isdpAid", inner.value_hex()),
                        "5A" => DecodeNode::leaf("iccid", hexutil::decode_iccid(&inner.value)),
                        tag => DecodeNode::leaf(format!("TLV {}", tag), inner.value_hex()),
                    };
                    id.push(child);
                }
                root.push(id);
            }
            "4F" => root.push(DecodeNode::leaf(
                "profileIdentifier.isdpAid",
                tlv.value_hex(),
            )),
            "5A" => root.push(DecodeNode::leaf(
                "profileIdentifier.iccid",
                hexutil::decode_iccid(&tlv.value),
            )),
            "81" | "01" => {
                let flag = tlv.value.first().copied().unwrap_or(0) != 0;
                root.push(DecodeNode::leaf("refreshFlag", flag.to_string()));
            }
            "82" | "02" => root.push(DecodeNode::leaf(
                "targetEsimPort",
                hexutil::be_uint(&tlv.value).to_string(),
            )),
            tag => root.push(DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex())),
        }
    }
    root
}

/// Decode the response side of an enable/disable profile operation.
pub fn switch_response_tree(
    root_name: &str,
    result_field: &str,
    value: &[u8],
    name_of: fn(u64) -> &'static str,
) -> DecodeNode {
    let mut root = DecodeNode::new(root_name);
    for tlv in ber::read_nested(value, 0) {
        match tlv.tag.as_str() {
            "80" | "02" => {
                let code = hexutil::be_uint(&tlv.value);
                root.push(DecodeNode::leaf(
                    result_field,
                    format!("{}({})", name_of(code), code),
                ));
            }
            tag => root.push(DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex())),
        }
    }
    root
}

/// Decode one NotificationMetadata block (the value of a `BF2F` TLV).
pub fn notification_metadata(name: impl Into<String>, value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new(name);
    for tlv in ber::read_nested(value, 0) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("seqNumber", hexutil::be_uint(&tlv.value).to_string()),
            "81" => {
                let mut ops = DecodeNode::new("profileManagementOperation");
                let events = event_nodes(&tlv.value, &PROFILE_MGMT_EVENTS, "Set", "Not set");
                let any = events.iter().any(|n| n.value.as_deref() == Some("Set"));
                if any {
                    for e in events {
                        if e.value.as_deref() == Some("Set") {
                            ops.push(e);
                        }
                    }
                } else {
                    ops.push(DecodeNode::leaf(
                        "No events",
                        "All bits set to 0 (no notifications requested)",
                    ));
                }
                ops
            }
            "0C" => DecodeNode::leaf("notificationAddress", hexutil::utf8_or_hex(&tlv.value)),
            "5A" => DecodeNode::leaf("iccid", hexutil::decode_iccid(&tlv.value)),
            tag => DecodeNode::leaf(format!("Field {}", tag), hexutil::utf8_or_hex(&tlv.value)),
        };
        node.push(child);
    }
    node
}
