//! Proactive command decoding
//!
//! Builds the decode tree for SIM Toolkit traffic in both directions:
//! `D0` proactive commands fetched from the card, and the terminal-side
//! TERMINAL PROFILE / FETCH / TERMINAL RESPONSE / ENVELOPE APDUs. The
//! Comprehension-TLV payload is walked once and each tag is rendered by
//! the matching routine in [`fields`]; parsing diagnostics become leaf
//! nodes so malformed captures still produce a partial tree.

pub mod fields;

use crate::error::DecodeError;
use crate::hexutil;
use crate::model::{DecodeNode, DirectionHint, MsgType};
use crate::registry::{self, TagBuilder};
use crate::tlv::comp::{self, CompEntry};

/// Decoded proactive message: the tree plus any parsing diagnostics.
#[derive(Debug, Clone)]
pub struct ProactiveTree {
    pub root: DecodeNode,
    pub warnings: Vec<String>,
}

fn node_for_tlv(tag_seen: u8, value: &[u8]) -> DecodeNode {
    let tag = comp::canonical_tag(tag_seen);
    let text: Option<(&str, String)> = match tag {
        0x01 => Some(("Command details", fields::command_details(value))),
        0x02 => Some(("Device identities", fields::device_identities(value))),
        0x03 => Some(("Result", fields::result_details(value))),
        0x04 => Some(("Duration", fields::duration(value))),
        0x05 => Some(("Alpha identifier", hexutil::utf8_or_hex(value))),
        0x06 => Some(("Address", fields::address(value))),
        0x0B => Some(("SMS TPDU", hexutil::to_hex(value))),
        0x13 => Some(("Location Info", fields::location_info(value))),
        0x14 => Some(("IMEI", fields::imei(value))),
        0x19 => Some(("Event List", fields::event_list(value))),
        0x21 => Some(("Card ATR", hexutil::to_hex(value))),
        0x22 => Some(("C-APDU", hexutil::to_hex(value))),
        0x24 => Some(("Timer identifier", fields::timer_identifier(value))),
        0x25 => Some(("Timer", fields::timer_value(value))),
        0x26 => Some(("Date/Time/TZ", hexutil::nibble_swap(value))),
        0x2F => Some(("AID", hexutil::to_hex(value))),
        0x35 => Some(("Bearer description", fields::bearer_description(value))),
        0x36 => Some(("Channel data", hexutil::to_hex(value))),
        0x37 => Some(("Channel data length", hexutil::be_uint(value).to_string())),
        0x38 => Some(("Channel status", fields::channel_status(value))),
        0x39 => Some(("Buffer size", hexutil::be_uint(value).to_string())),
        0x3C => Some(("Transport Protocol", fields::transport_protocol(value))),
        0x3E => Some(("Data dest address", fields::dest_address(value))),
        0x3F => Some(("Access Technology", fields::access_technology(value))),
        0x47 => Some(("Network Access Name", fields::network_access_name(value))),
        0x56 => Some(("CSG ID", hexutil::to_hex(value))),
        0x57 => Some(("Timer Expiration", fields::timer_value(value))),
        0x60 => Some(("MAC", hexutil::to_hex(value))),
        0x62 => Some(("IMEISV", fields::imei(value))),
        0x6C => Some(("MMS Transfer Status", hexutil::to_hex(value))),
        0x7C => Some((
            "EPS PDN connection activation parameters",
            hexutil::to_hex(value),
        )),
        0x7D => Some(("MCCMNC+TAC", fields::mccmnc_with_tac(value))),
        0x7E => Some(("CSG ID list", hexutil::to_hex(value))),
        _ => None,
    };
    match text {
        Some((name, rendered)) => {
            DecodeNode::leaf(format!("{} ({:02X})", name, tag), rendered)
        }
        None => DecodeNode::new(format!(
            "Unknown tag: {:02X} length: {} value: {}",
            tag_seen,
            value.len(),
            hexutil::to_hex(value)
        )),
    }
}

/// Walk a Comprehension-TLV payload into child nodes.
///
/// Returns the nodes, any diagnostics, and the name of the first command
/// found in a Command details object.
pub fn comp_tree(payload: &[u8]) -> (Vec<DecodeNode>, Vec<String>, Option<&'static str>) {
    let mut nodes = Vec::new();
    let mut warnings = Vec::new();
    let mut command = None;

    for entry in comp::scan(payload) {
        match entry {
            CompEntry::Tlv(tlv) => {
                let tag_seen = hexutil::bytes_of(&tlv.tag)[0];
                if command.is_none() && comp::canonical_tag(tag_seen) == 0x01 {
                    command = fields::command_name(&tlv.value);
                }
                nodes.push(node_for_tlv(tag_seen, &tlv.value));
            }
            CompEntry::Error(text) => {
                nodes.push(DecodeNode::new(text.clone()));
                warnings.push(text);
            }
        }
    }

    (nodes, warnings, command)
}

/// Extract the value of the outer `D0` TLV.
///
/// Only the one-byte and `81`-prefixed length forms occur here; anything
/// else yields an empty payload.
fn d0_payload(raw: &str) -> Vec<u8> {
    let bytes = hexutil::bytes_of(raw);
    if bytes.len() < 2 {
        return Vec::new();
    }
    let (len, start) = match bytes[1] {
        l if l < 0x80 => (l as usize, 2),
        0x81 if bytes.len() >= 3 => (bytes[2] as usize, 3),
        _ => return Vec::new(),
    };
    let end = (start + len).min(bytes.len());
    bytes[start..end].to_vec()
}

fn comp_root(base: &str, separator: &str, payload: &[u8]) -> DecodeNode {
    let (children, _, command) = comp_tree(payload);
    let mut root = match command {
        Some(cmd) => DecodeNode::new(format!("{}{}{}", base, separator, cmd)),
        None => DecodeNode::new(base),
    };
    root.children = children;
    root
}

/// Builder for the `D0` proactive fetch payload.
pub struct ProactiveCommand;

impl TagBuilder for ProactiveCommand {
    fn build(&self, value: &[u8], _direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        Ok(comp_root("Proactive UICC (D0)", ": ", value))
    }
}

/// Builder for the TERMINAL RESPONSE (`80 14`) body.
pub struct TerminalResponse;

impl TagBuilder for TerminalResponse {
    fn build(&self, value: &[u8], _direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        Ok(comp_root("TERMINAL RESPONSE", " - ", value))
    }
}

/// Builder for the ENVELOPE (`80 C2`) body.
pub struct Envelope;

impl TagBuilder for Envelope {
    fn build(&self, value: &[u8], _direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        Ok(comp_root("ENVELOPE", " - ", value))
    }
}

/// Diagnostics are embedded as leaf nodes; lift them back out for the
/// warnings list.
fn collect_warnings(root: &DecodeNode) -> Vec<String> {
    root.children
        .iter()
        .filter(|n| n.name.starts_with("Parsing error:"))
        .map(|n| n.name.clone())
        .collect()
}

/// Decode a proactive message starting from its canonical hex form.
///
/// `D0` fetch results carry the Comprehension-TLV payload in the outer
/// TLV; TERMINAL RESPONSE and ENVELOPE carry it after the 5-byte APDU
/// header. TERMINAL PROFILE and FETCH have no TLV payload and come back
/// as a single leaf.
pub fn decode(raw: &str) -> ProactiveTree {
    let (tag, payload): (&str, Vec<u8>) = if raw.starts_with("D0") {
        ("D0", d0_payload(raw))
    } else {
        let ins = hexutil::bytes_of(raw).get(1).copied();
        let body = || hexutil::bytes_of(raw.get(10..).unwrap_or(""));
        match ins {
            Some(0x14) => ("8014", body()),
            Some(0xC2) => ("80C2", body()),
            Some(0x10) => {
                return ProactiveTree {
                    root: DecodeNode::leaf(
                        "TERMINAL PROFILE (80 10)",
                        raw.get(10..).unwrap_or("").to_string(),
                    ),
                    warnings: Vec::new(),
                }
            }
            Some(0x12) => {
                return ProactiveTree {
                    root: DecodeNode::leaf(
                        "FETCH (80 12)",
                        raw.get(10..).unwrap_or("").to_string(),
                    ),
                    warnings: Vec::new(),
                }
            }
            _ => {
                return ProactiveTree {
                    root: DecodeNode::new("Proactive"),
                    warnings: Vec::new(),
                }
            }
        }
    };

    match registry::resolve(MsgType::Proactive, tag)
        .and_then(|b| b.build(&payload, DirectionHint::Unknown).ok())
    {
        Some(root) => {
            let warnings = collect_warnings(&root);
            ProactiveTree { root, warnings }
        }
        None => ProactiveTree {
            root: DecodeNode::new("Proactive"),
            warnings: Vec::new(),
        },
    }
}
