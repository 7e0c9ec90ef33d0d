//! eSIM RSP decoding
//!
//! The engine strips the STORE DATA transport when present, walks the
//! top-level BER TLVs and dispatches each `BFxx` object to its registered
//! builder. Builder failures stay local: the tag becomes an error leaf
//! and the remaining siblings are still decoded. Responses that carry no
//! tagged object at all are treated as bare profile-element status
//! sequences.

pub mod bf20;
pub mod bf22;
pub mod bf28;
pub mod bf2d;
pub mod bf2e;
pub mod bf31;
pub mod bf32;
pub mod bf37;
pub mod bf38;
pub mod common;
pub mod euicc_response;

use log::warn;

use crate::apdu::parse_header;
use crate::hexutil;
use crate::model::{DecodeNode, DirectionHint, MsgType};
use crate::registry;
use crate::tlv::ber;
use crate::tlv::Tlv;

/// Decoded eSIM message: the tree plus per-tag decode errors.
#[derive(Debug, Clone)]
pub struct EsimTree {
    pub root: DecodeNode,
    pub errors: Vec<String>,
}

fn payload_of(raw: &str, direction: DirectionHint) -> Vec<u8> {
    if direction == DirectionHint::LpaToEsim
        && raw.len() > 10
        && parse_header(raw).is_store_data()
    {
        let mut body = hexutil::bytes_of(&raw[10..]);
        // Le artifact from the capture layer.
        if body.last() == Some(&0x00) && ber::read_list(&body).1 == body.len() - 1 {
            body.pop();
        }
        return body;
    }
    hexutil::bytes_of(raw)
}

fn generic_container(tlv: &Tlv) -> DecodeNode {
    let mut node = DecodeNode::new(format!("Unknown eSIM container {}", tlv.tag));
    for inner in ber::read_nested(&tlv.value, 1) {
        node.push(DecodeNode::leaf(
            format!("TLV {}", inner.tag),
            inner.value_hex(),
        ));
    }
    if node.children.is_empty() {
        node.value = Some(tlv.value_hex());
    }
    node
}

fn node_for(tlv: &Tlv, direction: DirectionHint, errors: &mut Vec<String>) -> DecodeNode {
    match registry::resolve(MsgType::Esim, &tlv.tag) {
        Some(builder) => match builder.build(&tlv.value, direction) {
            Ok(node) => node,
            Err(e) => {
                warn!("builder for {} failed: {}", tlv.tag, e);
                errors.push(e.to_string());
                DecodeNode::leaf(format!("Decode error in {}", tlv.tag), e.to_string())
            }
        },
        None if tlv.tag.starts_with("BF") => {
            let mut node = DecodeNode::new(format!("TLV {}", tlv.tag));
            common::generic_tree(&mut node, &tlv.value, 1);
            if node.children.is_empty() {
                node.value = Some(tlv.preview());
                node.hint = Some(format!("{} bytes", tlv.length()));
            }
            node
        }
        None => generic_container(tlv),
    }
}

/// Decode an eSIM message from its canonical hex form.
pub fn decode(raw: &str, direction: DirectionHint) -> EsimTree {
    let payload = payload_of(raw, direction);
    let mut errors = Vec::new();

    if payload.is_empty() {
        return EsimTree {
            root: DecodeNode::new("eSIM (empty)"),
            errors,
        };
    }

    let (tlvs, _) = ber::read_list(&payload);

    // A response with no tagged RSP object is a bare status sequence.
    if direction == DirectionHint::EsimToLpa && !tlvs.is_empty()
        && !tlvs.iter().any(|t| t.tag.starts_with("BF"))
    {
        return EsimTree {
            root: euicc_response::decode(&payload),
            errors,
        };
    }

    if tlvs.is_empty() {
        return EsimTree {
            root: DecodeNode::leaf("eSIM (opaque)", hexutil::to_hex(&payload)),
            errors,
        };
    }

    let mut nodes: Vec<DecodeNode> = tlvs
        .iter()
        .map(|t| node_for(t, direction, &mut errors))
        .collect();

    let root = if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        let mut root = DecodeNode::new("eSIM");
        root.children = nodes;
        root
    };

    EsimTree { root, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_dispatches_builder() {
        let tree = decode("BF2E120410000102030405060708090A0B0C0D0E0F", DirectionHint::EsimToLpa);
        assert_eq!(tree.root.name, "GetEuiccChallenge (BF2E)");
        assert!(tree.errors.is_empty());
    }

    #[test]
    fn test_store_data_header_is_stripped() {
        let tree = decode("80E2910003BF310000", DirectionHint::LpaToEsim);
        assert_eq!(tree.root.name, "EnableProfileRequest (BF31)");
    }

    #[test]
    fn test_unregistered_bf_tag_passthrough() {
        let tree = decode("BF7F02AABB", DirectionHint::EsimToLpa);
        assert_eq!(tree.root.name, "TLV BF7F");
        assert_eq!(tree.root.value.as_deref(), Some("AABB"));
    }

    #[test]
    fn test_unregistered_bf_tag_keeps_structure() {
        // BF39 has no field-level builder but its BER structure must
        // still be expanded recursively.
        let tree = decode("BF390AA0088003AABBCC810100", DirectionHint::EsimToLpa);
        assert_eq!(tree.root.name, "TLV BF39");
        let a0 = tree.root.find("TLV A0").unwrap();
        assert_eq!(a0.find("TLV 80").and_then(|n| n.value.as_deref()), Some("AABBCC"));
        assert_eq!(a0.find("TLV 81").and_then(|n| n.value.as_deref()), Some("00"));
    }

    #[test]
    fn test_bare_status_response() {
        let tree = decode("3006800100810101", DirectionHint::EsimToLpa);
        assert_eq!(tree.root.name, "EUICCResponse");
        assert_eq!(tree.root.children[0].value.as_deref(), Some("ok(0)"));
    }

    #[test]
    fn test_empty_payload() {
        let tree = decode("", DirectionHint::EsimToLpa);
        assert_eq!(tree.root.name, "eSIM (empty)");
    }

    #[test]
    fn test_unknown_container_in_request() {
        let tree = decode("80E2910005E403AA01BB", DirectionHint::LpaToEsim);
        assert_eq!(tree.root.name, "Unknown eSIM container E4");
    }
}
