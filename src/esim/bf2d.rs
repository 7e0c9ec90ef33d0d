//! `BF2D` ProfileInfoList
//!
//! The response nests each profile in an `E3` block, sometimes wrapped in
//! an extra constructed layer depending on the card OS, so profile blocks
//! are hunted one container level deep. The request side is a search
//! criteria object, most often the bare default `BF2D 00`.

use crate::error::DecodeError;
use crate::hexutil;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;
use crate::tlv::ber;
use crate::tlv::Tlv;

use super::common;

fn requested_tag_meaning(tag: &str) -> &'static str {
    match tag {
        "5A" => "ICCID",
        "90" => "profileNickname",
        "91" => "serviceProviderName",
        "92" => "profileName",
        "93" => "iconType",
        "94" => "icon",
        "95" => "profileClass",
        "B6" => "notificationConfigurationInfo",
        "B7" => "profileOwner",
        "B8" => "dpProprietaryData",
        "99" => "profilePolicyRules",
        "9F70" => "profileState",
        "BF76" => "BF76 (unknown/vendor-specific)",
        _ => "Unknown tag",
    }
}

fn profile_node(index: usize, value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new(format!("Profile {}", index));
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "5A" => DecodeNode::leaf("ICCID", hexutil::decode_iccid(&tlv.value)),
            "4F" => DecodeNode::leaf("ISD-P AID", tlv.value_hex()),
            "9F70" => DecodeNode::leaf("Profile state", common::profile_state(&tlv.value)),
            "90" => DecodeNode::leaf("Profile Nickname", hexutil::utf8_or_hex(&tlv.value)),
            "91" => DecodeNode::leaf("Service provider name", hexutil::utf8_or_hex(&tlv.value)),
            "92" => DecodeNode::leaf("Profile name", hexutil::utf8_or_hex(&tlv.value)),
            "95" => DecodeNode::leaf("Profile Class", common::profile_class(&tlv.value)),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn is_profile_wrapper(tag: &str) -> bool {
    matches!(tag, "A0" | "A1" | "E0" | "E1" | "61" | "30")
}

fn push_profiles(root: &mut DecodeNode, tlvs: &[Tlv], index: &mut usize) {
    for tlv in tlvs {
        if tlv.tag == "E3" {
            *index += 1;
            root.push(profile_node(*index, &tlv.value));
        }
    }
}

fn response_tree(value: &[u8]) -> DecodeNode {
    let mut root = DecodeNode::new("ProfileInfoListResponse (BF2D)");
    let mut index = 0;

    for tlv in ber::read_nested(value, 0) {
        if tlv.tag == "E3" {
            index += 1;
            root.push(profile_node(index, &tlv.value));
        } else if is_profile_wrapper(&tlv.tag) {
            let inner = ber::read_nested(&tlv.value, 1);
            if inner.iter().any(|t| t.tag == "E3") {
                push_profiles(&mut root, &inner, &mut index);
            } else {
                root.push(DecodeNode::leaf(format!("TLV {}", tlv.tag), tlv.value_hex()));
            }
        } else {
            root.push(DecodeNode::leaf(format!("TLV {}", tlv.tag), tlv.value_hex()));
        }
    }
    root
}

fn request_tree(value: &[u8]) -> DecodeNode {
    let mut root = DecodeNode::new("ProfileInfoListRequest (BF2D)");
    if value.is_empty() || value == [0x00] {
        return root.with_hint("Default request (BF2D 00)");
    }
    for tlv in ber::read_nested(value, 0) {
        match tlv.tag.as_str() {
            "5C" => {
                let mut req = DecodeNode::new("Requested Tags (5C)");
                for tag in tag_list(&tlv.value) {
                    req.push(DecodeNode::leaf(tag.clone(), requested_tag_meaning(&tag)));
                }
                root.push(req);
            }
            "4F" => root.push(DecodeNode::leaf(
                "searchCriteria.isdpAid (4F)",
                tlv.value_hex(),
            )),
            "5A" => root.push(DecodeNode::leaf(
                "searchCriteria.iccid (5A)",
                hexutil::decode_iccid(&tlv.value),
            )),
            "95" => root.push(DecodeNode::leaf(
                "searchCriteria.profileClass (95)",
                common::profile_class(&tlv.value),
            )),
            tag => root.push(DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex())),
        }
    }
    root
}

/// Split a `5C` value into tag strings, honoring two-byte tags.
fn tag_list(value: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < value.len() {
        let b = value[i];
        if matches!(b, 0x9F | 0x5F | 0x7F | 0xBF) && i + 1 < value.len() {
            out.push(format!("{:02X}{:02X}", b, value[i + 1]));
            i += 2;
        } else {
            out.push(format!("{:02X}", b));
            i += 1;
        }
    }
    out
}

pub struct ProfileInfoList;

impl TagBuilder for ProfileInfoList {
    /// The direction hint is authoritative for the request/response
    /// split; `E3` presence only guides the wrapper hunt inside the
    /// response walker.
    fn build(&self, value: &[u8], direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let root = match direction {
            DirectionHint::LpaToEsim => request_tree(value),
            _ => response_tree(value),
        };
        Ok(root)
    }
}
