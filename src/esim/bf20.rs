//! `BF20` EUICCInfo1
//!
//! The slim info object used before authentication: the SVN and the two
//! CI public-key identifier lists. Requests arrive with an empty body.

use crate::error::DecodeError;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;
use crate::tlv::ber;

use super::bf22::RSP_CAPABILITIES;
use super::common;

pub struct EuiccInfo1;

impl TagBuilder for EuiccInfo1 {
    fn build(&self, value: &[u8], direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let mut root = DecodeNode::new("EUICCInfo1 (BF20)");
        if value.is_empty() {
            let hint = match direction {
                DirectionHint::LpaToEsim => "GetEuiccInfo1Request (empty body)",
                _ => "Empty EUICCInfo1",
            };
            return Ok(root.with_hint(hint));
        }
        for tlv in ber::read_nested(value, 0) {
            let child = match tlv.tag.as_str() {
                "82" => DecodeNode::leaf("svn", common::version(&tlv.value)),
                "88" => {
                    let mut cap = DecodeNode::new("euiccRspCapability");
                    cap.children = common::capability_nodes(&tlv.value, &RSP_CAPABILITIES);
                    cap
                }
                "A9" => ci_list("euiccCiPKIdListForVerification", &tlv.value),
                "AA" => ci_list("euiccCiPKIdListForSigning", &tlv.value),
                tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
            };
            root.push(child);
        }
        Ok(root)
    }
}

fn ci_list(name: &str, value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new(name);
    for (i, tlv) in ber::read_nested(value, 1).iter().enumerate() {
        node.push(DecodeNode::leaf(format!("PKId {}", i + 1), tlv.value_hex()));
    }
    node
}
