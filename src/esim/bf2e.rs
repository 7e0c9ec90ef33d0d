//! `BF2E` GetEuiccChallenge

use crate::error::DecodeError;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;
use crate::tlv::ber;

pub struct GetEuiccChallenge;

impl TagBuilder for GetEuiccChallenge {
    fn build(&self, value: &[u8], direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let mut root = DecodeNode::new("GetEuiccChallenge (BF2E)");
        if value.is_empty() {
            let hint = match direction {
                DirectionHint::LpaToEsim => "Request (empty body)",
                _ => "Empty response",
            };
            return Ok(root.with_hint(hint));
        }
        for tlv in ber::read_nested(value, 0) {
            match tlv.tag.as_str() {
                "04" => {
                    let mut node = DecodeNode::leaf("euiccChallenge", tlv.value_hex());
                    if tlv.length() != 16 {
                        node.hint = Some(format!(
                            "Invalid length: {} bytes (expected 16)",
                            tlv.length()
                        ));
                    } else {
                        node.hint = Some("16-byte random challenge".to_string());
                    }
                    root.push(node);
                }
                tag => root.push(DecodeNode::leaf(format!("Unknown TLV {}", tag), tlv.value_hex())),
            }
        }
        Ok(root)
    }
}
