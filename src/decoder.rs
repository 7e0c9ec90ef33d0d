//! Top-level decode pipeline
//!
//! One captured message goes through classification and the matching
//! engine; a whole capture additionally gets its chained STORE DATA runs
//! reassembled first. Decoding never fails on message content, only on
//! input that is not hex at all.

use log::debug;

use crate::apdu::reassemble;
use crate::classify::{classify, Classification};
use crate::error::DecodeError;
use crate::esim;
use crate::hexutil;
use crate::model::{DecodeNode, LinkDirection, MsgType, ParseResult, RawMessage};
use crate::proactive;

/// Decode one canonical-hex message.
pub fn decode_message(msg: &RawMessage) -> ParseResult {
    let Classification {
        msg_type,
        direction,
        tag,
        title,
    } = classify(&msg.raw);
    debug!("decoding {} as {:?}", title, msg_type);

    let mut result = match msg_type {
        MsgType::Proactive => {
            let tree = proactive::decode(&msg.raw);
            ParseResult {
                msg_type,
                direction_hint: direction,
                tag,
                title: format!("{}: {}", direction, tree.root.name),
                root: tree.root,
                warnings: tree.warnings,
                errors: Vec::new(),
                raw: msg.raw.clone(),
            }
        }
        MsgType::Esim => {
            let tree = esim::decode(&msg.raw, direction);
            ParseResult {
                msg_type,
                direction_hint: direction,
                tag,
                title,
                root: tree.root,
                warnings: Vec::new(),
                errors: tree.errors,
                raw: msg.raw.clone(),
            }
        }
        _ => ParseResult {
            msg_type,
            direction_hint: direction,
            tag,
            title,
            root: DecodeNode::leaf("SIM APDU", msg.raw.clone()),
            warnings: Vec::new(),
            errors: Vec::new(),
            raw: msg.raw.clone(),
        },
    };

    if let Some(meta) = &msg.meta {
        if result.root.hint.is_none() {
            result.root.hint = Some(meta.clone());
        }
    }
    result
}

/// Normalize captured text and decode it as a single message.
pub fn decode_hex(input: &str, direction: LinkDirection) -> Result<ParseResult, DecodeError> {
    let raw = hexutil::normalize(input)?;
    Ok(decode_message(&RawMessage::new(raw, direction)))
}

/// Decode a whole capture: STORE DATA chains are merged first, then each
/// logical message is decoded independently.
pub fn decode_log(messages: &[RawMessage]) -> Vec<ParseResult> {
    reassemble::coalesce(messages)
        .iter()
        .map(decode_message)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DirectionHint;

    #[test]
    fn test_proactive_title_carries_command_name() {
        let r = decode_hex("D0068103012100", LinkDirection::Rx).unwrap();
        assert_eq!(r.msg_type, MsgType::Proactive);
        assert_eq!(r.title, "UICC=>TERMINAL: Proactive UICC (D0): DISPLAY TEXT");
        assert!(r.warnings.is_empty());
        assert!(r.errors.is_empty());
    }

    #[test]
    fn test_normalization_applies_before_decode() {
        let r = decode_hex("d0 06 81 03 01 21 00", LinkDirection::Rx).unwrap();
        assert_eq!(r.raw, "D0068103012100");
        let again = decode_hex(&r.raw, LinkDirection::Rx).unwrap();
        assert_eq!(again.root, r.root);
    }

    #[test]
    fn test_non_hex_is_rejected() {
        assert_eq!(
            decode_hex("not hex", LinkDirection::Rx).unwrap_err(),
            DecodeError::NotHex
        );
    }

    #[test]
    fn test_esim_response_title_from_table() {
        let r = decode_hex("BF2E1204100102030405060708090A0B0C0D0E0F10", LinkDirection::Rx).unwrap();
        assert_eq!(r.title, "ESIM=>LPA: GetEuiccChallengeResponse");
        assert_eq!(r.direction_hint, DirectionHint::EsimToLpa);
        assert_eq!(r.tag.as_deref(), Some("BF2E"));
    }

    #[test]
    fn test_normal_sim_is_a_leaf() {
        let r = decode_hex("00A4040007A0000002471001", LinkDirection::Tx).unwrap();
        assert_eq!(r.msg_type, MsgType::NormalSim);
        assert_eq!(r.title, "SIM APDU");
        assert!(r.root.children.is_empty());
    }

    #[test]
    fn test_log_reassembles_store_data() {
        let msgs = vec![
            RawMessage::new("80E2110004BF38061122", LinkDirection::Tx),
            RawMessage::new("80E21101023344", LinkDirection::Tx),
            RawMessage::new("80E2910203556600", LinkDirection::Tx),
        ];
        let results = decode_log(&msgs);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "LPA=>ESIM: AuthenticateServerRequest");
        assert_eq!(
            results[0].root.hint.as_deref(),
            Some("reassembled from 3 segments")
        );
    }

    #[test]
    fn test_log_keeps_interleaved_traffic() {
        let msgs = vec![
            RawMessage::new("D0068103012100", LinkDirection::Rx),
            RawMessage::new("80140000088103012100830100", LinkDirection::Tx),
        ];
        let results = decode_log(&msgs);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].msg_type, MsgType::Proactive);
        assert!(results[1].title.contains("TERMINAL RESPONSE"));
    }
}
