//! `BF37` ProfileInstallationResult
//!
//! Sent by the card at the end of a bound profile package load. The
//! interesting part is the final result: success carries the ISD-P AID
//! and per-element status blocks, failure names the BPP command that
//! broke and why.

use crate::error::DecodeError;
use crate::hexutil;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;
use crate::tlv::ber;

use super::common::pe_status_name;

fn bpp_command_name(code: u64) -> &'static str {
    match code {
        0 => "initialiseSecureChannel",
        1 => "configureISDP",
        2 => "storeMetadata",
        3 => "storeMetadata2",
        4 => "replaceSessionKeys",
        5 => "loadProfileElements",
        _ => "unknown",
    }
}

fn error_reason_name(code: u64) -> &'static str {
    match code {
        1 => "incorrectInputValues",
        2 => "invalidSignature",
        3 => "invalidTransactionId",
        4 => "unsupportedCrtValues",
        5 => "unsupportedRemoteOperationType",
        6 => "unsupportedProfileClass",
        7 => "bspStructureError",
        8 => "bspSecurityError",
        9 => "installFailedDueToIccidAlreadyExistsOnEuicc",
        10 => "installFailedDueToInsufficientMemoryForProfile",
        11 => "installFailedDueToInterruption",
        12 => "installFailedDueToPEProcessingError",
        13 => "installFailedDueToDataMismatch",
        14 => "testProfileInstallFailedDueToInvalidNaaKey",
        15 => "pprNotAllowed",
        17 => "enterpriseProfilesNotSupported",
        18 => "enterpriseRulesNotAllowed",
        19 => "enterpriseProfileNotAllowed",
        20 => "enterpriseOidMismatch",
        21 => "enterpriseRulesError",
        22 => "enterpriseProfilesOnly",
        23 => "lprNotSupported",
        26 => "unknownTlvInMetadata",
        127 => "installFailedDueToUnknownError",
        _ => "unknown",
    }
}

fn pe_status(value: &[u8], depth: usize) -> DecodeNode {
    let mut node = DecodeNode::new("peStatus");
    for tlv in ber::read_nested(value, depth) {
        let child = match tlv.tag.as_str() {
            "80" => {
                let code = hexutil::be_uint(&tlv.value);
                DecodeNode::leaf("status", format!("{}({})", pe_status_name(code), code))
            }
            "81" => DecodeNode::leaf(
                "identification number",
                hexutil::be_uint(&tlv.value).to_string(),
            ),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn final_result(name: &str, value: &[u8], failed: bool) -> DecodeNode {
    let mut node = DecodeNode::new(name);
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "4F" => DecodeNode::leaf("AID", tlv.value_hex()),
            "30" | "A3" => pe_status(&tlv.value, 2),
            "80" if failed => {
                let code = hexutil::be_uint(&tlv.value);
                DecodeNode::leaf("bppCommandId", format!("{}({})", bpp_command_name(code), code))
            }
            "81" if failed => {
                let code = hexutil::be_uint(&tlv.value);
                DecodeNode::leaf("errorReason", format!("{}({})", error_reason_name(code), code))
            }
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn metadata(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("notificationMetadata (BF2F)");
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("seqNumber", tlv.value_hex()),
            "81" => DecodeNode::leaf("profileManagementOperation", tlv.value_hex()),
            "0C" => DecodeNode::leaf("notificationAddress", hexutil::utf8_or_hex(&tlv.value)),
            "5A" => DecodeNode::leaf("iccid", hexutil::decode_iccid(&tlv.value)),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn result_fields(parent: &mut DecodeNode, value: &[u8], depth: usize) {
    for tlv in ber::read_nested(value, depth) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("transactionId", tlv.value_hex()),
            "BF2F" => metadata(&tlv.value),
            "06" => DecodeNode::leaf("smdpOid", tlv.value_hex()),
            "A0" => final_result("Installation success", &tlv.value, false),
            "A1" => final_result("InstallationFail", &tlv.value, true),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        parent.push(child);
    }
}

pub struct ProfileInstallationResult;

impl TagBuilder for ProfileInstallationResult {
    fn build(&self, value: &[u8], _direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let mut root = DecodeNode::new("ProfileInstallationResult (BF37)");
        let tlvs = ber::read_nested(value, 0);
        if tlvs.iter().any(|t| t.tag == "BF27") {
            for tlv in &tlvs {
                match tlv.tag.as_str() {
                    "BF27" => {
                        let mut data = DecodeNode::new("profileInstallationResultData (BF27)");
                        result_fields(&mut data, &tlv.value, 1);
                        root.push(data);
                    }
                    "5F37" => root.push(DecodeNode::leaf("euiccSignPIR", tlv.value_hex())),
                    tag => root.push(DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex())),
                }
            }
        } else {
            // Some cards skip the BF27 wrapper.
            result_fields(&mut root, value, 0);
        }
        Ok(root)
    }
}
