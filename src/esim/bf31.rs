//! `BF31` EnableProfile

use crate::error::DecodeError;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;

use super::common;

fn enable_result_name(code: u64) -> &'static str {
    match code {
        0 => "ok",
        1 => "iccidOrAidNotFound",
        2 => "profileNotInDisabledState",
        3 => "disallowedByPolicy",
        4 => "wrongProfileReenabling",
        5 => "catBusy",
        6 => "disallowedByEnterpriseRule",
        7 => "commandError",
        9 => "disallowedForRpm",
        10 => "noEsimPortAvailable",
        127 => "undefinedError",
        _ => "unknown",
    }
}

pub struct EnableProfile;

impl TagBuilder for EnableProfile {
    fn build(&self, value: &[u8], direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let root = match direction {
            DirectionHint::LpaToEsim => {
                common::switch_request_tree("EnableProfileRequest (BF31)", value)
            }
            _ => common::switch_response_tree(
                "EnableProfileResponse (BF31)",
                "enableResult",
                value,
                enable_result_name,
            ),
        };
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_with_wrapped_iccid() {
        // A0 { 5A iccid } + refreshFlag true
        let value = hex::decode("A0045A029810810101").unwrap();
        let root = EnableProfile
            .build(&value, DirectionHint::LpaToEsim)
            .unwrap();
        let id = root.find("profileIdentifier").unwrap();
        assert_eq!(id.find("iccid").and_then(|n| n.value.as_deref()), Some("8901"));
        assert_eq!(
            root.find("refreshFlag").and_then(|n| n.value.as_deref()),
            Some("true")
        );
    }

    #[test]
    fn test_request_with_bare_aid() {
        let value = hex::decode("4F03A00001").unwrap();
        let root = EnableProfile
            .build(&value, DirectionHint::LpaToEsim)
            .unwrap();
        assert_eq!(
            root.find("profileIdentifier.isdpAid")
                .and_then(|n| n.value.as_deref()),
            Some("A00001")
        );
    }

    #[test]
    fn test_response_codes() {
        let value = hex::decode("800100").unwrap();
        let root = EnableProfile
            .build(&value, DirectionHint::EsimToLpa)
            .unwrap();
        assert_eq!(
            root.find("enableResult").and_then(|n| n.value.as_deref()),
            Some("ok(0)")
        );

        let value = hex::decode("800102").unwrap();
        let root = EnableProfile
            .build(&value, DirectionHint::EsimToLpa)
            .unwrap();
        assert_eq!(
            root.find("enableResult").and_then(|n| n.value.as_deref()),
            Some("profileNotInDisabledState(2)")
        );
    }
}
