//! `BF32` DisableProfile

use crate::error::DecodeError;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;

use super::common;

fn disable_result_name(code: u64) -> &'static str {
    match code {
        0 => "ok",
        1 => "iccidOrAidNotFound",
        2 => "profileNotInEnabledState",
        3 => "disallowedByPolicy",
        5 => "catBusy",
        7 => "commandError",
        10 => "disallowedForRpm",
        127 => "undefinedError",
        _ => "unknown",
    }
}

pub struct DisableProfile;

impl TagBuilder for DisableProfile {
    fn build(&self, value: &[u8], direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let root = match direction {
            DirectionHint::LpaToEsim => {
                common::switch_request_tree("DisableProfileRequest (BF32)", value)
            }
            _ => common::switch_response_tree(
                "DisableProfileResponse (BF32)",
                "disableResult",
                value,
                disable_result_name,
            ),
        };
        Ok(root)
    }
}
