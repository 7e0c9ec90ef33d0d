//! Header classification
//!
//! First-match rules over the leading bytes of a captured message decide
//! the protocol family, the direction hint and the list title. The
//! `BFxx` title tables are an external contract shared with existing
//! tooling and are reproduced entry for entry; request and response sides
//! intentionally differ for most tags.

use log::debug;

use crate::apdu::{self, parse_header};
use crate::model::{DirectionHint, MsgType};

/// Response-side title for a `BFxx` top tag (eUICC to LPA).
pub fn response_title(tag: &str) -> Option<&'static str> {
    let name = match tag {
        "BF20" => "EUICCInfo1",
        "BF21" => "PrepareDownloadResponse",
        "BF22" => "EUICCInfo2",
        "BF27" => "Reserved",
        "BF28" => "ListNotificationResponse",
        "BF29" => "SetNicknameResponse",
        "BF2A" => "UpdateMetadataResponse",
        "BF2B" => "RetrieveNotificationsListResponse",
        "BF2D" => "ProfileInfoListResponse",
        "BF2E" => "GetEuiccChallengeResponse",
        "BF2F" => "NotificationMetadata",
        "BF30" => "NotificationSentResponse",
        "BF31" => "EnableProfileResponse",
        "BF32" => "DisableProfileResponse",
        "BF33" => "DeleteProfileResponse",
        "BF34" => "EuiccMemoryResetResponse",
        "BF35" => "Reserved",
        "BF36" => "BoundProfilePackage",
        "BF37" => "ProfileInstallationResult",
        "BF38" => "AuthenticateServerResponse",
        "BF39" => "InitiateAuthenticationResponse",
        "BF3A" => "GetBoundProfilePackageResponse",
        "BF3B" => "AuthenticateClientResponseEs9",
        "BF3C" => "EuiccConfiguredDataResponse",
        "BF3D" => "HandleNotification",
        "BF3E" => "GetEuiccDataResponse",
        "BF3F" => "SetDefaultDpAddressResponse",
        "BF40" => "AuthenticateClientResponseEs11",
        "BF41" => "CancelSessionResponse",
        "BF42" => "LpaeActivationResponse",
        "BF43" => "GetRatResponse",
        "BF44" => "LoadRpmPackageResult",
        "BF45" => "VerifySmdsResponseResponse",
        "BF46" => "CheckEventResponse",
        "BF4A" => "AlertData",
        "BF4B" => "VerifyDeviceChangeResponse",
        "BF4C" => "ConfirmDeviceChangeResponse",
        "BF4D" => "PrepareDeviceChangeResponse",
        _ => return None,
    };
    Some(name)
}

/// Request-side title for a `BFxx` top tag (LPA to eUICC).
pub fn request_title(tag: &str) -> Option<&'static str> {
    let name = match tag {
        "BF20" => "GetEuiccInfo1Request",
        "BF21" => "PrepareDownloadRequest",
        "BF22" => "GetEuiccInfo2Request",
        "BF23" => "InitialiseSecureChannelRequest",
        "BF24" => "ConfigureISDPRequest",
        "BF25" => "StoreMetadataRequest",
        "BF26" => "ReplaceSessionKeysRequest",
        "BF27" => "Reserved",
        "BF28" => "ListNotificationRequest",
        "BF29" => "SetNicknameRequest",
        "BF2A" => "UpdateMetadataRequest",
        "BF2B" => "RetrieveNotificationsListRequest",
        "BF2D" => "ProfileInfoListRequest",
        "BF2E" => "GetEuiccChallengeRequest",
        "BF2F" => "NotificationMetadata",
        "BF30" => "NotificationSentRequest",
        "BF31" => "EnableProfileRequest",
        "BF32" => "DisableProfileRequest",
        "BF33" => "DeleteProfileRequest",
        "BF34" => "EuiccMemoryResetRequest",
        "BF35" => "Reserved",
        "BF36" => "BoundProfilePackage",
        "BF37" => "ProfileInstallationResult",
        "BF38" => "AuthenticateServerRequest",
        "BF39" => "InitiateAuthenticationRequest",
        "BF3A" => "GetBoundProfilePackageRequest",
        "BF3B" => "AuthenticateClientRequestEs9",
        "BF3C" => "EuiccConfiguredDataRequest",
        "BF3D" => "HandleNotification",
        "BF3E" => "GetEuiccDataRequest",
        "BF3F" => "SetDefaultDpAddressRequest",
        "BF40" => "AuthenticateClientRequestEs11",
        "BF41" => "CancelSessionRequest",
        "BF42" => "LpaeActivationRequest",
        "BF43" => "GetRatRequest",
        "BF44" => "LoadRpmPackageRequest",
        "BF45" => "VerifySmdsResponsesRequest",
        "BF46" => "CheckEventRequest",
        "BF4A" => "AlertData",
        "BF4B" => "VerifyDeviceChangeRequest",
        "BF4C" => "ConfirmDeviceChangeRequest",
        "BF4D" => "PrepareDeviceChangeRequest",
        _ => return None,
    };
    Some(name)
}

/// Human name of a terminal-side proactive instruction.
pub fn proactive_ins_name(ins: u8) -> Option<&'static str> {
    match ins {
        0x10 => Some("TERMINAL PROFILE"),
        0x12 => Some("FETCH"),
        0x14 => Some("TERMINAL RESPONSE"),
        0xC2 => Some("ENVELOPE"),
        _ => None,
    }
}

/// Outcome of header classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub msg_type: MsgType,
    pub direction: DirectionHint,
    pub tag: Option<String>,
    pub title: String,
}

/// Classify a canonical hex message by its leading bytes.
///
/// Rule order matters and the first match wins:
/// 1. `BF..` with at least two bytes: eSIM response.
/// 2. `D0..`: proactive command from the card.
/// 3. `CLA 80` with INS 10/12/14/C2: terminal-side proactive traffic.
/// 4. STORE DATA (`INS E2` on the observed CLA ranges): eSIM request.
/// 5. Anything else: plain SIM APDU.
pub fn classify(raw: &str) -> Classification {
    if raw.starts_with("BF") && raw.len() >= 4 {
        let tag = raw[..4].to_string();
        let name = response_title(&tag).unwrap_or(tag.as_str());
        let c = Classification {
            msg_type: MsgType::Esim,
            direction: DirectionHint::EsimToLpa,
            title: format!("{}: {}", DirectionHint::EsimToLpa, name),
            tag: Some(tag),
        };
        debug!("classified as {}", c.title);
        return c;
    }

    if raw.starts_with("D0") {
        return Classification {
            msg_type: MsgType::Proactive,
            direction: DirectionHint::UiccToTerminal,
            tag: Some("D0".to_string()),
            title: format!(
                "{}: Proactive UICC (D0)",
                DirectionHint::UiccToTerminal
            ),
        };
    }

    let hdr = parse_header(raw);

    if hdr.cla == Some(0x80) {
        if let Some(name) = hdr.ins.and_then(proactive_ins_name) {
            return Classification {
                msg_type: MsgType::Proactive,
                direction: DirectionHint::TerminalToUicc,
                tag: hdr.ins.map(|i| format!("80{:02X}", i)),
                title: format!("{}: {}", DirectionHint::TerminalToUicc, name),
            };
        }
    }

    if hdr.is_store_data() {
        let tag = apdu::first_tag_after_store_header(raw);
        let title = match tag.as_deref().and_then(request_title) {
            Some(name) => format!("{}: {}", DirectionHint::LpaToEsim, name),
            None => format!("{}: eSIM STORE DATA (E2)", DirectionHint::LpaToEsim),
        };
        return Classification {
            msg_type: MsgType::Esim,
            direction: DirectionHint::LpaToEsim,
            tag: tag.or_else(|| Some("E2".to_string())),
            title,
        };
    }

    Classification {
        msg_type: MsgType::NormalSim,
        direction: DirectionHint::Unknown,
        tag: None,
        title: "SIM APDU".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esim_response() {
        let c = classify("BF228003010203");
        assert_eq!(c.msg_type, MsgType::Esim);
        assert_eq!(c.direction, DirectionHint::EsimToLpa);
        assert_eq!(c.tag.as_deref(), Some("BF22"));
        assert_eq!(c.title, "ESIM=>LPA: EUICCInfo2");
    }

    #[test]
    fn test_esim_response_unknown_tag_falls_back_to_tag() {
        let c = classify("BF7F00");
        assert_eq!(c.title, "ESIM=>LPA: BF7F");
    }

    #[test]
    fn test_proactive_d0() {
        let c = classify("D0068103012100");
        assert_eq!(c.msg_type, MsgType::Proactive);
        assert_eq!(c.tag.as_deref(), Some("D0"));
        assert_eq!(c.title, "UICC=>TERMINAL: Proactive UICC (D0)");
    }

    #[test]
    fn test_terminal_side_proactive() {
        let c = classify("80140000050301028281");
        assert_eq!(c.msg_type, MsgType::Proactive);
        assert_eq!(c.direction, DirectionHint::TerminalToUicc);
        assert_eq!(c.tag.as_deref(), Some("8014"));
        assert_eq!(c.title, "TERMINAL=>UICC: TERMINAL RESPONSE");

        let c = classify("8012000000");
        assert_eq!(c.title, "TERMINAL=>UICC: FETCH");
    }

    #[test]
    fn test_store_data_with_known_tag() {
        let c = classify("80E2910003BF3100");
        assert_eq!(c.msg_type, MsgType::Esim);
        assert_eq!(c.direction, DirectionHint::LpaToEsim);
        assert_eq!(c.tag.as_deref(), Some("BF31"));
        assert_eq!(c.title, "LPA=>ESIM: EnableProfileRequest");
    }

    #[test]
    fn test_store_data_without_known_tag() {
        let c = classify("80E291000141");
        assert_eq!(c.tag.as_deref(), Some("41"));
        assert_eq!(c.title, "LPA=>ESIM: eSIM STORE DATA (E2)");
    }

    #[test]
    fn test_normal_sim_fallthrough() {
        let c = classify("00A4040007A0000002471001");
        assert_eq!(c.msg_type, MsgType::NormalSim);
        assert_eq!(c.tag, None);
        assert_eq!(c.title, "SIM APDU");
    }

    #[test]
    fn test_request_response_tables_diverge() {
        assert_eq!(response_title("BF39"), Some("InitiateAuthenticationResponse"));
        assert_eq!(request_title("BF39"), Some("InitiateAuthenticationRequest"));
        assert_eq!(response_title("BF37"), request_title("BF37"));
        // Request-only entries
        assert_eq!(response_title("BF25"), None);
        assert_eq!(request_title("BF25"), Some("StoreMetadataRequest"));
    }
}
