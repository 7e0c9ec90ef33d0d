//! `BF38` AuthenticateServer
//!
//! The request carries the SM-DP+ server's signed challenge material, its
//! certificate chain and the LPA's context parameters. The context block
//! is an ASN.1 CHOICE; some LPAs send its fields unwrapped, which is
//! decoded as the common-authentication case.

use crate::error::DecodeError;
use crate::hexutil;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;
use crate::tlv::ber;

use super::common;

const SERVER_RSP_CAPABILITIES: [&str; 4] = [
    "crlStaplingV3Support",
    "eventListSigningV3Support",
    "pushServiceV3Support",
    "cancelForEmptySpnPnSupport",
];

const OPERATION_TYPES: [&str; 2] = ["profileDownload", "rpm"];

fn session_context(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("sessionContext");
    for tlv in ber::read_nested(value, 2) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("serverSvn", common::version(&tlv.value)),
            "81" => {
                let flag = tlv.value.first().copied().unwrap_or(0) != 0;
                DecodeNode::leaf("crlStaplingV3Used", flag.to_string())
            }
            "82" => DecodeNode::leaf("euiccCiPKIdToBeUsedV3", tlv.value_hex()),
            "A3" => {
                let mut services = DecodeNode::new("supportedPushServices");
                for (i, oid) in ber::read_nested(&tlv.value, 3).iter().enumerate() {
                    services.push(DecodeNode::leaf(format!("OID {}", i + 1), oid.value_hex()));
                }
                services
            }
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn server_signed1(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("serverSigned1");
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("transactionId", tlv.value_hex()),
            "81" => DecodeNode::leaf("euiccChallenge", tlv.value_hex()),
            "83" => DecodeNode::leaf("serverAddress", hexutil::utf8_or_hex(&tlv.value)),
            "84" => DecodeNode::leaf("serverChallenge", tlv.value_hex()),
            "A5" => session_context(&tlv.value),
            "86" => {
                let mut cap = DecodeNode::new("serverRspCapability");
                cap.children = common::capability_nodes(&tlv.value, &SERVER_RSP_CAPABILITIES);
                cap
            }
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn device_info(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("deviceInfo");
    for tlv in ber::read_nested(value, 2) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("tac", tlv.value_hex()),
            "82" => DecodeNode::leaf("imei", hexutil::nibble_swap(&tlv.value)),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn matching_id_source(value: &[u8]) -> DecodeNode {
    let text = match ber::read_nested(value, 2).first() {
        Some(tlv) if tlv.tag == "80" => "none".to_string(),
        Some(tlv) if tlv.tag == "81" => "activationCode".to_string(),
        Some(tlv) if tlv.tag == "06" || tlv.tag == "82" => {
            format!("smdsOid: {}", tlv.value_hex())
        }
        _ => hexutil::to_hex(value),
    };
    DecodeNode::leaf("matchingIdSource", text)
}

fn common_auth_fields(node: &mut DecodeNode, value: &[u8]) {
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("matchingId", hexutil::utf8_or_hex(&tlv.value)),
            "A1" => device_info(&tlv.value),
            "82" => {
                let mut op = DecodeNode::new("operationType");
                op.children =
                    common::event_nodes(&tlv.value, &OPERATION_TYPES, "Set", "Not set");
                op
            }
            "5A" => DecodeNode::leaf("iccid", hexutil::decode_iccid(&tlv.value)),
            "83" => matching_id_source(&tlv.value),
            "A4" => DecodeNode::leaf("vendorSpecificExtension", tlv.value_hex()),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
}

fn device_change(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("ctxParamsForDeviceChange");
    let mut seen_iccid = false;
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "5A" if !seen_iccid => {
                seen_iccid = true;
                DecodeNode::leaf("iccid", hexutil::decode_iccid(&tlv.value))
            }
            "5A" => DecodeNode::leaf("targetEidValue", tlv.value_hex()),
            "A1" => device_info(&tlv.value),
            "82" => DecodeNode::leaf("targetTacValue", tlv.value_hex()),
            "A3" => DecodeNode::leaf("vendorSpecificExtension", tlv.value_hex()),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn profile_recovery(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("ctxParamsForProfileRecovery");
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "5A" => DecodeNode::leaf("iccid", hexutil::decode_iccid(&tlv.value)),
            "A1" => device_info(&tlv.value),
            "A2" => DecodeNode::leaf("vendorSpecificExtension", tlv.value_hex()),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn push_service_registration(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("ctxParamsForPushServiceRegistration");
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("selectedPushServiceOID", tlv.value_hex()),
            "81" => DecodeNode::leaf("pushToken", hexutil::utf8_or_hex(&tlv.value)),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn ctx_params1(value: &[u8]) -> DecodeNode {
    let tlvs = ber::read_nested(value, 1);
    match tlvs.first().map(|t| t.tag.as_str()) {
        Some("A0") => {
            let mut node = DecodeNode::new("ctxParamsForCommonAuthentication");
            common_auth_fields(&mut node, &tlvs[0].value);
            node
        }
        Some("A1") => device_change(&tlvs[0].value),
        Some("A2") => profile_recovery(&tlvs[0].value),
        Some("A3") => push_service_registration(&tlvs[0].value),
        _ => {
            // Fields sent without the CHOICE wrapper.
            let mut node = DecodeNode::new("ctxParamsForCommonAuthentication");
            common_auth_fields(&mut node, value);
            node
        }
    }
}

fn cert_list(name: &str, label: &str, value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new(name);
    for (i, tlv) in ber::read_nested(value, 1).iter().enumerate() {
        node.push(
            DecodeNode::leaf(format!("{} {}", label, i + 1), tlv.value_hex())
                .with_hint(format!("{} bytes", tlv.length())),
        );
    }
    node
}

fn request_tree(value: &[u8]) -> DecodeNode {
    let mut root = DecodeNode::new("AuthenticateServerRequest (BF38)");
    for tlv in ber::read_nested(value, 0) {
        let child = match tlv.tag.as_str() {
            "A0" => server_signed1(&tlv.value),
            "5F37" => DecodeNode::leaf("serverSignature1", tlv.value_hex()),
            "83" => DecodeNode::leaf("euiccCiPKIdToBeUsed", tlv.value_hex()),
            "A4" => DecodeNode::leaf("serverCertificate", tlv.value_hex())
                .with_hint(format!("{} bytes", tlv.length())),
            "A5" => ctx_params1(&tlv.value),
            "A1" => cert_list("otherCertsInChain", "Certificate", &tlv.value),
            "A2" => cert_list("crlList", "CRL", &tlv.value),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        root.push(child);
    }
    root
}

pub struct AuthenticateServer;

impl TagBuilder for AuthenticateServer {
    fn build(&self, value: &[u8], direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let root = match direction {
            DirectionHint::LpaToEsim => request_tree(value),
            _ => {
                let mut root = DecodeNode::new("AuthenticateServerResponse (BF38)");
                common::generic_tree(&mut root, value, 0);
                root
            }
        };
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_signed1_fields() {
        // A0 { 80 txid, 83 "smdp.io", 84 challenge }
        let inner = format!(
            "800201028307{}8404AABBCCDD",
            hexutil::to_hex(b"smdp.io")
        );
        let wrapped = format!("A0{:02X}{}", inner.len() / 2, inner);
        let value = hex::decode(&wrapped).unwrap();
        let root = AuthenticateServer
            .build(&value, DirectionHint::LpaToEsim)
            .unwrap();
        let signed = root.find("serverSigned1").unwrap();
        assert_eq!(
            signed.find("serverAddress").and_then(|n| n.value.as_deref()),
            Some("smdp.io")
        );
        assert_eq!(
            signed.find("serverChallenge").and_then(|n| n.value.as_deref()),
            Some("AABBCCDD")
        );
    }

    #[test]
    fn test_ctx_params_common_auth() {
        // A5 { A0 { 80 "MID-42", 5A iccid } }
        let inner_a0 = format!("8006{}5A029810", hexutil::to_hex(b"MID-42"));
        let a0 = format!("A0{:02X}{}", inner_a0.len() / 2, inner_a0);
        let a5 = format!("A5{:02X}{}", a0.len() / 2, a0);
        let value = hex::decode(&a5).unwrap();
        let root = AuthenticateServer
            .build(&value, DirectionHint::LpaToEsim)
            .unwrap();
        let ctx = root.find("ctxParamsForCommonAuthentication").unwrap();
        assert_eq!(ctx.find("matchingId").and_then(|n| n.value.as_deref()), Some("MID-42"));
        assert_eq!(ctx.find("iccid").and_then(|n| n.value.as_deref()), Some("8901"));
    }

    #[test]
    fn test_ctx_params_without_choice_wrapper() {
        // A5 directly containing matchingId, as some LPAs send it.
        let inner = format!("8006{}", hexutil::to_hex(b"MID-42"));
        let a5 = format!("A5{:02X}{}", inner.len() / 2, inner);
        let value = hex::decode(&a5).unwrap();
        let root = AuthenticateServer
            .build(&value, DirectionHint::LpaToEsim)
            .unwrap();
        let ctx = root.find("ctxParamsForCommonAuthentication").unwrap();
        assert_eq!(ctx.find("matchingId").and_then(|n| n.value.as_deref()), Some("MID-42"));
    }

    #[test]
    fn test_cert_chain_and_signature() {
        let value = hex::decode("5F3702AABBA1063004AABBCCDD").unwrap();
        let root = AuthenticateServer
            .build(&value, DirectionHint::LpaToEsim)
            .unwrap();
        assert_eq!(
            root.find("serverSignature1").and_then(|n| n.value.as_deref()),
            Some("AABB")
        );
        let chain = root.find("otherCertsInChain").unwrap();
        assert_eq!(chain.children.len(), 1);
        assert_eq!(chain.children[0].name, "Certificate 1");
    }

    #[test]
    fn test_response_generic_recursion() {
        let value = hex::decode("A1053003800101").unwrap();
        let root = AuthenticateServer
            .build(&value, DirectionHint::EsimToLpa)
            .unwrap();
        let a1 = root.find("TLV A1").unwrap();
        let s30 = a1.find("TLV 30").unwrap();
        assert_eq!(s30.find("TLV 80").and_then(|n| n.value.as_deref()), Some("01"));
    }
}
