//! `BF22` EUICCInfo2
//!
//! The richest info object the card returns: version numbers, resource
//! counters and two large capability BIT STRINGs. Field names follow the
//! SGP.22 ASN.1 definitions so they can be cross-read with the standard.

use crate::error::DecodeError;
use crate::hexutil;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;
use crate::tlv::ber;

use super::common;

/// `UICCCapability` bit names, bit 0 first.
pub const UICC_CAPABILITIES: [&str; 32] = [
    "contactlessSupport",
    "usimSupport",
    "isimSupport",
    "csimSupport",
    "akaMilenage",
    "akaCave",
    "akaTuak128",
    "akaTuak256",
    "usimTestAlgorithm",
    "rfu2",
    "gbaAuthenUsim",
    "gbaAuthenISim",
    "mbmsAuthenUsim",
    "eapClient",
    "javacard",
    "multos",
    "multipleUsimSupport",
    "multipleIsimSupport",
    "multipleCsimSupport",
    "berTlvFileSupport",
    "dfLinkSupport",
    "catTp",
    "getIdentity",
    "profile-a-x25519",
    "profile-b-p256",
    "suciCalculatorApi",
    "dns-resolution",
    "scp11ac",
    "scp11c-authorization-mechanism",
    "s16mode",
    "eaka",
    "iotminimal",
];

/// `EuiccRspCapability` bit names, bit 0 first.
pub const RSP_CAPABILITIES: [&str; 23] = [
    "additionalProfile",
    "loadCrlSupport",
    "rpmSupport",
    "testProfileSupport",
    "deviceInfoExtensibilitySupport",
    "serviceSpecificDataSupport",
    "hriServerAddressSupport",
    "serviceProviderMessageSupport",
    "lpaProxySupport",
    "enterpriseProfilesSupport",
    "serviceDescriptionSupport",
    "deviceChangeSupport",
    "encryptedDeviceChangeDataSupport",
    "estimatedProfileSizeIndicationSupport",
    "profileSizeInProfilesInfoSupport",
    "crlStaplingV3Support",
    "certChainV3VerificationSupport",
    "signedSmdsResponseV3Support",
    "euiccRspCapInInfo1",
    "osUpdateSupport",
    "cancelForEmptySpnPnSupport",
    "updateNotifConfigInfoSupport",
    "updateMetadataV3Support",
];

fn ext_card_resource(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("extCardResource");
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "81" => DecodeNode::leaf(
                "Number of installed application",
                hexutil::be_uint(&tlv.value).to_string(),
            ),
            "82" => DecodeNode::leaf(
                "Available ROM (bytes)",
                hexutil::be_uint(&tlv.value).to_string(),
            ),
            "83" => DecodeNode::leaf(
                "Available RAM (bytes)",
                hexutil::be_uint(&tlv.value).to_string(),
            ),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn pkid_list(name: &str, value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new(name);
    for (i, tlv) in ber::read_nested(value, 1).iter().enumerate() {
        node.push(DecodeNode::leaf(format!("PKId {}", i + 1), tlv.value_hex()));
    }
    node
}

fn certification_data(value: &[u8]) -> DecodeNode {
    let mut node = DecodeNode::new("certificationDataObject");
    for tlv in ber::read_nested(value, 1) {
        let child = match tlv.tag.as_str() {
            "80" => DecodeNode::leaf("platformLabel", hexutil::utf8_or_hex(&tlv.value)),
            "81" => DecodeNode::leaf("discoveryBaseURL", hexutil::utf8_or_hex(&tlv.value)),
            tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex()),
        };
        node.push(child);
    }
    node
}

fn capability_group(name: &str, value: &[u8], names: &[&str]) -> DecodeNode {
    let mut node = DecodeNode::new(name);
    node.children = common::capability_nodes(value, names);
    node
}

pub struct EuiccInfo2;

impl TagBuilder for EuiccInfo2 {
    fn build(&self, value: &[u8], _direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let mut root = DecodeNode::new("EUICCInfo2 (BF22)");
        for tlv in ber::read_nested(value, 0) {
            let child = match tlv.tag.as_str() {
                "81" => DecodeNode::leaf(
                    "baseProfilePackageVersion",
                    common::version(&tlv.value),
                ),
                "82" => DecodeNode::leaf("lowestSvn", common::version(&tlv.value)),
                "83" => DecodeNode::leaf("euiccFirmwareVersion", common::version(&tlv.value)),
                "84" => ext_card_resource(&tlv.value),
                "85" => capability_group("uiccCapability", &tlv.value, &UICC_CAPABILITIES),
                "86" => DecodeNode::leaf("ts102241Version", common::version(&tlv.value)),
                "87" => DecodeNode::leaf("globalplatformVersion", common::version(&tlv.value)),
                "88" => capability_group("euiccRspCapability", &tlv.value, &RSP_CAPABILITIES),
                "A9" => pkid_list("euiccCiPKIdListForVerification", &tlv.value),
                "AA" => pkid_list("euiccCiPKIdListForSigning", &tlv.value),
                "0C" => DecodeNode::leaf(
                    "sasAcreditationNumber",
                    hexutil::utf8_or_hex(&tlv.value),
                ),
                "AC" => certification_data(&tlv.value),
                "99" => DecodeNode::leaf("forbiddenProfilePolicyRules", tlv.value_hex()),
                "04" => DecodeNode::leaf("ppVersion", common::version(&tlv.value)),
                tag => DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex())
                    .with_hint(format!("{} bytes", tlv.length())),
            };
            root.push(child);
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DirectionHint;

    #[test]
    fn test_versions_and_resources() {
        // 82 svn 2.2.0, 84 extCardResource with app count and free RAM
        let value = hex::decode("820302020084098101058304000F4240").unwrap();
        let root = EuiccInfo2.build(&value, DirectionHint::EsimToLpa).unwrap();
        assert_eq!(root.name, "EUICCInfo2 (BF22)");
        assert_eq!(
            root.find("lowestSvn").and_then(|n| n.value.as_deref()),
            Some("2.2.0")
        );
        assert_eq!(
            root.find("Number of installed application")
                .and_then(|n| n.value.as_deref()),
            Some("5")
        );
        assert_eq!(
            root.find("Available RAM (bytes)").and_then(|n| n.value.as_deref()),
            Some("1000000")
        );
    }

    #[test]
    fn test_uicc_capability_bits() {
        // 85 bitstring: bit 1 (usimSupport) and bit 2 (isimSupport) set
        let value = hex::decode("85020060").unwrap();
        let root = EuiccInfo2.build(&value, DirectionHint::EsimToLpa).unwrap();
        let cap = root.find("uiccCapability").unwrap();
        assert_eq!(cap.children.len(), UICC_CAPABILITIES.len());
        assert_eq!(
            cap.find("usimSupport").and_then(|n| n.value.as_deref()),
            Some("Support")
        );
        assert_eq!(
            cap.find("javacard").and_then(|n| n.value.as_deref()),
            Some("Not Support")
        );
    }

    #[test]
    fn test_sas_and_certification() {
        let mut value = hex::decode("0C0B").unwrap();
        value.extend(b"GI-BA-UP-01");
        value.extend(hex::decode("AC0A80033132338103612E62").unwrap());
        let root = EuiccInfo2.build(&value, DirectionHint::EsimToLpa).unwrap();
        assert_eq!(
            root.find("sasAcreditationNumber").and_then(|n| n.value.as_deref()),
            Some("GI-BA-UP-01")
        );
        assert_eq!(
            root.find("discoveryBaseURL").and_then(|n| n.value.as_deref()),
            Some("a.b")
        );
    }

    #[test]
    fn test_unknown_field_passthrough() {
        let value = hex::decode("C002AABB").unwrap();
        let root = EuiccInfo2.build(&value, DirectionHint::EsimToLpa).unwrap();
        assert_eq!(root.children[0].name, "TLV C0");
        assert_eq!(root.children[0].hint.as_deref(), Some("2 bytes"));
    }
}
