//! `BF28` ListNotification
//!
//! Request and response share the tag, so the direction hint picks the
//! reading: the request carries an optional event filter BIT STRING, the
//! response a notification metadata list or an error code.

use crate::error::DecodeError;
use crate::hexutil;
use crate::model::{DecodeNode, DirectionHint};
use crate::registry::TagBuilder;
use crate::tlv::ber;

use super::common::{self, PROFILE_MGMT_EVENTS};

fn result_error_name(code: u64) -> &'static str {
    match code {
        127 => "undefinedError",
        _ => "unknown",
    }
}

fn request_tree(value: &[u8]) -> DecodeNode {
    let mut root = DecodeNode::new("ListNotificationRequest (BF28)");
    if value.is_empty() {
        return root.with_hint("Default request (return all notifications)");
    }
    for tlv in ber::read_nested(value, 0) {
        match tlv.tag.as_str() {
            "81" | "A8" => {
                let mut filter = DecodeNode::new("profileManagementOperation");
                filter.children = common::event_nodes(
                    &tlv.value,
                    &PROFILE_MGMT_EVENTS,
                    "Requested",
                    "Not Requested",
                );
                let requested = filter
                    .children
                    .iter()
                    .filter(|n| n.value.as_deref() == Some("Requested"))
                    .count();
                if requested != 1 {
                    filter.hint = Some(format!(
                        "Only one bit SHALL be set to 1, observed={}",
                        requested
                    ));
                }
                root.push(filter);
            }
            tag => root.push(DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex())),
        }
    }
    root
}

fn response_tree(value: &[u8]) -> DecodeNode {
    let mut root = DecodeNode::new("ListNotificationResponse (BF28)");
    for tlv in ber::read_nested(value, 0) {
        match tlv.tag.as_str() {
            "A0" => {
                let mut list = DecodeNode::new("notificationMetadataList");
                for (i, inner) in ber::read_nested(&tlv.value, 1).iter().enumerate() {
                    let name = format!("NotificationMetadata {}", i + 1);
                    if inner.tag == "BF2F" {
                        list.push(common::notification_metadata(name, &inner.value));
                    } else {
                        list.push(DecodeNode::leaf(name, inner.value_hex()));
                    }
                }
                root.push(list);
            }
            "BF2F" => {
                root.push(common::notification_metadata("NotificationMetadata", &tlv.value));
            }
            "81" | "02" => {
                let code = hexutil::be_uint(&tlv.value);
                let name = result_error_name(code);
                root.push(DecodeNode::leaf(
                    "listNotificationsResultError",
                    format!("{}({})", name, code),
                ));
                root.hint = Some(format!("Error response: {}", name));
            }
            tag => root.push(DecodeNode::leaf(format!("TLV {}", tag), tlv.value_hex())),
        }
    }
    root
}

pub struct ListNotification;

impl TagBuilder for ListNotification {
    fn build(&self, value: &[u8], direction: DirectionHint) -> Result<DecodeNode, DecodeError> {
        let root = match direction {
            DirectionHint::LpaToEsim => request_tree(value),
            _ => response_tree(value),
        };
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_is_default() {
        let root = ListNotification
            .build(&[], DirectionHint::LpaToEsim)
            .unwrap();
        assert_eq!(
            root.hint.as_deref(),
            Some("Default request (return all notifications)")
        );
    }

    #[test]
    fn test_request_single_bit_ok() {
        // 81 02 06 40: two logical bits, only bit 1 set.
        let value = hex::decode("81020640").unwrap();
        let root = ListNotification
            .build(&value, DirectionHint::LpaToEsim)
            .unwrap();
        let filter = root.find("profileManagementOperation").unwrap();
        assert_eq!(filter.hint, None);
        assert_eq!(
            filter.find("notificationLocalEnable").and_then(|n| n.value.as_deref()),
            Some("Requested")
        );
    }

    #[test]
    fn test_request_multi_bit_gets_hint() {
        // 81 02 00 C0: bits 0 and 1 both set.
        let value = hex::decode("810200C0").unwrap();
        let root = ListNotification
            .build(&value, DirectionHint::LpaToEsim)
            .unwrap();
        let filter = root.find("profileManagementOperation").unwrap();
        assert_eq!(
            filter.hint.as_deref(),
            Some("Only one bit SHALL be set to 1, observed=2")
        );
    }

    #[test]
    fn test_response_metadata_list() {
        // A0 wrapping one BF2F with seqNumber 3
        let value = hex::decode("A006BF2F03800103").unwrap();
        let root = ListNotification
            .build(&value, DirectionHint::EsimToLpa)
            .unwrap();
        let list = root.find("notificationMetadataList").unwrap();
        assert_eq!(list.children.len(), 1);
        assert_eq!(list.children[0].name, "NotificationMetadata 1");
        assert_eq!(
            list.children[0].find("seqNumber").and_then(|n| n.value.as_deref()),
            Some("3")
        );
    }

    #[test]
    fn test_response_error_code() {
        let value = hex::decode("81017F").unwrap();
        let root = ListNotification
            .build(&value, DirectionHint::EsimToLpa)
            .unwrap();
        assert_eq!(
            root.find("listNotificationsResultError")
                .and_then(|n| n.value.as_deref()),
            Some("undefinedError(127)")
        );
        assert_eq!(root.hint.as_deref(), Some("Error response: undefinedError"));
    }
}
