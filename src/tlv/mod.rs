//! TLV decoders for the two protocol dialects
//!
//! `ber` handles the eSIM/ASN.1 BER-TLV encoding (two-byte tag markers,
//! long-form lengths), `comp` the SIM Toolkit Comprehension-TLV dialect
//! (one-byte tags with a comprehension bit, one-byte lengths with a single
//! `0x81` extension).
//!
//! # Example
//! ```ignore
//! use apduscope::tlv::ber;
//!
//! let data = hex::decode("BF2203800100").unwrap();
//! let (tlvs, _) = ber::read_list(&data);
//! assert_eq!(tlvs[0].tag, "BF22");
//! ```

pub mod ber;
pub mod comp;

use crate::hexutil;

/// A decoded TLV entry
///
/// `tag` is canonical uppercase hex, one or two bytes wide. The decoders
/// never emit an entry whose declared length exceeds the captured bytes,
/// so the length is simply the value length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub tag: String,
    pub value: Vec<u8>,
}

impl Tlv {
    pub fn new(tag: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }

    pub fn length(&self) -> usize {
        self.value.len()
    }

    pub fn value_hex(&self) -> String {
        hexutil::to_hex(&self.value)
    }

    /// Shortened hex rendering used as the hint on fallback nodes.
    pub fn preview(&self) -> String {
        let mut h = self.value_hex();
        h.truncate(120);
        h
    }
}
