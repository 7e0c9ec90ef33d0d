//! Decoder core for SIM Toolkit and eSIM RSP traffic
//!
//! Takes hex APDU traces captured from modem debug logs and turns each
//! message into a titled, navigable decode tree.
//!
//! The pipeline:
//! - normalize captured text into canonical hex
//! - merge chained eSIM STORE DATA segments back into logical TLVs
//! - classify each message by its leading bytes
//! - decode it with the proactive (Comprehension-TLV) or eSIM (BER-TLV)
//!   engine
//!
//! # Example
//! ```ignore
//! use apduscope::{decode_hex, LinkDirection};
//!
//! let result = decode_hex("D0 06 81 03 01 21 00", LinkDirection::Rx)?;
//! assert_eq!(result.title, "UICC=>TERMINAL: Proactive UICC (D0): DISPLAY TEXT");
//! ```

pub mod apdu;
pub mod classify;
pub mod decoder;
pub mod error;
pub mod esim;
pub mod hexutil;
pub mod model;
pub mod proactive;
pub mod registry;
pub mod tlv;

pub use classify::{classify, Classification};
pub use decoder::{decode_hex, decode_log, decode_message};
pub use error::DecodeError;
pub use model::{
    DecodeNode, DirectionHint, LinkDirection, MsgType, ParseResult, RawMessage,
};
pub use registry::TagBuilder;
