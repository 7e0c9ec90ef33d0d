//! Common data model shared by the classifier, decoders and callers
//!
//! Everything the external viewer consumes lives here: the message family,
//! the direction hint used for list coloring, the generic decode tree and
//! the per-message `ParseResult`.

use serde::Serialize;
use std::fmt;

/// Which protocol family a captured message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MsgType {
    /// SIM Toolkit proactive command traffic (Comprehension-TLV)
    Proactive,
    /// eSIM RSP command/response objects (BER-TLV)
    Esim,
    /// Ordinary SIM APDU with no deeper decoding
    NormalSim,
    Unknown,
}

/// Direction hint for display, rendered with an ASCII arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DirectionHint {
    UiccToTerminal,
    TerminalToUicc,
    EsimToLpa,
    LpaToEsim,
    Unknown,
}

impl fmt::Display for DirectionHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DirectionHint::UiccToTerminal => "UICC=>TERMINAL",
            DirectionHint::TerminalToUicc => "TERMINAL=>UICC",
            DirectionHint::EsimToLpa => "ESIM=>LPA",
            DirectionHint::LpaToEsim => "LPA=>ESIM",
            DirectionHint::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Physical link direction as recorded by the capture layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkDirection {
    /// Terminal to card
    Tx,
    /// Card to terminal
    Rx,
}

/// One captured message, already normalized to canonical hex
///
/// Built by the extraction collaborator; immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMessage {
    /// Canonical uppercase hex, no separators
    pub raw: String,
    pub direction: LinkDirection,
    /// Opaque source metadata, e.g. the capture line or a reassembly note
    pub meta: Option<String>,
}

impl RawMessage {
    pub fn new(raw: impl Into<String>, direction: LinkDirection) -> Self {
        Self {
            raw: raw.into(),
            direction,
            meta: None,
        }
    }
}

/// One node of the generic decode tree
///
/// Rendered as `"<name>"` or `"<name>: <value>"`, with `hint` as secondary
/// text. Child order is TLV encounter order and must be preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeNode {
    pub name: String,
    pub value: Option<String>,
    pub hint: Option<String>,
    pub children: Vec<DecodeNode>,
}

impl DecodeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            hint: None,
            children: Vec::new(),
        }
    }

    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            hint: None,
            children: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn push(&mut self, child: DecodeNode) {
        self.children.push(child);
    }

    /// Depth-first search for a node by name, used mostly by tests.
    pub fn find(&self, name: &str) -> Option<&DecodeNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Complete result of decoding one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub msg_type: MsgType,
    pub direction_hint: DirectionHint,
    /// Top-level tag driving registry dispatch, when one exists
    pub tag: Option<String>,
    /// List title, `"<DIRECTION>: <HumanName>"` for decoded families
    pub title: String,
    pub root: DecodeNode,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    /// The exact hex the tree was decoded from
    pub raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_arrow_text() {
        assert_eq!(DirectionHint::EsimToLpa.to_string(), "ESIM=>LPA");
        assert_eq!(DirectionHint::UiccToTerminal.to_string(), "UICC=>TERMINAL");
    }

    #[test]
    fn test_node_find() {
        let mut root = DecodeNode::new("root");
        let mut mid = DecodeNode::new("mid");
        mid.push(DecodeNode::leaf("leaf", "v"));
        root.push(mid);
        assert_eq!(root.find("leaf").and_then(|n| n.value.as_deref()), Some("v"));
        assert!(root.find("absent").is_none());
    }
}
