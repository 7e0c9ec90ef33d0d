//! Tag-decoder registry
//!
//! Maps `(family, top-level tag)` to the builder that turns a TLV value
//! into a named decode tree. The table is built once on first use and
//! never mutated afterwards, so lookups are safe from any number of
//! threads without locking.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::DecodeError;
use crate::esim;
use crate::model::{DecodeNode, DirectionHint, MsgType};
use crate::proactive;

/// A specialized decoder for one top-level tag
pub trait TagBuilder: Send + Sync {
    /// Decode the TLV's value into a tree.
    ///
    /// Failures are scoped to this tag: the caller converts an `Err` into
    /// an error leaf and keeps going.
    fn build(&self, value: &[u8], direction: DirectionHint) -> Result<DecodeNode, DecodeError>;
}

type BuilderMap = HashMap<(MsgType, String), Box<dyn TagBuilder>>;

static BUILDERS: Lazy<BuilderMap> = Lazy::new(|| {
    let mut m: BuilderMap = HashMap::new();
    m.insert(
        (MsgType::Proactive, "D0".to_string()),
        Box::new(proactive::ProactiveCommand) as Box<dyn TagBuilder>,
    );
    m.insert(
        (MsgType::Proactive, "8014".to_string()),
        Box::new(proactive::TerminalResponse),
    );
    m.insert(
        (MsgType::Proactive, "80C2".to_string()),
        Box::new(proactive::Envelope),
    );
    let mut add = |tag: &str, builder: Box<dyn TagBuilder>| {
        m.insert((MsgType::Esim, tag.to_string()), builder);
    };
    add("BF20", Box::new(esim::bf20::EuiccInfo1));
    add("BF22", Box::new(esim::bf22::EuiccInfo2));
    add("BF28", Box::new(esim::bf28::ListNotification));
    add("BF2D", Box::new(esim::bf2d::ProfileInfoList));
    add("BF2E", Box::new(esim::bf2e::GetEuiccChallenge));
    add("BF31", Box::new(esim::bf31::EnableProfile));
    add("BF32", Box::new(esim::bf32::DisableProfile));
    add("BF37", Box::new(esim::bf37::ProfileInstallationResult));
    add("BF38", Box::new(esim::bf38::AuthenticateServer));
    m
});

/// Look up the builder for a family/tag pair.
pub fn resolve(family: MsgType, tag: &str) -> Option<&'static dyn TagBuilder> {
    BUILDERS
        .get(&(family, tag.to_string()))
        .map(|b| b.as_ref())
}

/// All registered keys, mainly for diagnostics.
pub fn registered_tags(family: MsgType) -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = BUILDERS
        .keys()
        .filter(|(f, _)| *f == family)
        .map(|(_, t)| t.as_str())
        .collect();
    tags.sort_unstable();
    tags
}
