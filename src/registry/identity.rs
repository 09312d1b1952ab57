//! Identity newtypes shared across discovery, resolution, and reporting.
//!
//! Module ids are derived from the human-readable module name so the same
//! module keeps the same id across runs regardless of filesystem layout.
//! Capability names are opaque tokens matched by exact string equality; the
//! planner never interprets their contents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a discovered module.
///
/// Derived once from the display name via [`module_id_from_name`]; two
/// distinct names that fold to the same id are a data-preparation error
/// surfaced by `validate_records`, not handled here.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub String);

/// Named capability a module may require or provide.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityName(pub String);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive a module id from its display name.
///
/// Lowercases the name and folds separator characters (space, dot, comma,
/// slash, dash) into underscores so ids stay filesystem- and log-friendly.
pub fn module_id_from_name(name: &str) -> ModuleId {
    let id = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '.' | ',' | '/' | '-' => '_',
            other => other,
        })
        .collect::<String>();
    ModuleId(id)
}
