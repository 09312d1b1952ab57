//! Typed descriptor for one discovered module.
//!
//! A record is built once per discovered module before resolution begins and
//! is immutable for the lifetime of a run. The resolution engine only reads
//! `id`, `requires`, and `provides`; the remaining fields are payload carried
//! for reporting and cache snapshots.

use crate::module_metadata::ModuleHeader;
use crate::registry::identity::{CapabilityName, ModuleId, module_id_from_name};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Immutable per-module descriptor.
///
/// `requires` and `provides` default to empty sequences rather than an
/// absent sentinel so every iteration site can treat them uniformly.
pub struct ModuleRecord {
    pub id: ModuleId,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub requires: Vec<CapabilityName>,
    #[serde(default)]
    pub provides: Vec<CapabilityName>,
    /// Entry file the header was scraped from; used for cache invalidation.
    pub entry: PathBuf,
}

impl ModuleRecord {
    /// Build a record from a scraped header.
    ///
    /// A header without a `Module Name` field falls back to the directory
    /// name so discovery never drops a module silently; validation flags the
    /// missing name separately.
    pub fn from_header(header: ModuleHeader, fallback_name: &str, entry: PathBuf) -> Self {
        let name = header
            .name
            .unwrap_or_else(|| fallback_name.to_string());
        Self {
            id: module_id_from_name(&name),
            name,
            version: header.version,
            description: header.description,
            author: header.author,
            requires: header.depends.into_iter().map(CapabilityName).collect(),
            provides: header.provides.into_iter().map(CapabilityName).collect(),
            entry,
        }
    }

    /// True when the module can be admitted without waiting on anything.
    pub fn has_requirements(&self) -> bool {
        !self.requires.is_empty()
    }
}
