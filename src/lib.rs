//! Shared library for the modplan activation planner.
//!
//! The crate turns a directory of candidate modules into a deterministic
//! activation plan: the discovery layer scrapes module entry files into typed
//! records, the resolution engine partitions those records into an ordered
//! activation queue plus an unsatisfiable set, and the report/cache layers
//! present and reuse the outcome. Public functions here form the contract the
//! binaries depend on.

pub mod cache;
pub mod discovery;
pub mod metadata_validation;
pub mod module_metadata;
pub mod registry;
pub mod report;
pub mod resolve;

pub use cache::{cache_disabled, default_cache_path, load_cached_records, store_records};
pub use discovery::{collect_module_entries, discover_modules, module_entry_path};
pub use metadata_validation::validate_records;
pub use module_metadata::ModuleHeader;
pub use registry::{CapabilityName, ModuleId, ModuleRecord, module_id_from_name};
pub use report::{PlanEntry, PlanReport, UnsatisfiedEntry, build_report, render_text};
pub use resolve::{
    ActivationQueue, ProviderIndex, Resolution, Resolver, SatisfactionState, resolve,
};

/// Split comma- or whitespace-delimited capability lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
