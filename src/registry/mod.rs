//! Module record wiring.
//!
//! This module owns the typed descriptor for one discovered module and the
//! identity newtypes shared by discovery, resolution, and reporting. Callers
//! build records through the discovery layer; the resolution engine consumes
//! them read-only.

pub mod identity;
pub mod model;

pub use identity::{CapabilityName, ModuleId, module_id_from_name};
pub use model::ModuleRecord;
