//! Pre-resolution validation of discovered module records.
//!
//! Used by the CLI and guard-rail tests to reject malformed input before the
//! engine runs. The engine's only hard precondition is a non-empty id; the
//! duplicate-id case (two names folding to the same identity) is caught here
//! because the provider index would otherwise silently merge the two.

use crate::registry::{ModuleId, ModuleRecord};
use std::collections::BTreeMap;

/// Check a record set for data-preparation errors.
///
/// Returns a list of errors rather than short-circuiting so callers can
/// surface every problem at once. An empty list means the records are safe
/// to hand to the resolution engine.
pub fn validate_records(records: &[ModuleRecord]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut first_seen: BTreeMap<&ModuleId, &ModuleRecord> = BTreeMap::new();

    for record in records {
        let display = record.entry.display();
        if record.name.trim().is_empty() {
            errors.push(format!("{display} is missing a Module Name header"));
        }
        if record.id.0.trim().is_empty() {
            errors.push(format!("{display} resolves to an empty module id"));
            continue;
        }
        match first_seen.get(&record.id) {
            Some(original) => errors.push(format!(
                "{display} duplicates module id '{}' already claimed by {}",
                record.id,
                original.entry.display()
            )),
            None => {
                first_seen.insert(&record.id, record);
            }
        }
    }

    errors
}
