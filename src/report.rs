//! Rendering of a resolution outcome for humans and external tooling.
//!
//! The report is a plain serializable projection of the resolution: ordered
//! activation rows plus an unsatisfied section. It lists, per unsatisfied
//! module, the required capabilities that never became confirmed, without
//! claiming why: a missing provider and a provider cycle look the same here,
//! matching the engine's contract.

use crate::registry::{CapabilityName, ModuleId, ModuleRecord};
use crate::resolve::Resolution;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Serialize)]
/// One admitted module, in activation order.
pub struct PlanEntry {
    pub position: usize,
    pub id: ModuleId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<CapabilityName>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<CapabilityName>,
}

#[derive(Debug, Clone, Serialize)]
/// One module that can never activate, with its unconfirmed requirements.
pub struct UnsatisfiedEntry {
    pub id: ModuleId,
    pub name: String,
    pub missing: Vec<CapabilityName>,
}

#[derive(Debug, Clone, Serialize)]
/// Full activation plan for one resolution run.
pub struct PlanReport {
    pub modules: Vec<PlanEntry>,
    pub unsatisfied: Vec<UnsatisfiedEntry>,
}

/// Project a resolution onto its report form.
///
/// Activation rows follow queue order; unsatisfied rows follow id order
/// (the unsatisfiable set is unordered by contract).
pub fn build_report(records: &[ModuleRecord], resolution: &Resolution) -> PlanReport {
    let mut modules = Vec::with_capacity(resolution.queue().len());
    for id in resolution.queue().ids() {
        let Some(record) = records.iter().find(|r| &r.id == id) else {
            continue;
        };
        modules.push(PlanEntry {
            position: modules.len() + 1,
            id: record.id.clone(),
            name: record.name.clone(),
            version: record.version.clone(),
            requires: record.requires.clone(),
            provides: record.provides.clone(),
        });
    }

    let mut unsatisfied = Vec::new();
    for id in resolution.unsatisfiable() {
        let Some(record) = records.iter().find(|r| &r.id == id) else {
            continue;
        };
        let missing = record
            .requires
            .iter()
            .filter(|capability| !resolution.is_satisfied(capability))
            .cloned()
            .collect();
        unsatisfied.push(UnsatisfiedEntry {
            id: record.id.clone(),
            name: record.name.clone(),
            missing,
        });
    }

    PlanReport { modules, unsatisfied }
}

/// Render the report as plain text.
pub fn render_text(report: &PlanReport) -> String {
    let mut out = String::new();
    if report.modules.is_empty() {
        out.push_str("no modules can be activated\n");
    } else {
        let _ = writeln!(out, "activation order ({} modules):", report.modules.len());
        for entry in &report.modules {
            let version = entry
                .version
                .as_deref()
                .map(|v| format!(" {v}"))
                .unwrap_or_default();
            let _ = write!(out, "{:>3}. {} ({}{})", entry.position, entry.id, entry.name, version);
            if !entry.provides.is_empty() {
                let _ = write!(out, " provides: {}", join_capabilities(&entry.provides));
            }
            out.push('\n');
        }
    }

    if !report.unsatisfied.is_empty() {
        let _ = writeln!(out, "unsatisfied ({} modules):", report.unsatisfied.len());
        for entry in &report.unsatisfied {
            let _ = write!(out, "  !! {} ({})", entry.id, entry.name);
            if !entry.missing.is_empty() {
                let _ = write!(out, " missing: {}", join_capabilities(&entry.missing));
            }
            out.push('\n');
        }
    }

    out
}

fn join_capabilities(capabilities: &[CapabilityName]) -> String {
    capabilities
        .iter()
        .map(|c| c.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
