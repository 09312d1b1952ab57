//! The resolution engine: fixpoint admission over the discovered record set.
//!
//! One `Resolver` is built per run from an immutable record snapshot; there
//! is no cross-run state. The algorithm is a repeated-scan fixpoint rather
//! than a full topological sort: satisfaction is capability-indirected (any
//! declared provider may satisfy a name) and monotonic (confirmed
//! capabilities are never retracted), so each pass either admits at least
//! one module or proves that nothing left can ever be admitted. Cycles never
//! make fixpoint progress and fall into the unsatisfiable set.

use crate::registry::{CapabilityName, ModuleId, ModuleRecord};
use crate::resolve::index::ProviderIndex;
use crate::resolve::state::{ActivationQueue, SatisfactionState};
use anyhow::{Result, bail};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Outcome of the short-circuiting requirement scan for one module.
///
/// The scan stops at the first unmet requirement: a capability nobody
/// declares providing is terminal, a capability with an unconfirmed declared
/// provider defers the module to a later pass.
enum RequirementStatus {
    Met,
    Gap(CapabilityName),
    Deferred(CapabilityName),
}

/// Caller-owned resolution engine for a single run.
#[derive(Debug)]
pub struct Resolver<'a> {
    records: &'a [ModuleRecord],
    index: ProviderIndex,
}

impl<'a> Resolver<'a> {
    /// Validate the hard precondition and build the provider index.
    ///
    /// A record with an empty id is malformed input and fails fast here;
    /// every other shape of input resolves to a complete classification.
    pub fn new(records: &'a [ModuleRecord]) -> Result<Self> {
        for record in records {
            if record.id.0.trim().is_empty() {
                bail!(
                    "module record '{}' ({}) has an empty id",
                    record.name,
                    record.entry.display()
                );
            }
        }
        Ok(Self {
            index: ProviderIndex::build(records),
            records,
        })
    }

    /// The provider index built for this run.
    pub fn index(&self) -> &ProviderIndex {
        &self.index
    }

    /// Partition every record into the activation queue or the
    /// unsatisfiable set.
    pub fn resolve(&self) -> Resolution {
        let mut queue = ActivationQueue::default();
        let mut satisfaction = SatisfactionState::default();
        let mut unsatisfiable = BTreeSet::new();
        let mut waiting: Vec<&ModuleRecord> = Vec::new();

        // Initial classification pass, in discovery order. Admissions here
        // already unlock later modules within the same scan.
        for record in self.records {
            match classify(record, &self.index, &satisfaction) {
                RequirementStatus::Met => admit(record, &mut queue, &mut satisfaction),
                RequirementStatus::Gap(capability) => {
                    debug!(module = %record.id, %capability, "requirement has no declared provider");
                    unsatisfiable.insert(record.id.clone());
                }
                RequirementStatus::Deferred(capability) => {
                    trace!(module = %record.id, %capability, "deferred until provider is confirmed");
                    waiting.push(record);
                }
            }
        }

        // Fixpoint passes over the waiting list, preserving its order.
        // Terminates because each pass either admits a module (and the
        // waiting list shrinks) or admits none (and the loop exits).
        let mut pass = 0usize;
        while !waiting.is_empty() {
            pass += 1;
            let before = queue.len();
            waiting.retain(|record| {
                let met = record
                    .requires
                    .iter()
                    .all(|capability| satisfaction.is_satisfied(capability));
                if met {
                    admit(record, &mut queue, &mut satisfaction);
                }
                !met
            });
            let admitted = queue.len() - before;
            trace!(pass, admitted, still_waiting = waiting.len(), "fixpoint pass");
            if admitted == 0 {
                break;
            }
        }

        // Whatever is still waiting has no path to satisfaction within this
        // module set, whether a late-discovered gap or a provider cycle.
        for record in waiting {
            debug!(module = %record.id, "never satisfied; classifying unsatisfiable");
            unsatisfiable.insert(record.id.clone());
        }

        debug!(
            admitted = queue.len(),
            unsatisfiable = unsatisfiable.len(),
            capabilities = satisfaction.len(),
            "resolution complete"
        );
        Resolution {
            queue,
            unsatisfiable,
            satisfaction,
        }
    }
}

/// Resolve a record set in one call.
pub fn resolve(records: &[ModuleRecord]) -> Result<Resolution> {
    Ok(Resolver::new(records)?.resolve())
}

fn classify(
    record: &ModuleRecord,
    index: &ProviderIndex,
    satisfaction: &SatisfactionState,
) -> RequirementStatus {
    for capability in &record.requires {
        if satisfaction.is_satisfied(capability) {
            continue;
        }
        if !index.has_provider(capability) {
            return RequirementStatus::Gap(capability.clone());
        }
        return RequirementStatus::Deferred(capability.clone());
    }
    RequirementStatus::Met
}

/// Admission: append to the queue, then confirm the module's own provisions
/// in declaration order. Confirming is what can unlock other modules in
/// later passes.
fn admit(record: &ModuleRecord, queue: &mut ActivationQueue, satisfaction: &mut SatisfactionState) {
    queue.push(record.id.clone());
    for capability in &record.provides {
        satisfaction.confirm(capability.clone(), record.id.clone());
    }
    debug!(module = %record.id, position = queue.len(), "admitted");
}

/// Complete classification of one resolution run.
///
/// The queue and the unsatisfiable set partition the input record set; the
/// satisfaction state is exposed for callers and reporting collaborators,
/// not consumed by the engine after resolution completes.
#[derive(Debug, Clone)]
pub struct Resolution {
    queue: ActivationQueue,
    unsatisfiable: BTreeSet<ModuleId>,
    satisfaction: SatisfactionState,
}

impl Resolution {
    pub fn queue(&self) -> &ActivationQueue {
        &self.queue
    }

    pub fn unsatisfiable(&self) -> &BTreeSet<ModuleId> {
        &self.unsatisfiable
    }

    pub fn satisfaction(&self) -> &SatisfactionState {
        &self.satisfaction
    }

    /// True when some admitted module provides `capability`.
    pub fn is_satisfied(&self, capability: &CapabilityName) -> bool {
        self.satisfaction.is_satisfied(capability)
    }

    /// The module confirmed as provider of `capability`, if any.
    pub fn provider_of(&self, capability: &CapabilityName) -> Option<&ModuleId> {
        self.satisfaction.provider_of(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CapabilityName;
    use std::path::PathBuf;

    fn record(id: &str, requires: &[&str], provides: &[&str]) -> ModuleRecord {
        ModuleRecord {
            id: ModuleId(id.to_string()),
            name: id.to_string(),
            version: None,
            description: None,
            author: None,
            requires: requires
                .iter()
                .map(|c| CapabilityName(c.to_string()))
                .collect(),
            provides: provides
                .iter()
                .map(|c| CapabilityName(c.to_string()))
                .collect(),
            entry: PathBuf::from(format!("{id}/{id}.mod")),
        }
    }

    fn cap(name: &str) -> CapabilityName {
        CapabilityName(name.to_string())
    }

    fn queued_ids(resolution: &Resolution) -> Vec<String> {
        resolution.queue().ids().iter().map(|id| id.0.clone()).collect()
    }

    #[test]
    fn empty_input_resolves_to_empty_output() {
        let resolution = resolve(&[]).expect("resolve");
        assert!(resolution.queue().is_empty());
        assert!(resolution.unsatisfiable().is_empty());
        assert!(resolution.satisfaction().is_empty());
    }

    #[test]
    fn empty_id_fails_fast() {
        let mut bad = record("x", &[], &[]);
        bad.id = ModuleId("   ".to_string());
        let err = Resolver::new(&[bad]).expect_err("empty id must be rejected");
        assert!(err.to_string().contains("empty id"));
    }

    #[test]
    fn queue_and_unsatisfiable_partition_the_input() {
        let records = vec![
            record("a", &[], &["x"]),
            record("b", &["x"], &[]),
            record("c", &["nowhere"], &[]),
            record("d", &["cycle_y"], &["cycle_z"]),
            record("e", &["cycle_z"], &["cycle_y"]),
        ];
        let resolution = resolve(&records).expect("resolve");

        let mut seen = BTreeSet::new();
        for id in resolution.queue().ids() {
            assert!(seen.insert(id.clone()), "queue must not repeat ids");
            assert!(!resolution.unsatisfiable().contains(id), "sets must be disjoint");
        }
        for id in resolution.unsatisfiable() {
            assert!(seen.insert(id.clone()), "sets must be disjoint");
        }
        assert_eq!(seen.len(), records.len(), "every module must be classified");
    }

    #[test]
    fn identical_input_yields_identical_output() {
        let records = vec![
            record("c", &["x"], &[]),
            record("b", &["w"], &["x"]),
            record("a", &[], &["w"]),
            record("gap", &["missing"], &[]),
        ];
        let first = resolve(&records).expect("resolve");
        let second = resolve(&records).expect("resolve");
        assert_eq!(queued_ids(&first), queued_ids(&second));
        assert_eq!(first.unsatisfiable(), second.unsatisfiable());
    }

    #[test]
    fn admitted_requirements_are_confirmed_before_admission() {
        let records = vec![
            record("c", &["x"], &[]),
            record("b", &["w"], &["x"]),
            record("a", &[], &["w"]),
        ];
        let resolution = resolve(&records).expect("resolve");
        for id in resolution.queue().ids() {
            let position = resolution.queue().position(id).expect("queued");
            let module = records.iter().find(|r| &r.id == id).expect("known record");
            for capability in &module.requires {
                let provider = resolution
                    .provider_of(capability)
                    .expect("requirement must be confirmed");
                let provider_position = resolution
                    .queue()
                    .position(provider)
                    .expect("provider must be queued");
                assert!(
                    provider_position < position,
                    "provider of '{capability}' must activate before {id}"
                );
            }
        }
    }

    #[test]
    fn no_requirement_modules_are_admitted_even_when_everything_else_fails() {
        let records = vec![
            record("doomed", &["nothing_provides_this"], &[]),
            record("free", &[], &[]),
        ];
        let resolution = resolve(&records).expect("resolve");
        assert_eq!(queued_ids(&resolution), vec!["free"]);
        assert!(resolution.unsatisfiable().contains(&ModuleId("doomed".into())));
    }

    #[test]
    fn deferred_chain_resolves_across_multiple_passes() {
        // Discovery order is deliberately worst-case: each module appears
        // before the module that unlocks it.
        let records = vec![
            record("c", &["x"], &[]),
            record("b", &["w"], &["x"]),
            record("a", &[], &["w"]),
        ];
        let resolution = resolve(&records).expect("resolve");
        assert_eq!(queued_ids(&resolution), vec!["a", "b", "c"]);
        assert!(resolution.unsatisfiable().is_empty());
    }

    #[test]
    fn mutual_cycle_ends_unsatisfiable() {
        let records = vec![
            record("left", &["right_cap"], &["left_cap"]),
            record("right", &["left_cap"], &["right_cap"]),
        ];
        let resolution = resolve(&records).expect("resolve");
        assert!(resolution.queue().is_empty());
        assert_eq!(resolution.unsatisfiable().len(), 2);
        assert!(!resolution.is_satisfied(&cap("left_cap")));
        assert!(!resolution.is_satisfied(&cap("right_cap")));
    }

    #[test]
    fn self_dependency_ends_unsatisfiable() {
        let records = vec![record("selfish", &["own_cap"], &["own_cap"])];
        let resolution = resolve(&records).expect("resolve");
        assert!(resolution.queue().is_empty());
        assert!(resolution.unsatisfiable().contains(&ModuleId("selfish".into())));
    }

    #[test]
    fn diamond_dependency_confirms_the_first_admitted_provider() {
        // Both a and b declare x; c must not wait for b once a confirms x.
        let records = vec![
            record("a", &[], &["x", "w"]),
            record("b", &["w"], &["x"]),
            record("c", &["x"], &[]),
        ];
        let resolution = resolve(&records).expect("resolve");
        assert_eq!(queued_ids(&resolution), vec!["a", "b", "c"]);
        assert_eq!(resolution.provider_of(&cap("x")), Some(&ModuleId("a".into())));
    }

    #[test]
    fn true_gap_is_terminal_on_the_first_pass() {
        let records = vec![record("d", &["y"], &[])];
        let resolution = resolve(&records).expect("resolve");
        assert!(resolution.queue().is_empty());
        assert!(resolution.unsatisfiable().contains(&ModuleId("d".into())));
    }

    #[test]
    fn gap_short_circuits_remaining_requirements() {
        // The second requirement would defer, but the gap on the first one
        // must classify the module terminally without consulting it.
        let records = vec![
            record("provider", &[], &["later"]),
            record("m", &["missing", "later"], &[]),
        ];
        let resolution = resolve(&records).expect("resolve");
        assert!(resolution.unsatisfiable().contains(&ModuleId("m".into())));
        assert_eq!(queued_ids(&resolution), vec!["provider"]);
    }

    #[test]
    fn provider_confirmation_is_stable_across_later_admissions() {
        let records = vec![
            record("first", &[], &["z"]),
            record("second", &[], &["z"]),
            record("user", &["z"], &[]),
        ];
        let resolver = Resolver::new(&records).expect("resolver");
        let resolution = resolver.resolve();
        // Both providers are admitted, but z stays pinned to the first.
        assert_eq!(resolution.queue().len(), 3);
        assert_eq!(resolution.provider_of(&cap("z")), Some(&ModuleId("first".into())));
        let selected = resolver.index().select_provider(
            &cap("z"),
            resolution.satisfaction(),
            resolution.queue(),
        );
        assert_eq!(selected, Some(ModuleId("first".into())));
    }
}
