//! Mutable resolution state: confirmed capabilities and the activation order.
//!
//! Both containers are append-only for the lifetime of a run. Satisfaction is
//! monotonic (a capability once confirmed is never retracted or re-assigned),
//! which is what guarantees fixpoint termination in the engine.

use crate::registry::{CapabilityName, ModuleId};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default, Clone)]
/// Capability → the module confirmed as *the* provider.
///
/// Entries are added only when a providing module is admitted into the
/// activation queue. The first admitted provider of a capability wins and
/// keeps the slot for the rest of the run.
pub struct SatisfactionState {
    confirmed: BTreeMap<CapabilityName, ModuleId>,
}

impl SatisfactionState {
    /// True when some admitted module provides `capability`.
    pub fn is_satisfied(&self, capability: &CapabilityName) -> bool {
        self.confirmed.contains_key(capability)
    }

    /// The confirmed provider of `capability`, if any.
    pub fn provider_of(&self, capability: &CapabilityName) -> Option<&ModuleId> {
        self.confirmed.get(capability)
    }

    /// Confirm `provider` for `capability`. First confirmation wins; later
    /// calls for the same capability are no-ops.
    pub(crate) fn confirm(&mut self, capability: CapabilityName, provider: ModuleId) {
        self.confirmed.entry(capability).or_insert(provider);
    }

    /// Iterate confirmed capabilities in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&CapabilityName, &ModuleId)> {
        self.confirmed.iter()
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
/// Ordered activation output. Position = activation order, 1-based,
/// strictly increasing, no gaps; a module id appears at most once.
pub struct ActivationQueue {
    order: Vec<ModuleId>,
    members: BTreeSet<ModuleId>,
}

impl ActivationQueue {
    /// Append a module. Re-admitting an already-queued id is a no-op so the
    /// at-most-once invariant holds even if a caller retries.
    pub(crate) fn push(&mut self, id: ModuleId) {
        if self.members.insert(id.clone()) {
            self.order.push(id);
        }
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.members.contains(id)
    }

    /// 1-based activation position of `id`, if queued.
    pub fn position(&self, id: &ModuleId) -> Option<usize> {
        self.order.iter().position(|entry| entry == id).map(|idx| idx + 1)
    }

    /// Module ids by ascending activation position.
    pub fn ids(&self) -> &[ModuleId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
