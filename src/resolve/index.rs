//! Indexed view of declared capability providers.
//!
//! Built once from the full record list before resolution starts and
//! read-only afterwards. A capability may have zero, one, or many declared
//! providers; declaration order is discovery order, which is what makes
//! provider selection deterministic.

use crate::registry::{CapabilityName, ModuleId, ModuleRecord};
use crate::resolve::state::{ActivationQueue, SatisfactionState};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
/// Capability → module ids that declared providing it, in discovery order.
pub struct ProviderIndex {
    providers: BTreeMap<CapabilityName, Vec<ModuleId>>,
}

impl ProviderIndex {
    /// Build the index from the full record list.
    ///
    /// A capability with zero providers simply has no entry; lookups return
    /// "not found" rather than erroring.
    pub fn build(records: &[ModuleRecord]) -> Self {
        let mut providers: BTreeMap<CapabilityName, Vec<ModuleId>> = BTreeMap::new();
        for record in records {
            for capability in &record.provides {
                providers
                    .entry(capability.clone())
                    .or_default()
                    .push(record.id.clone());
            }
        }
        Self { providers }
    }

    /// True iff at least one module declared providing `capability`.
    pub fn has_provider(&self, capability: &CapabilityName) -> bool {
        self.providers.contains_key(capability)
    }

    /// Declared providers of `capability` in discovery order; empty when none.
    pub fn declared_providers(&self, capability: &CapabilityName) -> &[ModuleId] {
        self.providers
            .get(capability)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pick the provider a caller should expect to satisfy `capability`.
    ///
    /// Stability contract: a capability already confirmed in the satisfaction
    /// state always resolves to its confirmed provider. Otherwise a declared
    /// provider already sitting in the activation queue is preferred (it is
    /// further along, so a better bet to be resolvable); otherwise the first
    /// declared provider. Pure query; never mutates state.
    pub fn select_provider(
        &self,
        capability: &CapabilityName,
        satisfaction: &SatisfactionState,
        queue: &ActivationQueue,
    ) -> Option<ModuleId> {
        if let Some(confirmed) = satisfaction.provider_of(capability) {
            return Some(confirmed.clone());
        }
        let declared = self.declared_providers(capability);
        declared
            .iter()
            .find(|id| queue.contains(id))
            .or_else(|| declared.first())
            .cloned()
    }

    /// Iterate capabilities with at least one declared provider, in name order.
    pub fn capabilities(&self) -> impl Iterator<Item = &CapabilityName> {
        self.providers.keys()
    }
}
