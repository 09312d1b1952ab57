//! Capability-indirected load-order resolution.
//!
//! The core of the crate: a provider index over the discovered records, the
//! mutable satisfaction/queue pair threaded through the fixpoint loop, and
//! the engine that partitions every module into admitted or unsatisfiable.
//! Resolution is a pure, bounded, single-threaded computation; "cannot
//! satisfy" is a data outcome, never an error.

pub mod engine;
pub mod index;
pub mod state;

pub use engine::{Resolution, Resolver, resolve};
pub use index::ProviderIndex;
pub use state::{ActivationQueue, SatisfactionState};
