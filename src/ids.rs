//! Identity generation for graph entities.
//!
//! Every wire-visible entity (nodes, actions, exits, router categories and
//! cases, flows) carries an opaque UUID minted at construction time. The
//! generator is an injected strategy so tests can substitute a deterministic
//! counter and get byte-identical output across runs.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Strategy for minting entity identities.
///
/// Implementations must be safe to share across threads; independent graph
/// builds may run concurrently against a single generator.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// Production generator: random version-4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic generator for tests: UUIDs from an atomic counter,
/// starting at 1.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> Uuid {
        let next = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(next as u128)
    }
}
