//! Scenario world

use crate::driver::{new_driver, Driver};
use std::fmt;
use std::sync::Arc;
use stepwright_engine::{Expression, Memory, SoftFailures};

/// Shared state of one scenario: the memory store, the soft-failure sink,
/// and the browser driver handle.
///
/// Each scenario gets a fresh world, so memory and recorded soft failures
/// never leak across scenarios.
#[derive(cucumber::World)]
#[world(init = Self::new)]
pub struct BrowserWorld {
    pub memory: Memory,
    pub soft: SoftFailures,
    pub driver: Arc<dyn Driver>,
}

impl BrowserWorld {
    fn new() -> Self {
        Self {
            memory: Memory::new(),
            soft: SoftFailures::new(),
            driver: new_driver(),
        }
    }

    /// Wrap a step token into a deferred expression over this world's
    /// memory.
    pub fn value(&self, token: &str) -> Expression {
        Expression::new(token, self.memory.clone())
    }
}

impl fmt::Debug for BrowserWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserWorld")
            .field("memory", &self.memory)
            .field("soft", &self.soft)
            .finish_non_exhaustive()
    }
}
