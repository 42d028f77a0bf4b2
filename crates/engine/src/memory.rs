//! Scenario-scoped key-value store backing expression resolution

use crate::error::{Error, Result};
use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Producer stored in memory; re-invoked on every read.
pub type SharedProducer = Arc<dyn Fn() -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A single memory entry: either a plain value or a producer invoked on read.
#[derive(Clone)]
pub enum StoredValue {
    Value(Value),
    Producer(SharedProducer),
}

impl fmt::Debug for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            StoredValue::Producer(_) => f.debug_tuple("Producer").field(&"<fn>").finish(),
        }
    }
}

/// Key-value store shared by all steps of a scenario.
///
/// Clones are handles to the same underlying map, so a scenario's world and
/// its expressions observe one store. Reads never cache: producers are
/// re-invoked and plain values re-fetched on every [`Memory::get`], so
/// mutations between evaluations are observed.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a plain value under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, value: Value) {
        self.entries
            .write()
            .insert(key.to_string(), StoredValue::Value(value));
    }

    /// Store a producer under `key`; it is invoked anew on every read.
    pub fn set_producer<F, Fut>(&self, key: &str, producer: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let producer: SharedProducer = Arc::new(move || Box::pin(producer()));
        self.entries
            .write()
            .insert(key.to_string(), StoredValue::Producer(producer));
    }

    /// Read the value stored under `key`, invoking a producer entry.
    pub async fn get(&self, key: &str) -> Result<Value> {
        let entry = self
            .entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Lookup(key.to_string()))?;

        // the read guard is released before the producer is awaited
        match entry {
            StoredValue::Value(value) => Ok(value),
            StoredValue::Producer(producer) => producer().await,
        }
    }

    /// Whether `key` has an entry, without invoking producers.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
