//! Deferred expression resolution over the memory store

use crate::error::{Error, Result};
use crate::memory::Memory;
use serde_json::Value;

/// Lazily resolved string token.
///
/// A token starting with `$` refers to a memory entry, optionally followed by
/// a `.`-separated path into the resolved value (`$rect.width`, `$rows.0`).
/// Any other token resolves to itself as a literal string. Resolution happens
/// on every call, so store mutations between calls are observed.
///
/// The same token also works as a write target through [`Expression::set`],
/// which is what lets one parameter type serve both `I set 'key' = ...` and
/// `I expect '$key' ...` phrasings.
#[derive(Debug, Clone)]
pub struct Expression {
    raw: String,
    memory: Memory,
}

impl Expression {
    pub fn new(raw: impl Into<String>, memory: Memory) -> Self {
        Self {
            raw: raw.into(),
            memory,
        }
    }

    /// The token as written in the step.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Resolve the token to a value.
    pub async fn resolve(&self) -> Result<Value> {
        let Some(reference) = self.raw.strip_prefix('$') else {
            return Ok(Value::String(self.raw.clone()));
        };

        let (key, path) = match reference.split_once('.') {
            Some((key, path)) => (key, Some(path)),
            None => (reference, None),
        };

        let mut value = self.memory.get(key).await?;
        if let Some(path) = path {
            for segment in path.split('.') {
                value = self
                    .descend(&value, segment)
                    .ok_or_else(|| Error::Lookup(self.raw.clone()))?;
            }
        }
        Ok(value)
    }

    /// Use the token as a write target: store `value` under the key name.
    ///
    /// A leading `$` is stripped so a previously read token can be reused;
    /// any path suffix is ignored (writes address whole entries).
    pub fn set(&self, value: Value) {
        let key = self.raw.strip_prefix('$').unwrap_or(&self.raw);
        let key = key.split('.').next().unwrap_or(key);
        self.memory.set(key, value);
    }

    fn descend(&self, value: &Value, segment: &str) -> Option<Value> {
        match value {
            Value::Object(map) => map.get(segment).cloned(),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index).cloned()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expr(raw: &str, memory: &Memory) -> Expression {
        Expression::new(raw, memory.clone())
    }

    #[tokio::test]
    async fn literal_token_passes_through() {
        let memory = Memory::new();

        let value = expr("plain text", &memory).resolve().await.unwrap();
        assert_eq!(value, json!("plain text"));
    }

    #[tokio::test]
    async fn reference_token_reads_the_store() {
        let memory = Memory::new();
        memory.set("user", json!("alice"));

        let value = expr("$user", &memory).resolve().await.unwrap();
        assert_eq!(value, json!("alice"));
    }

    #[tokio::test]
    async fn producer_reference_is_invoked() {
        let memory = Memory::new();
        memory.set_producer("token", || async { Ok(json!("generated")) });

        let value = expr("$token", &memory).resolve().await.unwrap();
        assert_eq!(value, json!("generated"));
    }

    #[tokio::test]
    async fn path_traverses_objects_and_arrays() {
        let memory = Memory::new();
        memory.set("rect", json!({ "size": { "width": 42 }, "points": [1, 2, 3] }));

        assert_eq!(
            expr("$rect.size.width", &memory).resolve().await.unwrap(),
            json!(42)
        );
        assert_eq!(
            expr("$rect.points.1", &memory).resolve().await.unwrap(),
            json!(2)
        );
    }

    #[tokio::test]
    async fn dangling_path_names_the_full_token() {
        let memory = Memory::new();
        memory.set("rect", json!({ "width": 42 }));

        let err = expr("$rect.height", &memory).resolve().await.unwrap_err();
        assert!(matches!(err, Error::Lookup(token) if token == "$rect.height"));
    }

    #[tokio::test]
    async fn missing_key_fails() {
        let memory = Memory::new();

        let err = expr("$missing", &memory).resolve().await.unwrap_err();
        assert!(matches!(err, Error::Lookup(key) if key == "missing"));
    }

    #[tokio::test]
    async fn set_strips_the_reference_sigil() {
        let memory = Memory::new();

        expr("$target", &memory).set(json!(1));
        assert_eq!(memory.get("target").await.unwrap(), json!(1));

        expr("target", &memory).set(json!(2));
        assert_eq!(memory.get("target").await.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn resolution_observes_mutations_between_calls() {
        let memory = Memory::new();
        let expression = expr("$status", &memory);

        memory.set("status", json!("pending"));
        assert_eq!(expression.resolve().await.unwrap(), json!("pending"));

        memory.set("status", json!("done"));
        assert_eq!(expression.resolve().await.unwrap(), json!("done"));
    }
}
