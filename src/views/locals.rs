//! Per-request template data

use serde::Serialize;
use serde_json::{Map, Value};

/// Data bag handed to the renderer as template input
///
/// Besides being passed through unchanged, the only thing the view router
/// reads from it is the optional override view stored under the override key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Locals(Map<String, Value>);

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Merge all entries of `other`, overwriting existing keys
    pub fn extend(&mut self, other: &Map<String, Value>) {
        for (key, value) in other {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Override view stored under `key`
    ///
    /// Only non-empty strings count; any other value is treated as absent.
    pub fn override_view(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|view| !view.is_empty())
    }

    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Locals {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
