use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{GraphError, Result};

/// Context for sharing data between the tasks of one execution
#[derive(Clone, Debug)]
pub struct Context {
    data: Arc<DashMap<String, Value>>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: impl serde::Serialize) -> Result<()> {
        self.set_sync(key, value)
    }

    pub fn set_sync(&self, key: impl Into<String>, value: impl serde::Serialize) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .map_err(|e| GraphError::ContextError(format!("failed to serialize '{key}': {e}")))?;
        self.data.insert(key, value);
        Ok(())
    }

    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_sync(key)
    }

    /// Synchronous read, usable from edge conditions
    pub fn get_sync<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub async fn remove(&self, key: &str) -> Option<Value> {
        self.data.remove(key).map(|(_, v)| v)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
