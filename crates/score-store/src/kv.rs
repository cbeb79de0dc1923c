//! Key-value store trait and in-process implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::StoreError;

/// Async interface over the external key-value service.
///
/// List operations follow Redis semantics: `rpush` appends, `lrange` takes
/// inclusive indices where negative values count from the end (-1 is the
/// last element).
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch a value, `None` on missing key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value, optionally with a retention window.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Delete one or more keys.
    async fn delete(&self, keys: &[String]) -> Result<(), StoreError>;

    /// Append a value to the list at `key`, creating it if absent.
    async fn rpush(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Fetch a sub-range of the list at `key` (inclusive bounds).
    async fn lrange(&self, key: &str, start: isize, stop: isize)
        -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Clone)]
enum Value {
    Scalar(String),
    List(Vec<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process key-value store.
///
/// Honors TTLs (entries expire lazily on read) and Redis list-range
/// semantics. Used by tests and the offline demo path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.expired(Instant::now()) => match &entry.value {
                Value::Scalar(s) => Ok(Some(s.clone())),
                Value::List(_) => Err(StoreError::Backend(format!(
                    "key '{key}' holds a list, not a scalar"
                ))),
            },
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Scalar(value.to_string()),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::List(Vec::new()),
            expires_at: None,
        });
        if entry.expired(now) {
            *entry = Entry {
                value: Value::List(Vec::new()),
                expires_at: None,
            };
        }

        match &mut entry.value {
            Value::List(items) => {
                items.push(value.to_string());
                Ok(())
            }
            Value::Scalar(_) => Err(StoreError::Backend(format!(
                "key '{key}' holds a scalar, not a list"
            ))),
        }
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().await;
        let items = match entries.get(key) {
            Some(entry) if !entry.expired(Instant::now()) => match &entry.value {
                Value::List(items) => items,
                Value::Scalar(_) => {
                    return Err(StoreError::Backend(format!(
                        "key '{key}' holds a scalar, not a list"
                    )))
                }
            },
            _ => return Ok(Vec::new()),
        };

        let len = items.len() as isize;
        let resolve = |idx: isize| -> isize {
            if idx < 0 {
                len + idx
            } else {
                idx
            }
        };

        let start = resolve(start).max(0);
        let stop = resolve(stop).min(len - 1);
        if start > stop || start >= len {
            return Ok(Vec::new());
        }

        Ok(items[start as usize..=stop as usize].to_vec())
    }
}
