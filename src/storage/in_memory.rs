//! In-memory repository for testing and development

use super::{Page, Record, Repository, UpdateMap};
use crate::core::error::{EntityError, StorageError};
use crate::core::query::{OrderDir, QueryParams};
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

/// In-memory repository keyed by record id
///
/// Records keep insertion order. Uses RwLock for thread-safe access; clones
/// share the same store.
#[derive(Clone)]
pub struct InMemoryRepository<T: Record> {
    records: Arc<RwLock<IndexMap<String, T>>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Repository pre-filled with `records`
    pub fn seeded(records: impl IntoIterator<Item = T>) -> Self {
        let map = records.into_iter().map(|r| (r.id(), r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Result<Vec<Value>> {
        let records = self
            .records
            .read()
            .map_err(|e| lock_error("read", e))?;

        records
            .values()
            .map(|r| serde_json::to_value(r).map_err(Into::into))
            .collect()
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn create(&self, record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| lock_error("write", e))?;

        let id = record.id();
        if records.contains_key(&id) {
            return Err(EntityError::AlreadyExists {
                resource: T::resource().to_string(),
                id,
            }
            .into());
        }

        records.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: &str) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| lock_error("read", e))?;

        Ok(records.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| lock_error("read", e))?;

        Ok(records.values().cloned().collect())
    }

    async fn list(&self, params: &QueryParams) -> Result<Page<T>> {
        let mut rows = self.snapshot()?;

        if let Some((field, wanted)) = params.filter() {
            rows.retain(|row| row.get(field).and_then(scalar_text).as_deref() == Some(wanted));
        }

        if !params.search.is_empty() {
            let needle = params.search.to_lowercase();
            rows.retain(|row| {
                T::searchable_fields().iter().any(|field| {
                    row.get(*field)
                        .and_then(scalar_text)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            });
        }

        if !params.order_by.is_empty() {
            let key = params.order_by.as_str();
            rows.sort_by(|a, b| compare_values(a.get(key), b.get(key)));
            if params.order_direction() == Some(OrderDir::Desc) {
                rows.reverse();
            }
        }

        let total = rows.len();
        let offset = usize::try_from(params.offset()).unwrap_or(0);
        let limit = usize::try_from(params.limit).unwrap_or(0);

        let items = rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;

        Ok(Page::new(items, total))
    }

    async fn update(&self, id: &str, values: UpdateMap) -> Result<Option<T>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| lock_error("write", e))?;

        let Some(current) = records.get(id) else {
            return Ok(None);
        };

        let mut merged = serde_json::to_value(current)?;
        if let Value::Object(fields) = &mut merged {
            for (key, value) in values {
                // ids are immutable
                if key != "id" {
                    fields.insert(key, value);
                }
            }
        }

        let updated: T = serde_json::from_value(merged).map_err(|e| EntityError::OperationFailed {
            resource: T::resource().to_string(),
            operation: "update".to_string(),
            message: e.to_string(),
        })?;

        records.insert(id.to_string(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| lock_error("write", e))?;

        Ok(records.shift_remove(id).is_some())
    }

    async fn exists(&self, field: &str, value: &Value) -> Result<bool> {
        Ok(self
            .snapshot()?
            .iter()
            .any(|row| row.get(field) == Some(value)))
    }
}

/// Backend name reported in storage errors
const BACKEND: &str = "memory";

fn lock_error(mode: &str, err: impl std::fmt::Display) -> StorageError {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: format!("Failed to acquire {} lock: {}", mode, err),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Total order over optional JSON values: missing and null sort first
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
