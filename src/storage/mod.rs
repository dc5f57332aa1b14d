//! Data-access boundary for resource controllers
//!
//! Controllers talk to storage through the [`Repository`] trait. The
//! framework is agnostic to the backing store; [`InMemoryRepository`] is
//! provided for development and tests.

#[cfg(feature = "in-memory")]
pub mod in_memory;

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryRepository;

use crate::core::query::QueryParams;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Partial update payload: wire field name to new value
pub type UpdateMap = Map<String, Value>;

/// A storable resource
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular resource name used in errors and logs (e.g. "account")
    fn resource() -> &'static str;

    fn id(&self) -> String;

    /// Fields matched by the `search` query parameter
    fn searchable_fields() -> &'static [&'static str] {
        &[]
    }
}

/// One page of a listing plus the number of matches before paging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }
}

/// CRUD operations for a single record type
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Store a new record; fails when its id is already taken
    async fn create(&self, record: T) -> Result<T>;

    async fn find(&self, id: &str) -> Result<Option<T>>;

    async fn all(&self) -> Result<Vec<T>>;

    /// Filtered, searched, ordered and paged listing
    ///
    /// `params` are expected to be normalized.
    async fn list(&self, params: &QueryParams) -> Result<Page<T>>;

    /// Merge `values` into the stored record, returning the updated record
    async fn update(&self, id: &str, values: UpdateMap) -> Result<Option<T>>;

    /// Remove a record, returning whether it existed
    async fn delete(&self, id: &str) -> Result<bool>;

    /// True when some record has `field` equal to `value`
    async fn exists(&self, field: &str, value: &Value) -> Result<bool>;
}
