//! RecordStore trait: the abstraction over a remote table-oriented store.
//!
//! A store is always bound to one target instance. The instance is part of
//! each request, so the agent asks a [`StoreConnector`] for a store per call
//! instead of holding a process-wide one.
//!
//! Filter expressions are opaque here: they are owned by the remote store
//! and forwarded verbatim.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::PlatformError;

/// A record as returned by (or sent to) the remote store: field name → value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Parameters of a bounded list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Filter expression in the store's query language.
    pub filter: String,
    /// Fields to return; empty means all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Maximum number of records.
    pub limit: u32,
    /// Ask the store to render reference fields as display values.
    #[serde(default)]
    pub display_value: bool,
}

impl ListQuery {
    pub fn new(filter: impl Into<String>, limit: u32) -> Self {
        Self {
            filter: filter.into(),
            fields: Vec::new(),
            limit,
            display_value: false,
        }
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_display_values(mut self) -> Self {
        self.display_value = true;
        self
    }
}

/// Identifier pair assigned by the store to a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub sys_id: String,
    /// Human-facing display number (e.g. `INC0010001`); not every table has one.
    #[serde(default)]
    pub number: Option<String>,
}

/// Identifier of an updated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedRecord {
    pub sys_id: String,
}

/// The four logical operations against one remote store instance.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Base address of the instance this store talks to.
    fn instance(&self) -> &str;

    /// Aggregate count of records in `table` matching `filter`.
    async fn count(&self, table: &str, filter: &str) -> Result<u64, PlatformError>;

    /// Bounded list of records.
    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, PlatformError>;

    /// Create a record. The store must answer 201.
    async fn create(&self, table: &str, payload: &Record) -> Result<CreatedRecord, PlatformError>;

    /// Update a record by id. The store must answer 200.
    async fn update(
        &self,
        table: &str,
        sys_id: &str,
        payload: &Record,
    ) -> Result<UpdatedRecord, PlatformError>;
}

/// Resolves a per-request target instance into a [`RecordStore`].
pub trait StoreConnector: Send + Sync {
    fn connect(&self, target_instance: &str) -> Result<Arc<dyn RecordStore>, PlatformError>;
}
