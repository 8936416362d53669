//! Shared test helpers for tool tests.

use async_trait::async_trait;
use recordpilot_core::error::PlatformError;
use recordpilot_core::platform::{CreatedRecord, ListQuery, Record, RecordStore, UpdatedRecord};
use serde_json::Value;
use std::sync::Mutex;

/// An in-memory store that counts every call it receives.
///
/// Lists return the canned records; creates answer with a fixed identifier
/// pair; updates echo the id. With `failing`, every call returns that error.
#[derive(Default)]
pub struct CountingStore {
    records: Vec<Record>,
    failure: Option<PlatformError>,
    calls: Mutex<usize>,
    lists: Mutex<Vec<(String, ListQuery)>>,
}

impl CountingStore {
    pub fn with_records(mut self, records: Vec<Value>) -> Self {
        self.records = records
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();
        self
    }

    pub fn failing(mut self, error: PlatformError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn last_list(&self) -> Option<(String, ListQuery)> {
        self.lists.lock().unwrap().last().cloned()
    }

    fn record_call(&self) -> Result<(), PlatformError> {
        *self.calls.lock().unwrap() += 1;
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    fn instance(&self) -> &str {
        "https://test.example.com"
    }

    async fn count(&self, _table: &str, _filter: &str) -> Result<u64, PlatformError> {
        self.record_call()?;
        Ok(self.records.len() as u64)
    }

    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, PlatformError> {
        self.lists
            .lock()
            .unwrap()
            .push((table.to_string(), query.clone()));
        self.record_call()?;
        Ok(self.records.clone())
    }

    async fn create(&self, _table: &str, _payload: &Record) -> Result<CreatedRecord, PlatformError> {
        self.record_call()?;
        Ok(CreatedRecord {
            sys_id: "new-sys-id".into(),
            number: Some("INC0010001".into()),
        })
    }

    async fn update(
        &self,
        _table: &str,
        sys_id: &str,
        _payload: &Record,
    ) -> Result<UpdatedRecord, PlatformError> {
        self.record_call()?;
        Ok(UpdatedRecord {
            sys_id: sys_id.to_string(),
        })
    }
}
