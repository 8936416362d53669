//! Shared test helpers for agent tests.

use async_trait::async_trait;
use recordpilot_core::error::{PlatformError, ProviderError};
use recordpilot_core::platform::{
    CreatedRecord, ListQuery, Record, RecordStore, StoreConnector, UpdatedRecord,
};
use recordpilot_core::provider::{CompletionRequest, CompletionResponse, Provider, Usage};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A mock provider that returns a sequence of scripted replies.
///
/// Panics if more calls are made than replies provided.
pub struct ScriptedProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: replies.into_iter().map(String::from).collect(),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.get(index).unwrap_or_else(|| {
            panic!(
                "ScriptedProvider: no more replies (call #{index}, have {})",
                self.replies.len()
            )
        });

        Ok(CompletionResponse {
            content: reply.clone(),
            model: "mock-model".into(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// Every store operation the agent performed.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Count(String, String),
    List(String, ListQuery),
    Create(String, Record),
    Update(String, String, Record),
}

/// In-memory store recording every call.
#[derive(Default)]
pub struct CountingStore {
    records: Vec<Record>,
    failure: Option<PlatformError>,
    calls: Mutex<Vec<StoreCall>>,
}

impl CountingStore {
    pub fn with_records(mut self, records: Vec<serde_json::Value>) -> Self {
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

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> Result<(), PlatformError> {
        self.calls.lock().unwrap().push(call);
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

    async fn count(&self, table: &str, filter: &str) -> Result<u64, PlatformError> {
        self.record(StoreCall::Count(table.into(), filter.into()))?;
        Ok(self.records.len() as u64)
    }

    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, PlatformError> {
        self.record(StoreCall::List(table.into(), query.clone()))?;
        Ok(self.records.clone())
    }

    async fn create(&self, table: &str, payload: &Record) -> Result<CreatedRecord, PlatformError> {
        self.record(StoreCall::Create(table.into(), payload.clone()))?;
        Ok(CreatedRecord {
            sys_id: "9d385017c611228701d22104cc95c371".into(),
            number: Some("INC0010001".into()),
        })
    }

    async fn update(
        &self,
        table: &str,
        sys_id: &str,
        payload: &Record,
    ) -> Result<UpdatedRecord, PlatformError> {
        self.record(StoreCall::Update(table.into(), sys_id.into(), payload.clone()))?;
        Ok(UpdatedRecord {
            sys_id: sys_id.to_string(),
        })
    }
}

/// Hands out one shared store and remembers which instances were asked for.
pub struct CountingConnector {
    pub store: Arc<CountingStore>,
    instances: Mutex<Vec<String>>,
}

impl CountingConnector {
    pub fn new(store: CountingStore) -> Self {
        Self {
            store: Arc::new(store),
            instances: Mutex::new(Vec::new()),
        }
    }

    pub fn instances(&self) -> Vec<String> {
        self.instances.lock().unwrap().clone()
    }
}

impl StoreConnector for CountingConnector {
    fn connect(&self, target_instance: &str) -> Result<Arc<dyn RecordStore>, PlatformError> {
        if target_instance.trim().is_empty() {
            return Err(PlatformError::InvalidInstance(target_instance.to_string()));
        }
        self.instances
            .lock()
            .unwrap()
            .push(target_instance.to_string());
        Ok(self.store.clone())
    }
}
