//! HTTP client for the remote record store's REST surface.
//!
//! Endpoints, relative to an instance base address:
//! - `GET  /api/now/stats/{table}?sysparm_count=true&sysparm_query=…`
//! - `GET  /api/now/table/{table}?sysparm_query=…&sysparm_limit=…`
//! - `POST /api/now/table/{table}` (answers 201)
//! - `PUT  /api/now/table/{table}/{sys_id}` (answers 200)
//!
//! All requests use HTTP Basic auth and JSON bodies.

use async_trait::async_trait;
use recordpilot_config::PlatformConfig;
use recordpilot_core::error::PlatformError;
use recordpilot_core::platform::{
    CreatedRecord, ListQuery, Record, RecordStore, StoreConnector, UpdatedRecord,
};
use reqwest::{RequestBuilder, Url};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::retry::RetryPolicy;

/// Basic-auth credentials for the remote store.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug)]
struct Shared {
    http: reqwest::Client,
    credentials: Credentials,
    retry: RetryPolicy,
    timeout_secs: u64,
}

/// Connection settings shared by every instance handle.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    shared: Arc<Shared>,
}

impl PlatformClient {
    pub fn new(
        credentials: Credentials,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlatformError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            shared: Arc::new(Shared {
                http,
                credentials,
                retry,
                timeout_secs: timeout.as_secs(),
            }),
        })
    }

    /// Build a client from the `[platform]` config section.
    pub fn from_config(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            return Err(PlatformError::NotConfigured(
                "missing credentials (set SN_USERNAME and SN_PASSWORD)".into(),
            ));
        };

        Self::new(
            Credentials::new(username, password),
            Duration::from_secs(config.request_timeout_secs),
            RetryPolicy::new(
                config.max_retries,
                Duration::from_millis(config.retry_backoff_ms),
            ),
        )
    }

    /// Bind to one instance.
    pub fn instance(&self, target_instance: &str) -> Result<InstanceHandle, PlatformError> {
        Ok(InstanceHandle {
            shared: Arc::clone(&self.shared),
            base: normalize_instance(target_instance)?,
        })
    }
}

impl StoreConnector for PlatformClient {
    fn connect(&self, target_instance: &str) -> Result<Arc<dyn RecordStore>, PlatformError> {
        Ok(Arc::new(self.instance(target_instance)?))
    }
}

/// Turn an operator-supplied instance address into a base URL.
///
/// A bare host gets `https://`. Only http(s) URLs with a host are accepted.
pub fn normalize_instance(target_instance: &str) -> Result<Url, PlatformError> {
    let trimmed = target_instance.trim();
    if trimmed.is_empty() {
        return Err(PlatformError::InvalidInstance(target_instance.to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(candidate.trim_end_matches('/'))
        .map_err(|_| PlatformError::InvalidInstance(target_instance.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(PlatformError::InvalidInstance(target_instance.to_string()));
    }

    Ok(url)
}

/// A [`RecordStore`] bound to one instance.
#[derive(Debug, Clone)]
pub struct InstanceHandle {
    shared: Arc<Shared>,
    base: Url,
}

impl InstanceHandle {
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PlatformError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| PlatformError::InvalidInstance(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        let creds = &self.shared.credentials;
        builder
            .basic_auth(&creds.username, Some(&creds.password))
            .header("Accept", "application/json")
    }

    /// Send a request and read the status and body text.
    async fn send(&self, builder: RequestBuilder) -> Result<(u16, String), PlatformError> {
        let response = self
            .authed(builder)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        Ok((status, body))
    }

    fn transport_error(&self, e: reqwest::Error) -> PlatformError {
        if e.is_timeout() {
            PlatformError::Timeout(self.shared.timeout_secs)
        } else {
            PlatformError::Transport(e.to_string())
        }
    }

    async fn count_once(&self, table: &str, filter: &str) -> Result<u64, PlatformError> {
        let url = self.endpoint(&["api", "now", "stats", table])?;
        let request = self
            .shared
            .http
            .get(url)
            .query(&[("sysparm_count", "true"), ("sysparm_query", filter)]);

        let (status, body) = self.send(request).await?;
        if status != 200 {
            return Err(PlatformError::Status { status, body });
        }
        parse_count(&body)
    }

    async fn list_once(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, PlatformError> {
        let url = self.endpoint(&["api", "now", "table", table])?;
        let mut params = vec![
            ("sysparm_query", query.filter.clone()),
            ("sysparm_limit", query.limit.to_string()),
        ];
        if !query.fields.is_empty() {
            params.push(("sysparm_fields", query.fields.join(",")));
        }
        if query.display_value {
            params.push(("sysparm_display_value", "true".to_string()));
        }

        let (status, body) = self.send(self.shared.http.get(url).query(&params)).await?;
        if status != 200 {
            return Err(PlatformError::Status { status, body });
        }
        parse_records(&body)
    }
}

#[async_trait]
impl RecordStore for InstanceHandle {
    fn instance(&self) -> &str {
        self.base.as_str()
    }

    async fn count(&self, table: &str, filter: &str) -> Result<u64, PlatformError> {
        debug!(instance = %self.base, table, filter, "count");
        self.shared
            .retry
            .run("count", move || self.count_once(table, filter))
            .await
    }

    async fn list(&self, table: &str, query: &ListQuery) -> Result<Vec<Record>, PlatformError> {
        debug!(instance = %self.base, table, filter = %query.filter, limit = query.limit, "list");
        self.shared
            .retry
            .run("list", move || self.list_once(table, query))
            .await
    }

    async fn create(&self, table: &str, payload: &Record) -> Result<CreatedRecord, PlatformError> {
        debug!(instance = %self.base, table, "create");
        let url = self.endpoint(&["api", "now", "table", table])?;
        let (status, body) = self.send(self.shared.http.post(url).json(payload)).await?;
        if status != 201 {
            warn!(table, status, "create rejected");
            return Err(PlatformError::Status { status, body });
        }

        let result = parse_result_object(&body)?;
        let sys_id = string_field(&result, "sys_id")
            .or_else(|| string_field(&result, "id"))
            .ok_or_else(|| PlatformError::Decode("created record has no sys_id".into()))?;

        Ok(CreatedRecord {
            sys_id,
            number: string_field(&result, "number"),
        })
    }

    async fn update(
        &self,
        table: &str,
        sys_id: &str,
        payload: &Record,
    ) -> Result<UpdatedRecord, PlatformError> {
        debug!(instance = %self.base, table, sys_id, "update");
        let url = self.endpoint(&["api", "now", "table", table, sys_id])?;
        let (status, body) = self.send(self.shared.http.put(url).json(payload)).await?;
        if status != 200 {
            warn!(table, sys_id, status, "update rejected");
            return Err(PlatformError::Status { status, body });
        }

        // The write already succeeded, so an unreadable body falls back to the requested id.
        let result = parse_result_object(&body).ok();
        let sys_id = result
            .as_ref()
            .and_then(|r| string_field(r, "sys_id").or_else(|| string_field(r, "id")))
            .unwrap_or_else(|| sys_id.to_string());

        Ok(UpdatedRecord { sys_id })
    }
}

// --- Response decoding ---

fn parse_json(body: &str) -> Result<Value, PlatformError> {
    serde_json::from_str(body).map_err(|e| PlatformError::Decode(e.to_string()))
}

/// `{"result": {"stats": {"count": N}}}`; the store may send N as a string.
fn parse_count(body: &str) -> Result<u64, PlatformError> {
    let value = parse_json(body)?;
    let count = &value["result"]["stats"]["count"];
    match count {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| PlatformError::Decode(format!("no usable count in stats response: {count}")))
}

/// `{"result": [ {…}, … ]}`
fn parse_records(body: &str) -> Result<Vec<Record>, PlatformError> {
    match parse_json(body)? {
        Value::Object(mut root) => match root.remove("result") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(PlatformError::Decode(format!("record is not an object: {other}"))),
                })
                .collect(),
            _ => Err(PlatformError::Decode("missing 'result' array".into())),
        },
        _ => Err(PlatformError::Decode("response is not an object".into())),
    }
}

/// `{"result": {…}}`
fn parse_result_object(body: &str) -> Result<Record, PlatformError> {
    match parse_json(body)? {
        Value::Object(mut root) => match root.remove("result") {
            Some(Value::Object(record)) => Ok(record),
            _ => Err(PlatformError::Decode("missing 'result' object".into())),
        },
        _ => Err(PlatformError::Decode("response is not an object".into())),
    }
}

fn string_field(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
