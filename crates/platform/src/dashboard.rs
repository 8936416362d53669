//! Read-only instance views for the dashboard endpoints.
//!
//! These aggregate many counts and lists into one snapshot. A single failing
//! query must not sink the whole view, so the helpers here degrade to zero or
//! an empty list and log the failure instead of propagating it.

use chrono::{DateTime, Utc};
use recordpilot_core::error::PlatformError;
use recordpilot_core::filter::Filter;
use recordpilot_core::platform::{ListQuery, Record, RecordStore};
use serde::Serialize;
use tracing::warn;

/// Count, or 0 when the store fails.
pub async fn count_or_zero(store: &dyn RecordStore, table: &str, filter: &str) -> u64 {
    match store.count(table, filter).await {
        Ok(n) => n,
        Err(e) => {
            warn!(instance = store.instance(), table, filter, error = %e, "count failed, reporting 0");
            0
        }
    }
}

/// List, or an empty list when the store fails.
pub async fn list_or_empty(store: &dyn RecordStore, table: &str, query: &ListQuery) -> Vec<Record> {
    match store.list(table, query).await {
        Ok(records) => records,
        Err(e) => {
            warn!(instance = store.instance(), table, filter = %query.filter, error = %e, "list failed, reporting none");
            Vec::new()
        }
    }
}

/// Headline counters of one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceStats {
    pub incidents: u64,
    pub users: u64,
    pub failed_jobs: u64,
    pub p1_incidents: u64,
    pub unassigned_incidents: u64,
    pub active_changes: u64,
    pub today_errors: u64,
    pub recent_updates: u64,
    pub total_business_rules: u64,
    pub fetched_at: DateTime<Utc>,
}

pub async fn instance_stats(store: &dyn RecordStore) -> InstanceStats {
    let active = || Filter::new().equals("active", true);

    InstanceStats {
        incidents: count_or_zero(store, "incident", &active().build()).await,
        users: count_or_zero(store, "sys_user", &active().build()).await,
        failed_jobs: count_or_zero(store, "sys_trigger", &Filter::new().equals("state", 3).build())
            .await,
        p1_incidents: count_or_zero(store, "incident", &active().equals("priority", 1).build())
            .await,
        unassigned_incidents: count_or_zero(
            store,
            "incident",
            &active().empty("assigned_to").build(),
        )
        .await,
        active_changes: count_or_zero(store, "change_request", &active().build()).await,
        today_errors: count_or_zero(
            store,
            "syslog",
            &Filter::new().equals("level", 2).created_today().build(),
        )
        .await,
        recent_updates: count_or_zero(store, "sys_update_xml", &Filter::new().created_today().build())
            .await,
        total_business_rules: count_or_zero(store, "sys_script", &active().build()).await,
        fetched_at: Utc::now(),
    }
}

/// Installed application scopes, most recently updated first.
pub async fn applications(store: &dyn RecordStore) -> Vec<Record> {
    let query = ListQuery::new(Filter::new().order_by_desc("sys_updated_on").build(), 50)
        .with_fields(&["name", "scope", "version", "sys_updated_on"]);
    list_or_empty(store, "sys_scope", &query).await
}

/// Most recent error-level log entries.
pub async fn recent_errors(store: &dyn RecordStore, limit: u32) -> Vec<Record> {
    let filter = Filter::new()
        .equals("level", 2)
        .order_by_desc("sys_created_on")
        .build();
    let query = ListQuery::new(filter, limit)
        .with_fields(&["sys_created_on", "source", "message", "sys_id"]);
    list_or_empty(store, "syslog", &query).await
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityStats {
    pub failed_logins: u64,
    pub new_admins: u64,
    pub fetched_at: DateTime<Utc>,
}

pub async fn security_stats(store: &dyn RecordStore) -> SecurityStats {
    SecurityStats {
        failed_logins: count_or_zero(
            store,
            "sysevent",
            &Filter::new()
                .equals("name", "login.failed")
                .created_today()
                .build(),
        )
        .await,
        new_admins: count_or_zero(
            store,
            "sys_user_has_role",
            &Filter::new()
                .equals("role.name", "admin")
                .created_today()
                .build(),
        )
        .await,
        fetched_at: Utc::now(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationHealth {
    pub ecc_errors: u64,
    pub fetched_at: DateTime<Utc>,
}

pub async fn integration_health(store: &dyn RecordStore) -> IntegrationHealth {
    IntegrationHealth {
        ecc_errors: count_or_zero(
            store,
            "ecc_queue",
            &Filter::new().equals("state", "error").created_today().build(),
        )
        .await,
        fetched_at: Utc::now(),
    }
}

/// Check connectivity and credentials by reading one knowledge article.
///
/// Unlike the views above this is strict: the caller wants to see the failure.
pub async fn check_connection(store: &dyn RecordStore) -> Result<Option<Record>, PlatformError> {
    let records = store
        .list("kb_knowledge", &ListQuery::new("", 1).with_fields(&["short_description"]))
        .await?;
    Ok(records.into_iter().next())
}
