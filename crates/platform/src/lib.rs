//! Remote record store adapter.
//!
//! [`PlatformClient`] holds credentials and a connection pool and hands out
//! an [`InstanceHandle`] per target instance. Handles implement
//! [`recordpilot_core::RecordStore`]; nothing above this crate sees HTTP.
//! [`dashboard`] and [`knowledge`] are read-only views built on that trait.

pub mod client;
pub mod dashboard;
pub mod knowledge;
pub mod retry;

pub use client::{Credentials, InstanceHandle, PlatformClient, normalize_instance};
pub use dashboard::{
    IntegrationHealth, InstanceStats, SecurityStats, count_or_zero, list_or_empty,
};
pub use knowledge::{KnowledgeArticle, render_articles, search_articles};
pub use retry::RetryPolicy;
