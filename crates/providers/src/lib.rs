//! Reasoning provider implementations for RecordPilot.
//!
//! All providers implement the `recordpilot_core::Provider` trait. The
//! planner only ever sees `Arc<dyn Provider>`.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use recordpilot_config::AppConfig;
use recordpilot_core::error::ProviderError;
use recordpilot_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider.
///
/// Fails when no API key is available; local endpoints that need no key can
/// be configured with any placeholder value.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        ProviderError::NotConfigured(
            "no API key (set RECORDPILOT_API_KEY or GOOGLE_API_KEY)".into(),
        )
    })?;

    let provider = OpenAiCompatProvider::new(
        config.provider.name.clone(),
        config.provider.api_url.clone(),
        api_key,
        Duration::from_secs(config.provider.timeout_secs),
    )?;

    tracing::debug!(
        provider = %config.provider.name,
        url = %config.provider.api_url,
        "Provider built from config"
    );

    Ok(Arc::new(provider))
}
