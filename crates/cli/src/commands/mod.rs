pub mod analyze;
pub mod config_cmd;
pub mod doctor;
pub mod interview;
pub mod run;
pub mod serve;
pub mod stats;

use recordpilot_agent::AdminAgent;
use recordpilot_config::AppConfig;
use recordpilot_platform::PlatformClient;
use std::sync::Arc;

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// The instance named on the command line, or the configured default.
pub(crate) fn target_instance(
    config: &AppConfig,
    requested: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    requested
        .or_else(|| config.platform.default_instance.clone())
        .ok_or_else(|| {
            "No instance given. Pass --instance or set platform.default_instance \
             (or RECORDPILOT_INSTANCE)."
                .into()
        })
}

pub(crate) fn platform_client(
    config: &AppConfig,
) -> Result<PlatformClient, Box<dyn std::error::Error>> {
    PlatformClient::from_config(&config.platform).map_err(|e| {
        format!("{e}. Set SN_USERNAME and SN_PASSWORD or add them under [platform].").into()
    })
}

pub(crate) fn build_agent(config: &AppConfig) -> Result<AdminAgent, Box<dyn std::error::Error>> {
    let provider = recordpilot_providers::build_from_config(config)?;
    let connector = Arc::new(platform_client(config)?);
    Ok(AdminAgent::from_config(config, provider, connector))
}
