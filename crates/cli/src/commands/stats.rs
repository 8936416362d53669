//! `recordpilot stats`: Print a dashboard view as pretty JSON.

use clap::ValueEnum;
use recordpilot_core::platform::StoreConnector;
use recordpilot_platform::dashboard;

use super::{load_config, platform_client, target_instance};

const RECENT_ERRORS_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsKind {
    Instance,
    Security,
    Integration,
    Applications,
    Errors,
}

pub async fn run(kind: StatsKind, instance: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let instance = target_instance(&config, instance)?;
    let store = platform_client(&config)?.connect(&instance)?;
    let store = store.as_ref();

    let json = match kind {
        StatsKind::Instance => serde_json::to_string_pretty(&dashboard::instance_stats(store).await)?,
        StatsKind::Security => serde_json::to_string_pretty(&dashboard::security_stats(store).await)?,
        StatsKind::Integration => {
            serde_json::to_string_pretty(&dashboard::integration_health(store).await)?
        }
        StatsKind::Applications => {
            serde_json::to_string_pretty(&dashboard::applications(store).await)?
        }
        StatsKind::Errors => {
            serde_json::to_string_pretty(&dashboard::recent_errors(store, RECENT_ERRORS_LIMIT).await)?
        }
    };

    println!("{json}");
    Ok(())
}
