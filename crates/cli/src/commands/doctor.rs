//! `recordpilot doctor`: Diagnose configuration and connectivity.

use recordpilot_config::AppConfig;
use recordpilot_core::platform::StoreConnector;
use recordpilot_platform::dashboard;

use super::platform_client;

pub async fn run(instance: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    println!("RecordPilot Doctor");
    println!();

    let mut issues = 0u32;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file at {} (defaults in use)", config_path.display());
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            return Err(e.into());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured ({})", config.provider.name);
        match recordpilot_providers::build_from_config(&config) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Provider reachable at {}", config.provider.api_url),
                Ok(false) => {
                    println!("  ❌ Provider at {} rejected the request", config.provider.api_url);
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider unreachable: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ❌ No API key: set RECORDPILOT_API_KEY or GOOGLE_API_KEY");
        issues += 1;
    }

    let client = if config.has_platform_credentials() {
        match platform_client(&config) {
            Ok(client) => {
                println!("  ✅ Instance credentials configured");
                Some(client)
            }
            Err(e) => {
                println!("  ❌ {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ❌ No instance credentials: set SN_USERNAME and SN_PASSWORD");
        issues += 1;
        None
    };

    match (client, instance.or_else(|| config.platform.default_instance.clone())) {
        (Some(client), Some(target)) => match client.connect(&target) {
            Ok(store) => match dashboard::check_connection(store.as_ref()).await {
                Ok(_) => println!("  ✅ Connected to {}", store.instance()),
                Err(e) => {
                    println!("  ❌ Connection to {} failed: {e}", store.instance());
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ {e}");
                issues += 1;
            }
        },
        (_, None) => {
            println!("  ⚠️  No instance to check: pass --instance or set platform.default_instance");
            issues += 1;
        }
        (None, Some(_)) => {}
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
