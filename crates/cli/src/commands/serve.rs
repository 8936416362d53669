//! `recordpilot serve`: Start the HTTP API server.

use super::load_config;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("RecordPilot Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    match &config.platform.default_instance {
        Some(instance) => println!("   Default instance: {instance}"),
        None => println!("   Default instance: (none, requests must name one)"),
    }

    recordpilot_gateway::start(config).await?;

    Ok(())
}
