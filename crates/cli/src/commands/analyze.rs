//! `recordpilot analyze`: Explain an error log entry.

use super::{build_agent, load_config, target_instance};

pub async fn run(error: String, instance: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let instance = target_instance(&config, instance)?;
    let agent = build_agent(&config)?;

    println!("{}", agent.run_analysis(&error, &instance).await);
    Ok(())
}
