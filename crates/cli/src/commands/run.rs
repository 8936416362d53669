//! `recordpilot run`: Send one operator command to the agent.

use recordpilot_core::message::ConversationTurn;
use std::path::{Path, PathBuf};

use super::{build_agent, load_config, target_instance};

pub async fn run(
    message: String,
    instance: Option<String>,
    history: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let instance = target_instance(&config, instance)?;
    let history = match history {
        Some(path) => read_history(&path)?,
        None => Vec::new(),
    };
    tracing::debug!(instance = %instance, history_turns = history.len(), "Running command");

    let agent = build_agent(&config)?;
    let result = agent.run_command(&message, &history, &instance).await;
    println!("{result}");

    Ok(())
}

/// Read prior turns from a JSON array of `{role, text}` objects.
fn read_history(path: &Path) -> Result<Vec<ConversationTurn>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read history {}: {e}", path.display()))?;
    let turns = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid history {}: {e}", path.display()))?;
    Ok(turns)
}
