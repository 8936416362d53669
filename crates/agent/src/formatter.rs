//! Result formatting: the text the operator sees.

use recordpilot_core::error::Error;
use recordpilot_tools::{Outcome, RecordTool};
use serde::Serialize;

/// Terminal outcome of one command. Exactly one is produced per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ActionOutcome {
    ClarifyingQuestion(String),
    ActionSummary(String),
}

impl ActionOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::ClarifyingQuestion(text) | Self::ActionSummary(text) => text,
        }
    }

    pub fn is_question(&self) -> bool {
        matches!(self, Self::ClarifyingQuestion(_))
    }
}

/// Summarize a successful tool run. Only called with a successful outcome.
pub fn summarize(tool: &RecordTool, outcome: &Outcome) -> ActionOutcome {
    let table = tool.table();
    let observation = outcome.render();
    let text = match outcome {
        Outcome::Records(records) => {
            format!("Found {} record(s) in {table}:\n{observation}", records.len())
        }
        Outcome::NotFound => format!("Searched {table}. {observation}"),
        Outcome::Created(_) => format!("Created a new {table} record.\n{observation}"),
        Outcome::Updated(_) => format!("Updated a {table} record.\n{observation}"),
    };
    ActionOutcome::ActionSummary(text)
}

pub fn render(outcome: &ActionOutcome) -> String {
    outcome.text().to_string()
}

/// Render a failure as one line: `<Category>: <message>`.
pub fn format_error(error: &Error) -> String {
    let message = error.to_string();
    let single_line = message.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}: {single_line}", error.category())
}
