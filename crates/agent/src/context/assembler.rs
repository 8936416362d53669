//! Context assembly: folds prior turns and the current request into one
//! linear text block for the planner.
//!
//! Layout:
//!
//! ```text
//! Conversation History:
//! OPERATOR: Create a ticket
//! SYSTEM: Did you mean an Incident or a Change Request?
//!
//! Current Request: "An incident"
//! ```
//!
//! # Determinism
//!
//! Assembly is a pure function of its inputs. No time-dependent or random
//! logic is used.
//!
//! # Bounding
//!
//! With a character budget, the oldest turns are dropped first until the
//! block fits. The current request is never dropped, even if it alone
//! exceeds the budget.

use recordpilot_core::message::ConversationTurn;
use serde::Serialize;
use tracing::debug;

const HISTORY_HEADER: &str = "Conversation History:";
const EMPTY_HISTORY: &str = "(none)";

/// The assembled context, ready to be sent as the planner's user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledContext {
    pub text: String,
    /// Turns that made it into `text`.
    pub turns_included: usize,
    /// Oldest turns dropped to respect the budget.
    pub dropped_turns: usize,
}

/// The context assembler. Stateless; create one and reuse it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler {
    max_chars: Option<usize>,
}

impl ContextAssembler {
    /// `None` means unbounded.
    pub fn new(max_chars: Option<usize>) -> Self {
        Self { max_chars }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn assemble(&self, current_text: &str, history: &[ConversationTurn]) -> AssembledContext {
        let lines: Vec<String> = history
            .iter()
            .map(|turn| format!("{}: {}", turn.role.tag(), turn.text))
            .collect();
        let request_line = format!("Current Request: \"{current_text}\"");

        let start = match self.max_chars {
            Some(max) => first_kept_turn(&lines, &request_line, max),
            None => 0,
        };
        let kept = &lines[start..];

        let body = if kept.is_empty() {
            EMPTY_HISTORY.to_string()
        } else {
            kept.join("\n")
        };

        if start > 0 {
            debug!(
                dropped_turns = start,
                kept_turns = kept.len(),
                "Context over budget, dropped oldest turns"
            );
        }

        AssembledContext {
            text: format!("{HISTORY_HEADER}\n{body}\n\n{request_line}"),
            turns_included: kept.len(),
            dropped_turns: start,
        }
    }
}

/// Index of the oldest turn that can be kept within `max` characters.
fn first_kept_turn(lines: &[String], request_line: &str, max: usize) -> usize {
    // Header + "\n", body, "\n\n", request line.
    let fixed = HISTORY_HEADER.chars().count() + 1 + 2 + request_line.chars().count();
    let lens: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
    let mut body: usize = lens.iter().sum::<usize>() + lens.len().saturating_sub(1);

    let mut start = 0;
    while start < lines.len() && fixed + body > max {
        body -= lens[start];
        if start + 1 < lines.len() {
            body -= 1;
        }
        start += 1;
    }
    start
}
