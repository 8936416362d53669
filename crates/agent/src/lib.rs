//! The operator agent: turns one natural-language command into either a
//! clarifying question or exactly one record operation.
//!
//! 1. **Assemble** prior turns and the current request into one text block
//! 2. **Resolve** intent: clarify, or select one tool invocation
//! 3. **Dispatch** the invocation against the per-request target instance
//! 4. **Format** the outcome (or the categorized failure) as text
//!
//! Error-log analysis is a single-turn variant that skips dispatch.
//! Interview practice asks one knowledge-grounded question and grades the
//! answer in a second, independent call.

pub mod ambiguity;
pub mod analysis;
pub mod context;
pub mod formatter;
pub mod interview;
pub mod operator;
pub mod planner;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use analysis::ErrorAnalysis;
pub use context::{AssembledContext, ContextAssembler};
pub use formatter::{ActionOutcome, format_error};
pub use interview::{Grade, Interviewer, Verdict};
pub use operator::AdminAgent;
pub use planner::{Decision, IntentResolver, Reasoner, parse_reply};
