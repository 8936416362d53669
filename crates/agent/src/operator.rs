//! The administrator agent: entry points for one operator command.
//!
//! ```text
//! AWAITING_INTENT ──► CLARIFYING  ──► DONE
//!                 └─► DISPATCHING ──► DONE
//! ```
//!
//! One command is one synchronous chain: assemble context, one decision
//! call, at most one tool run, format. Nothing is retried across states.
//! History is an explicit argument on every call; the agent keeps no
//! per-conversation state.

use recordpilot_config::AppConfig;
use recordpilot_core::error::Error;
use recordpilot_core::message::ConversationTurn;
use recordpilot_core::platform::StoreConnector;
use recordpilot_core::provider::Provider;
use recordpilot_tools::RecordTool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analysis::ErrorAnalysis;
use crate::formatter::{self, ActionOutcome};
use crate::planner::{Decision, IntentResolver};
use crate::prompt;

pub struct AdminAgent {
    resolver: IntentResolver,
    connector: Arc<dyn StoreConnector>,
}

impl AdminAgent {
    pub fn new(resolver: IntentResolver, connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            resolver,
            connector,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        connector: Arc<dyn StoreConnector>,
    ) -> Self {
        Self::new(IntentResolver::from_config(provider, config), connector)
    }

    /// Resolve and, if unambiguous, act. Returns the terminal outcome.
    pub async fn handle(
        &self,
        command_text: &str,
        history: &[ConversationTurn],
        target_instance: &str,
    ) -> Result<ActionOutcome, Error> {
        let store = self.connector.connect(target_instance)?;
        info!(
            state = "awaiting_intent",
            instance = store.instance(),
            history_turns = history.len(),
            "Command received"
        );

        let outcome = match self.resolver.resolve(command_text, history).await? {
            Decision::Clarify(question) => {
                info!(state = "clarifying", "Asking operator to clarify");
                ActionOutcome::ClarifyingQuestion(question)
            }
            Decision::Dispatch(invocation) => {
                let tool = RecordTool::parse(&invocation)?;
                info!(
                    state = "dispatching",
                    tool = %invocation.kind,
                    table = tool.table(),
                    "Dispatching tool"
                );
                let result = tool.run(store.as_ref()).await?;
                formatter::summarize(&tool, &result)
            }
        };

        info!(state = "done", question = outcome.is_question(), "Command finished");
        Ok(outcome)
    }

    /// Formatted outcome, or the categorized failure.
    pub async fn execute_command(
        &self,
        command_text: &str,
        history: &[ConversationTurn],
        target_instance: &str,
    ) -> Result<String, Error> {
        let outcome = self.handle(command_text, history, target_instance).await?;
        Ok(formatter::render(&outcome))
    }

    /// Outermost boundary: failures become a one-line error string.
    pub async fn run_command(
        &self,
        command_text: &str,
        history: &[ConversationTurn],
        target_instance: &str,
    ) -> String {
        match self
            .execute_command(command_text, history, target_instance)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(category = e.category(), error = %e, "Command failed");
                formatter::format_error(&e)
            }
        }
    }

    /// Explain an error log entry. One provider call, no tool dispatch.
    pub async fn analyze(
        &self,
        error_text: &str,
        target_instance: &str,
    ) -> Result<ErrorAnalysis, Error> {
        let store = self.connector.connect(target_instance)?;
        info!(instance = store.instance(), "Analyzing error log entry");

        let reply = self
            .resolver
            .reasoner()
            .ask(
                prompt::analysis_system_prompt(),
                prompt::analysis_request(error_text),
            )
            .await?;
        Ok(ErrorAnalysis::parse(&reply)?)
    }

    pub async fn analyze_error_log(
        &self,
        error_text: &str,
        target_instance: &str,
    ) -> Result<String, Error> {
        Ok(self.analyze(error_text, target_instance).await?.render())
    }

    /// Like [`Self::analyze_error_log`], but never fails.
    pub async fn run_analysis(&self, error_text: &str, target_instance: &str) -> String {
        match self.analyze_error_log(error_text, target_instance).await {
            Ok(text) => text,
            Err(e) => {
                warn!(category = e.category(), error = %e, "Analysis failed");
                formatter::format_error(&e)
            }
        }
    }
}
