//! Intent resolution: one decision per request.
//!
//! The resolver either asks a clarifying question or selects exactly one
//! tool invocation. It never picks a table by guessing:
//!
//! 1. The deterministic [`ambiguity`](crate::ambiguity) guard runs first and
//!    may answer with a question without consulting the provider.
//! 2. Otherwise a single completion call is made with the assembled context.
//! 3. The reply is parsed strictly; anything that is not exactly one of the
//!    two allowed shapes is a [`ProtocolError`].

use recordpilot_config::AppConfig;
use recordpilot_core::error::{Error, ProtocolError, ProviderError};
use recordpilot_core::message::{ConversationTurn, Message};
use recordpilot_core::provider::{CompletionRequest, Provider};
use recordpilot_core::tool::{ToolInvocation, ToolKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::ambiguity;
use crate::context::ContextAssembler;
use crate::prompt;

/// What the resolver decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Clarify(String),
    Dispatch(ToolInvocation),
}

/// A provider plus the completion settings used for every call.
#[derive(Clone)]
pub struct Reasoner {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl Reasoner {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, config.default_model.clone())
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_timeout(Duration::from_secs(config.agent.planner_timeout_secs))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One completion call bounded by the configured deadline.
    pub async fn ask(&self, system: String, user: String) -> Result<String, Error> {
        let mut request = CompletionRequest::new(
            self.model.clone(),
            vec![Message::system(system), Message::user(user)],
        );
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        debug!(provider = self.provider.name(), model = %self.model, "Calling reasoning provider");

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!(
                    "no reply within {}s",
                    self.timeout.as_secs()
                ))
            })??;

        Ok(response.content)
    }
}

impl std::fmt::Debug for Reasoner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reasoner")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Decides between clarifying and acting.
#[derive(Debug, Clone)]
pub struct IntentResolver {
    reasoner: Reasoner,
    assembler: ContextAssembler,
    ambiguity_guard: bool,
}

impl IntentResolver {
    pub fn new(reasoner: Reasoner) -> Self {
        Self {
            reasoner,
            assembler: ContextAssembler::unbounded(),
            ambiguity_guard: true,
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(Reasoner::from_config(provider, config))
            .with_assembler(ContextAssembler::new(config.agent.max_context_chars))
            .with_ambiguity_guard(config.agent.ambiguity_guard)
    }

    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_ambiguity_guard(mut self, enabled: bool) -> Self {
        self.ambiguity_guard = enabled;
        self
    }

    pub fn reasoner(&self) -> &Reasoner {
        &self.reasoner
    }

    pub async fn resolve(
        &self,
        current_text: &str,
        history: &[ConversationTurn],
    ) -> Result<Decision, Error> {
        if self.ambiguity_guard {
            if let Some(found) = ambiguity::detect(current_text, history) {
                info!(
                    state = "clarifying",
                    term = found.term,
                    candidates = found.candidates.len(),
                    "Generic term without qualifier"
                );
                return Ok(Decision::Clarify(found.question()));
            }
        }

        let context = self.assembler.assemble(current_text, history);
        let reply = self
            .reasoner
            .ask(prompt::planner_system_prompt(), context.text)
            .await?;
        debug!(reply = %reply, "Planner reply");

        Ok(parse_reply(&reply)?)
    }
}

// --- Reply parsing ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Clarify,
    Action,
    ActionInput,
}

/// Split a key line into its key and the remainder of the line.
fn split_key(line: &str) -> Option<(Key, &str)> {
    let trimmed = line.trim_start().trim_start_matches('*').trim_start();
    let (label, rest) = trimmed.split_once(':')?;
    let label = label.trim().trim_end_matches('*').trim();
    let key = if label.eq_ignore_ascii_case("clarify") {
        Key::Clarify
    } else if label.eq_ignore_ascii_case("action input") {
        Key::ActionInput
    } else if label.eq_ignore_ascii_case("action") {
        Key::Action
    } else {
        return None;
    };
    Some((key, rest.trim_start_matches('*')))
}

/// Parse a planner reply into a [`Decision`].
///
/// Accepted shapes (keys case-insensitive, code fences and leading
/// free-text lines such as `Thought:` ignored):
///
/// ```text
/// CLARIFY: <question, may span lines>
/// ```
///
/// ```text
/// ACTION: <tool name>
/// ACTION INPUT: <raw argument>
/// ```
///
/// The action input continues onto following lines only while a JSON
/// object opened in it is still unclosed. Anything after a complete input
/// is commentary and is dropped, so it never reaches the remote store.
pub fn parse_reply(reply: &str) -> Result<Decision, ProtocolError> {
    let mut sections: Vec<(Key, Vec<&str>)> = Vec::new();
    let mut input = InputScan::default();
    let mut ignored = 0usize;

    for line in reply.lines() {
        if line.trim_start().starts_with("```") {
            continue;
        }
        match split_key(line) {
            Some((key, rest)) => {
                input = InputScan::default();
                if key == Key::ActionInput {
                    input.feed(rest);
                }
                sections.push((key, vec![rest]));
            }
            None => match sections.last_mut() {
                Some((Key::ActionInput, _)) if input.is_complete() => {
                    if !line.trim().is_empty() {
                        ignored += 1;
                    }
                }
                Some((key, body)) => {
                    if *key == Key::ActionInput {
                        input.feed(line);
                    }
                    body.push(line);
                }
                None => {}
            },
        }
    }
    if ignored > 0 {
        debug!(lines = ignored, "Ignored commentary after action input");
    }

    let text_of = |key: Key| -> Vec<String> {
        sections
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, body)| body.join("\n").trim().to_string())
            .collect()
    };
    let clarify = text_of(Key::Clarify);
    let action = text_of(Key::Action);
    let input = text_of(Key::ActionInput);

    match (clarify.as_slice(), action.as_slice(), input.as_slice()) {
        ([], [], []) => Err(ProtocolError::Unparseable(excerpt(reply))),
        ([_, ..], [], []) if clarify.len() > 1 => {
            Err(ProtocolError::Unparseable("more than one question".into()))
        }
        ([question], [], []) => {
            if question.is_empty() {
                Err(ProtocolError::Empty("question"))
            } else {
                Ok(Decision::Clarify(question.clone()))
            }
        }
        ([_, ..], _, _) => Err(ProtocolError::Conflicting),
        ([], [name], [argument]) => {
            let name = name.trim_matches(|c: char| c == '`' || c == '"' || c == '[' || c == ']');
            if name.is_empty() {
                return Err(ProtocolError::Empty("tool name"));
            }
            let kind = ToolKind::from_name(name)
                .ok_or_else(|| ProtocolError::UnknownTool(name.to_string()))?;
            let argument = argument.trim_matches('`').trim();
            if argument.is_empty() {
                return Err(ProtocolError::Empty("action input"));
            }
            Ok(Decision::Dispatch(ToolInvocation::new(kind, argument)))
        }
        ([], [_], []) => Err(ProtocolError::Empty("action input")),
        ([], [], [_]) => Err(ProtocolError::Empty("tool name")),
        _ => Err(ProtocolError::Unparseable(
            "more than one tool invocation".into(),
        )),
    }
}

/// Tracks whether an action input is complete: it has content and every
/// JSON brace opened outside a string literal has been closed.
#[derive(Debug, Default)]
struct InputScan {
    has_content: bool,
    depth: i32,
    in_string: bool,
    escaped: bool,
}

impl InputScan {
    fn feed(&mut self, line: &str) {
        if !line.trim().is_empty() {
            self.has_content = true;
        }
        for c in line.chars() {
            if self.in_string {
                match c {
                    _ if self.escaped => self.escaped = false,
                    '\\' => self.escaped = true,
                    '"' => self.in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => self.in_string = true,
                '{' => self.depth += 1,
                '}' => self.depth -= 1,
                _ => {}
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.has_content && self.depth <= 0 && !self.in_string
    }
}

fn excerpt(reply: &str) -> String {
    let single_line = reply.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > 120 {
        let cut: String = single_line.chars().take(120).collect();
        format!("{cut}…")
    } else {
        single_line
    }
}
