//! Conversation turns and provider messages.
//!
//! History flows in from the caller on every invocation as an ordered list of
//! [`ConversationTurn`]s (oldest first). Nothing here is retained between
//! calls: a turn is a plain value owned by the request that carries it.

use serde::{Deserialize, Serialize};

/// Who produced a turn of operator conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The human operator.
    #[serde(alias = "user")]
    Operator,
    /// The agent's earlier replies.
    #[serde(alias = "assistant", alias = "agent")]
    System,
}

impl TurnRole {
    /// Upper-case tag used when the turn is rendered into a prompt.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Operator => "OPERATOR",
            Self::System => "SYSTEM",
        }
    }
}

/// One prior exchange in the operator conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    #[serde(alias = "content")]
    pub text: String,
}

impl ConversationTurn {
    pub fn operator(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Operator,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            text: text.into(),
        }
    }
}

/// The role of a message sent to the reasoning capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_accepts_chat_style_roles() {
        let turns: Vec<ConversationTurn> = serde_json::from_str(
            r#"[
                {"role": "user", "content": "create a ticket"},
                {"role": "assistant", "content": "Incident or Change Request?"},
                {"role": "operator", "text": "incident"}
            ]"#,
        )
        .unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, TurnRole::Operator);
        assert_eq!(turns[1].role, TurnRole::System);
        assert_eq!(turns[2], ConversationTurn::operator("incident"));
    }

    #[test]
    fn turn_serializes_canonical_names() {
        let json = serde_json::to_string(&ConversationTurn::system("done")).unwrap();
        assert_eq!(json, r#"{"role":"system","text":"done"}"#);
    }

    #[test]
    fn unknown_role_rejected() {
        let parsed: Result<ConversationTurn, _> =
            serde_json::from_str(r#"{"role": "tool", "text": "x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn message_constructors() {
        assert_eq!(Message::system("s").role, Role::System);
        assert_eq!(Message::user("u").role.as_str(), "user");
        assert_eq!(Message::assistant("a").content, "a");
    }
}
