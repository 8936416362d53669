//! Tool descriptors: the three record operations offered to the planner.
//!
//! The set is closed: a query, a create, and an update. Each has a fixed
//! textual invocation grammar built from `|`-separated segments, which is
//! what the planner must emit and what the dispatch layer parses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment separator of every invocation grammar.
pub const SEPARATOR: char = '|';

/// Which record operation a tool performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Query,
    Create,
    Update,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Query, ToolKind::Create, ToolKind::Update];

    /// The static descriptor of this tool.
    pub fn descriptor(self) -> &'static ToolDescriptor {
        match self {
            Self::Query => &DESCRIPTORS[0],
            Self::Create => &DESCRIPTORS[1],
            Self::Update => &DESCRIPTORS[2],
        }
    }

    /// The name the planner uses to select this tool.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Look a tool up by the name the planner used (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of a tool, rendered into the planner prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub name: &'static str,
    pub description: &'static str,
    /// The invocation grammar, e.g. `table_name|query_string`.
    pub grammar: &'static str,
    pub example: &'static str,
}

/// Descriptors of all tools, in prompt order.
pub static DESCRIPTORS: [ToolDescriptor; 3] = [
    ToolDescriptor {
        kind: ToolKind::Query,
        name: "table_query",
        description: "Queries any table. Useful for finding records (users, incidents, scripts, etc).",
        grammar: "table_name|query_string",
        example: "sys_user|active=true^nameLIKEAlice",
    },
    ToolDescriptor {
        kind: ToolKind::Create,
        name: "create_record",
        description: "Creates a new record in any table.",
        grammar: "table_name|json_data",
        example: r#"incident|{"short_description": "Server outage", "urgency": "1"}"#,
    },
    ToolDescriptor {
        kind: ToolKind::Update,
        name: "update_record",
        description: "Updates an existing record identified by its sys_id.",
        grammar: "table_name|sys_id|json_data",
        example: r#"incident|abc12345|{"state": "2"}"#,
    },
];

/// The planner's chosen action: a tool and its raw, still-unparsed argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub kind: ToolKind,
    pub raw_argument: String,
}

impl ToolInvocation {
    pub fn new(kind: ToolKind, raw_argument: impl Into<String>) -> Self {
        Self {
            kind,
            raw_argument: raw_argument.into(),
        }
    }
}
