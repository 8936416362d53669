//! Record tools for RecordPilot.
//!
//! The planner emits a [`ToolInvocation`]: a tool name plus a raw,
//! `|`-separated argument string. [`RecordTool::parse`] turns that into a
//! typed request before any store is touched, so a malformed argument never
//! results in a partial remote call. [`RecordTool::run`] then performs
//! exactly one store operation and returns an [`Outcome`] whose rendering is
//! the observation text shown to the operator.

pub mod create;
pub mod grammar;
pub mod query;
pub mod update;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use create::CreateArgs;
pub use query::{QUERY_LIMIT, QueryArgs};
pub use update::UpdateArgs;

use recordpilot_core::error::ToolError;
use recordpilot_core::platform::{CreatedRecord, Record, RecordStore, UpdatedRecord};
use recordpilot_core::tool::{ToolInvocation, ToolKind};
use std::fmt;

/// Observation text for an empty query result.
pub const NO_RECORDS: &str = "No records found.";

/// A parsed, ready-to-run tool request.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordTool {
    Query(QueryArgs),
    Create(CreateArgs),
    Update(UpdateArgs),
}

impl RecordTool {
    /// Parse the raw argument per the invoked tool's grammar.
    pub fn parse(invocation: &ToolInvocation) -> Result<Self, ToolError> {
        let raw = invocation.raw_argument.as_str();
        Ok(match invocation.kind {
            ToolKind::Query => Self::Query(QueryArgs::parse(raw)?),
            ToolKind::Create => Self::Create(CreateArgs::parse(raw)?),
            ToolKind::Update => Self::Update(UpdateArgs::parse(raw)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Query(_) => ToolKind::Query,
            Self::Create(_) => ToolKind::Create,
            Self::Update(_) => ToolKind::Update,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Self::Query(args) => &args.table,
            Self::Create(args) => &args.table,
            Self::Update(args) => &args.table,
        }
    }

    /// Perform the single store operation this request stands for.
    pub async fn run(&self, store: &dyn RecordStore) -> Result<Outcome, ToolError> {
        match self {
            Self::Query(args) => args.run(store).await,
            Self::Create(args) => args.run(store).await,
            Self::Update(args) => args.run(store).await,
        }
    }
}

/// Parse then run. Nothing reaches the store if parsing fails.
pub async fn dispatch(
    invocation: &ToolInvocation,
    store: &dyn RecordStore,
) -> Result<Outcome, ToolError> {
    let tool = RecordTool::parse(invocation)?;
    tool.run(store).await
}

/// Successful result of one tool run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Records(Vec<Record>),
    NotFound,
    Created(CreatedRecord),
    Updated(UpdatedRecord),
}

impl Outcome {
    /// Deterministic observation text.
    pub fn render(&self) -> String {
        match self {
            Self::Records(records) => {
                let array = serde_json::Value::Array(
                    records.iter().cloned().map(serde_json::Value::Object).collect(),
                );
                format!("{array:#}")
            }
            Self::NotFound => NO_RECORDS.to_string(),
            Self::Created(created) => match &created.number {
                Some(number) => format!(
                    "Success! Record created. sys_id: {}\nNumber: {number}",
                    created.sys_id
                ),
                None => format!("Success! Record created. sys_id: {}", created.sys_id),
            },
            Self::Updated(updated) => {
                format!("Success! Record updated. sys_id: {}", updated.sys_id)
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
