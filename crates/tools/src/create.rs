//! `create_record`: insert a new record.

use recordpilot_core::error::ToolError;
use recordpilot_core::platform::{Record, RecordStore};
use recordpilot_core::tool::ToolKind;
use tracing::info;

use crate::Outcome;
use crate::grammar::{parse_payload, require_table, split_segments};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateArgs {
    pub table: String,
    pub payload: Record,
}

impl CreateArgs {
    /// `table_name|json_data`
    pub fn parse(raw: &str) -> Result<Self, ToolError> {
        let parts = split_segments(ToolKind::Create, raw, 2)?;
        let table = require_table(ToolKind::Create, parts[0])?;
        let payload = parse_payload(ToolKind::Create, parts[1])?;
        Ok(Self { table, payload })
    }

    /// Sent once; a failed create is never retried.
    pub async fn run(&self, store: &dyn RecordStore) -> Result<Outcome, ToolError> {
        let created = store.create(&self.table, &self.payload).await?;
        info!(
            table = %self.table,
            sys_id = %created.sys_id,
            number = created.number.as_deref().unwrap_or(""),
            "Record created"
        );
        Ok(Outcome::Created(created))
    }
}
