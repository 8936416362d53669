//! `update_record`: patch fields of an existing record.

use recordpilot_core::error::ToolError;
use recordpilot_core::platform::{Record, RecordStore};
use recordpilot_core::tool::ToolKind;
use tracing::info;

use crate::Outcome;
use crate::grammar::{parse_payload, require_table, split_segments, validation_error};

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateArgs {
    pub table: String,
    pub sys_id: String,
    pub payload: Record,
}

impl UpdateArgs {
    /// `table_name|sys_id|json_data`
    ///
    /// A fourth segment ends up inside the JSON part and fails to decode.
    pub fn parse(raw: &str) -> Result<Self, ToolError> {
        let parts = split_segments(ToolKind::Update, raw, 3)?;
        let table = require_table(ToolKind::Update, parts[0])?;
        let payload = parse_payload(ToolKind::Update, parts[2])?;
        if parts[1].is_empty() {
            return Err(validation_error(ToolKind::Update, "sys_id is empty"));
        }
        Ok(Self {
            table,
            sys_id: parts[1].to_string(),
            payload,
        })
    }

    pub async fn run(&self, store: &dyn RecordStore) -> Result<Outcome, ToolError> {
        let updated = store.update(&self.table, &self.sys_id, &self.payload).await?;
        info!(table = %self.table, sys_id = %updated.sys_id, "Record updated");
        Ok(Outcome::Updated(updated))
    }
}
