//! Error-log analysis replies.
//!
//! The provider is asked for three labelled sections. Labels are matched
//! case-insensitively at the start of a line, ignoring Markdown decoration
//! (`**Root Cause:**`, `### Meaning`, `2. Suggested Fix:`).

use recordpilot_core::error::ProtocolError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorAnalysis {
    pub meaning: String,
    pub root_cause: String,
    pub suggested_fix: String,
}

const MEANING: &str = "Meaning";
const ROOT_CAUSE: &str = "Root Cause";
const SUGGESTED_FIX: &str = "Suggested Fix";
const LABELS: [&str; 3] = [MEANING, ROOT_CAUSE, SUGGESTED_FIX];

/// If `line` opens one of the `labels` sections, return its label and the
/// text after it.
pub(crate) fn section_start<'a>(
    line: &'a str,
    labels: &[&'static str],
) -> Option<(&'static str, &'a str)> {
    let stripped = line.trim_start_matches(|c: char| {
        c.is_whitespace() || c.is_ascii_digit() || matches!(c, '#' | '*' | '-' | '.' | ')' | '_')
    });

    labels.iter().find_map(|label| {
        let head = stripped.get(..label.len())?;
        if !head.eq_ignore_ascii_case(label) {
            return None;
        }
        let rest = stripped[label.len()..].trim_start_matches(['*', '_']);
        let rest = match rest.strip_prefix(':') {
            Some(after) => after,
            None if rest.trim().is_empty() => rest,
            None => return None,
        };
        Some((*label, rest.trim_start_matches(['*', '_']).trim()))
    })
}

impl ErrorAnalysis {
    pub fn parse(reply: &str) -> Result<Self, ProtocolError> {
        let mut sections: Vec<(&'static str, Vec<&str>)> = Vec::new();
        for line in reply.lines() {
            match section_start(line, &LABELS) {
                Some((label, rest)) => sections.push((label, vec![rest])),
                None => {
                    if let Some((_, body)) = sections.last_mut() {
                        body.push(line.trim());
                    }
                }
            }
        }

        let take = |label: &'static str| -> Result<String, ProtocolError> {
            sections
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, body)| body.join("\n").trim().to_string())
                .filter(|text| !text.is_empty())
                .ok_or(ProtocolError::MissingSection(label))
        };

        Ok(Self {
            meaning: take(MEANING)?,
            root_cause: take(ROOT_CAUSE)?,
            suggested_fix: take(SUGGESTED_FIX)?,
        })
    }

    /// Fixed-order rendering.
    pub fn render(&self) -> String {
        format!(
            "{MEANING}: {}\n\n{ROOT_CAUSE}: {}\n\n{SUGGESTED_FIX}: {}",
            self.meaning, self.root_cause, self.suggested_fix
        )
    }
}
