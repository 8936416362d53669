//! Interview practice on a platform topic.
//!
//! Asking researches the topic in the knowledge base and makes one reasoning
//! call for a single question. Grading makes one call and expects a verdict
//! and feedback. The caller carries the question between the two steps; the
//! interviewer keeps no session.

use recordpilot_config::AppConfig;
use recordpilot_core::error::{Error, ProtocolError};
use recordpilot_core::platform::RecordStore;
use recordpilot_core::provider::Provider;
use recordpilot_platform::knowledge::{self, ARTICLE_LIMIT};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analysis::section_start;
use crate::planner::Reasoner;
use crate::prompt;

const QUESTION: &str = "Question";
const GRADE: &str = "Grade";
const FEEDBACK: &str = "Feedback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    fn from_label(text: &str) -> Option<Self> {
        let word = text
            .split_whitespace()
            .next()?
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_ascii_lowercase();
        match word.as_str() {
            "pass" | "passed" => Some(Self::Pass),
            "fail" | "failed" => Some(Self::Fail),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub verdict: Verdict,
    pub feedback: String,
}

impl Grade {
    /// Reads `Grade: PASS|FAIL` and `Feedback: ...` sections.
    ///
    /// Without a `Feedback:` label, the text around the grade line is taken
    /// as the feedback.
    pub fn parse(reply: &str) -> Result<Self, ProtocolError> {
        let mut verdict: Option<&str> = None;
        let mut feedback: Vec<&str> = Vec::new();
        let mut loose: Vec<&str> = Vec::new();
        let mut in_feedback = false;

        for line in reply.lines() {
            match section_start(line, &[GRADE, FEEDBACK]) {
                Some((GRADE, rest)) if verdict.is_none() => {
                    verdict = Some(rest);
                    in_feedback = false;
                }
                Some((FEEDBACK, rest)) => {
                    feedback.push(rest);
                    in_feedback = true;
                }
                _ if in_feedback => feedback.push(line.trim()),
                _ => loose.push(line.trim()),
            }
        }

        let label = verdict.ok_or(ProtocolError::MissingSection(GRADE))?;
        let verdict = Verdict::from_label(label)
            .ok_or_else(|| ProtocolError::Unparseable(format!("{GRADE}: {label}")))?;

        let feedback = match feedback.join("\n").trim() {
            "" => loose.join("\n").trim().to_string(),
            text => text.to_string(),
        };
        if feedback.is_empty() {
            return Err(ProtocolError::MissingSection(FEEDBACK));
        }

        Ok(Self { verdict, feedback })
    }

    pub fn render(&self) -> String {
        format!("{GRADE}: {}\n\n{FEEDBACK}: {}", self.verdict, self.feedback)
    }
}

/// The question text without a leading `Question:` label.
fn clean_question(reply: &str) -> Result<String, ProtocolError> {
    let reply = reply.trim();
    let (first, rest) = reply.split_once('\n').unwrap_or((reply, ""));
    let first = match section_start(first, &[QUESTION]) {
        Some((_, after)) => after,
        None => first,
    };

    let question = format!("{first}\n{rest}").trim().to_string();
    if question.is_empty() {
        return Err(ProtocolError::Empty("question"));
    }
    Ok(question)
}

#[derive(Debug, Clone)]
pub struct Interviewer {
    reasoner: Reasoner,
}

impl Interviewer {
    pub fn new(reasoner: Reasoner) -> Self {
        Self { reasoner }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(Reasoner::from_config(provider, config))
    }

    /// One question about `topic`, grounded in published knowledge articles.
    ///
    /// A failed knowledge search is logged and the question is asked without
    /// articles.
    pub async fn ask_question(&self, store: &dyn RecordStore, topic: &str) -> Result<String, Error> {
        let articles = match knowledge::search_articles(store, topic, ARTICLE_LIMIT).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(instance = store.instance(), topic, error = %e, "Knowledge search failed");
                Vec::new()
            }
        };
        info!(instance = store.instance(), topic, articles = articles.len(), "Asking interview question");

        let reply = self
            .reasoner
            .ask(
                prompt::interviewer_system_prompt(),
                prompt::question_request(topic, &knowledge::render_articles(&articles)),
            )
            .await?;
        Ok(clean_question(&reply)?)
    }

    pub async fn grade_answer(&self, topic: &str, question: &str, answer: &str) -> Result<Grade, Error> {
        info!(topic, "Grading interview answer");
        let reply = self
            .reasoner
            .ask(
                prompt::interviewer_system_prompt(),
                prompt::grading_request(topic, question, answer),
            )
            .await?;
        Ok(Grade::parse(&reply)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{CountingStore, ScriptedProvider, StoreCall};
    use recordpilot_core::error::PlatformError;
    use serde_json::json;

    fn interviewer(provider: Arc<ScriptedProvider>) -> Interviewer {
        Interviewer::new(Reasoner::new(provider, "mock-model"))
    }

    #[tokio::test]
    async fn question_grounded_in_published_articles() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "**Question:** A before-update rule sets a field but the change never saves. Why?",
        ]));
        let store = CountingStore::default().with_records(vec![json!({
            "number": "KB0000042",
            "short_description": "Business rules order of execution",
            "text": "Before rules run prior to the database write."
        })]);

        let question = interviewer(provider.clone())
            .ask_question(&store, "Business rules")
            .await
            .unwrap();

        assert_eq!(
            question,
            "A before-update rule sets a field but the change never saves. Why?"
        );
        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        let StoreCall::List(table, query) = &calls[0] else {
            panic!("expected a list call, got {calls:?}");
        };
        assert_eq!(table, "kb_knowledge");
        assert_eq!(
            query.filter,
            "short_descriptionLIKEBusiness rules^workflow_state=published"
        );
        assert_eq!(query.limit, 3);
        assert_eq!(query.fields, vec!["short_description", "text", "number"]);

        let request = provider.last_request().unwrap();
        assert!(request.messages[0].content.contains("strict technical interviewer"));
        assert!(request.messages[1].content.contains("Article KB0000042: Business rules order of execution"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_search_still_asks() {
        let provider = Arc::new(ScriptedProvider::new(vec!["What does an ACL protect?"]));
        let store = CountingStore::default().failing(PlatformError::Status {
            status: 403,
            body: "ACL".into(),
        });

        let question = interviewer(provider.clone())
            .ask_question(&store, "ACLs")
            .await
            .unwrap();

        assert_eq!(question, "What does an ACL protect?");
        let request = provider.last_request().unwrap();
        assert!(request.messages[1].content.contains("No articles found."));
    }

    #[tokio::test]
    async fn empty_question_is_a_protocol_error() {
        let provider = Arc::new(ScriptedProvider::new(vec!["  Question:  \n"]));
        let err = interviewer(provider)
            .ask_question(&CountingStore::default(), "ACLs")
            .await
            .unwrap_err();
        assert_eq!(err.category(), "PlannerProtocolError");
        assert!(err.to_string().contains("empty question"));
    }

    #[tokio::test]
    async fn answer_graded_with_one_call() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "Grade: PASS\nFeedback: Correct, before rules run ahead of the write.\nMention current.update() pitfalls.",
        ]));

        let grade = interviewer(provider.clone())
            .grade_answer("Business rules", "Why does the change not save?", "It is an after rule")
            .await
            .unwrap();

        assert_eq!(grade.verdict, Verdict::Pass);
        assert_eq!(
            grade.feedback,
            "Correct, before rules run ahead of the write.\nMention current.update() pitfalls."
        );
        assert_eq!(provider.call_count(), 1);
        let request = provider.last_request().unwrap();
        assert!(request.messages[1].content.contains("Candidate Answer: It is an after rule"));
    }

    #[test]
    fn markdown_grade_without_feedback_label() {
        let grade = Grade::parse("**Grade:** Failed.\n\nThe answer confuses client and server scripts.")
            .unwrap();
        assert_eq!(grade.verdict, Verdict::Fail);
        assert_eq!(grade.feedback, "The answer confuses client and server scripts.");
        assert_eq!(
            grade.render(),
            "Grade: FAIL\n\nFeedback: The answer confuses client and server scripts."
        );
    }

    #[test]
    fn grade_sections_required() {
        assert_eq!(
            Grade::parse("Feedback: Good answer."),
            Err(ProtocolError::MissingSection("Grade"))
        );
        assert_eq!(
            Grade::parse("Grade: PASS"),
            Err(ProtocolError::MissingSection("Feedback"))
        );
        assert!(matches!(
            Grade::parse("Grade: Maybe\nFeedback: Partly right."),
            Err(ProtocolError::Unparseable(_))
        ));
    }
}
