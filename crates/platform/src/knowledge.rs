//! Knowledge base search used to ground interview questions.
//!
//! Only published articles whose short description matches the topic are
//! considered. Article bodies are cut to an excerpt before they reach a
//! prompt.

use recordpilot_core::error::PlatformError;
use recordpilot_core::filter::Filter;
use recordpilot_core::platform::{ListQuery, Record, RecordStore};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub const KNOWLEDGE_TABLE: &str = "kb_knowledge";

/// Articles fetched per topic.
pub const ARTICLE_LIMIT: u32 = 3;

const EXCERPT_CHARS: usize = 800;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeArticle {
    pub number: String,
    pub short_description: String,
    pub text: String,
}

impl KnowledgeArticle {
    fn from_record(record: &Record) -> Self {
        Self {
            number: text_field(record, "number"),
            short_description: text_field(record, "short_description"),
            text: text_field(record, "text"),
        }
    }

    /// `Article <number>: <short description>` followed by a body excerpt.
    pub fn render(&self) -> String {
        let excerpt: String = self.text.chars().take(EXCERPT_CHARS).collect();
        format!(
            "Article {}: {}\nContent: {excerpt}...",
            self.number, self.short_description
        )
    }
}

fn text_field(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Published articles whose short description contains `topic`.
///
/// `^` is the store's predicate separator, so it is removed from the topic.
pub fn article_filter(topic: &str) -> String {
    let topic = topic.replace('^', " ");
    Filter::new()
        .like("short_description", topic.trim())
        .equals("workflow_state", "published")
        .build()
}

pub async fn search_articles(
    store: &dyn RecordStore,
    topic: &str,
    limit: u32,
) -> Result<Vec<KnowledgeArticle>, PlatformError> {
    let query = ListQuery::new(article_filter(topic), limit)
        .with_fields(&["short_description", "text", "number"]);
    let records = store.list(KNOWLEDGE_TABLE, &query).await?;
    debug!(instance = store.instance(), topic, found = records.len(), "knowledge search");
    Ok(records.iter().map(KnowledgeArticle::from_record).collect())
}

/// Articles separated by blank lines, or `No articles found.`
pub fn render_articles(articles: &[KnowledgeArticle]) -> String {
    if articles.is_empty() {
        return "No articles found.".to_string();
    }
    articles
        .iter()
        .map(KnowledgeArticle::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Credentials, PlatformClient};
    use crate::retry::RetryPolicy;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store(server: &MockServer) -> crate::client::InstanceHandle {
        PlatformClient::new(
            Credentials::new("admin", "secret"),
            Duration::from_secs(5),
            RetryPolicy::none(),
        )
        .unwrap()
        .instance(&server.uri())
        .unwrap()
    }

    #[test]
    fn filter_matches_published_articles() {
        assert_eq!(
            article_filter(" Business Rules "),
            "short_descriptionLIKEBusiness Rules^workflow_state=published"
        );
        assert_eq!(
            article_filter("acl^active=false"),
            "short_descriptionLIKEacl active=false^workflow_state=published"
        );
    }

    #[tokio::test]
    async fn search_sends_filter_fields_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/now/table/kb_knowledge"))
            .and(query_param(
                "sysparm_query",
                "short_descriptionLIKEGlide Record^workflow_state=published",
            ))
            .and(query_param("sysparm_limit", "3"))
            .and(query_param("sysparm_fields", "short_description,text,number"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [
                    {"number": "KB0000011", "short_description": "Glide Record basics", "text": "<p>Use GlideRecord to query tables.</p>"},
                    {"number": "KB0000012", "short_description": "Glide Record performance", "text": null}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = store(&server).await;
        let articles = search_articles(&store, "Glide Record", ARTICLE_LIMIT)
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].number, "KB0000011");
        assert_eq!(articles[0].text, "<p>Use GlideRecord to query tables.</p>");
        assert_eq!(articles[1].text, "");
    }

    #[tokio::test]
    async fn search_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/now/table/kb_knowledge"))
            .respond_with(ResponseTemplate::new(403).set_body_string("ACL"))
            .mount(&server)
            .await;

        let store = store(&server).await;
        let err = search_articles(&store, "acl", ARTICLE_LIMIT).await.unwrap_err();
        assert_eq!(err.to_string(), "403 - ACL");
    }

    #[test]
    fn rendering_cuts_long_bodies() {
        let article = KnowledgeArticle {
            number: "KB0000011".into(),
            short_description: "Glide Record basics".into(),
            text: "é".repeat(1000),
        };
        let rendered = article.render();
        assert!(rendered.starts_with("Article KB0000011: Glide Record basics\nContent: "));
        assert!(rendered.ends_with("..."));
        assert_eq!(rendered.matches('é').count(), 800);

        assert_eq!(render_articles(&[]), "No articles found.");
        let two = render_articles(&[article.clone(), article]);
        assert_eq!(two.matches("Article KB0000011").count(), 2);
        assert!(two.contains("...\n\nArticle"));
    }
}
