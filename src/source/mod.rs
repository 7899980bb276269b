//! Remote code library access: job context, the `CodeSource` seam, the HTTP client, and the Municode adapter.

mod client;
mod error;

pub mod municode;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::SourceError;

use crate::clean::clean;
use serde_json::Value;

/// Identifies one published code: which print job and product to read, and where its pages live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobContext {
    pub job_id: String,
    pub product_id: String,
    /// Browse page for the code; node links are `{browse_url}?nodeId={id}`.
    pub browse_url: String,
}

impl JobContext {
    /// Browse URL for a tree node.
    pub fn node_url(&self, node_id: &str) -> String {
        format!("{}?nodeId={}", self.browse_url, node_id)
    }
}

/// Source of the tree-of-record and per-leaf content.
///
/// Implemented over HTTP by [municode::MunicodeSource]; tests substitute an in-memory fake.
pub trait CodeSource {
    /// Job whose tree and content this source serves.
    fn job(&self) -> &JobContext;

    /// Full table-of-contents tree. The root object carries `Children`.
    fn fetch_toc(&mut self) -> Result<Value, SourceError>;

    /// Raw JSON returned by the content endpoint for one leaf.
    fn fetch_content(&mut self, doc_id: &str) -> Result<Value, SourceError>;
}

/// Pull raw markup out of a content response: first record's `content`, else `Content`, else empty.
pub fn extract_content(response: &Value) -> &str {
    let first = match response.as_array().and_then(|records| records.first()) {
        Some(first) => first,
        None => {
            log::warn!("Content response is not a non-empty array; treating as empty");
            return "";
        }
    };
    let content = ["content", "Content"]
        .iter()
        .filter_map(|key| first.get(*key).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty());
    match content {
        Some(html) => html,
        None => {
            log::warn!("Content record has no content field; treating as empty");
            ""
        }
    }
}

/// Fetch one leaf's markup and return it as clean text.
pub fn fetch_leaf_text(source: &mut dyn CodeSource, leaf_id: &str) -> Result<String, SourceError> {
    let response = source.fetch_content(leaf_id)?;
    Ok(clean(extract_content(&response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct OneShot {
        job: JobContext,
        response: Value,
        requested: Vec<String>,
    }

    impl CodeSource for OneShot {
        fn job(&self) -> &JobContext {
            &self.job
        }

        fn fetch_toc(&mut self) -> Result<Value, SourceError> {
            Ok(json!({ "Children": [] }))
        }

        fn fetch_content(&mut self, doc_id: &str) -> Result<Value, SourceError> {
            self.requested.push(doc_id.to_string());
            Ok(self.response.clone())
        }
    }

    fn job() -> JobContext {
        JobContext {
            job_id: "430600".to_string(),
            product_id: "13058".to_string(),
            browse_url: "https://library.example.com/codes/code_of_ordinances".to_string(),
        }
    }

    #[test]
    fn node_url_appends_node_id() {
        assert_eq!(
            job().node_url("CH1"),
            "https://library.example.com/codes/code_of_ordinances?nodeId=CH1"
        );
    }

    #[test]
    fn extract_content_prefers_lowercase_key() {
        let v = json!([{ "content": "<p>a</p>", "Content": "<p>b</p>" }]);
        assert_eq!(extract_content(&v), "<p>a</p>");
    }

    #[test]
    fn extract_content_falls_back_to_capitalized_key() {
        let v = json!([{ "Content": "<p>b</p>" }]);
        assert_eq!(extract_content(&v), "<p>b</p>");
        let v = json!([{ "content": "", "Content": "<p>b</p>" }]);
        assert_eq!(extract_content(&v), "<p>b</p>");
    }

    #[test]
    fn extract_content_only_reads_first_record() {
        let v = json!([{ "Title": "no content" }, { "content": "<p>second</p>" }]);
        assert_eq!(extract_content(&v), "");
    }

    #[test]
    fn extract_content_unexpected_shapes_are_empty() {
        assert_eq!(extract_content(&json!([])), "");
        assert_eq!(extract_content(&json!({ "content": "<p>x</p>" })), "");
        assert_eq!(extract_content(&json!("text")), "");
        assert_eq!(extract_content(&Value::Null), "");
        assert_eq!(extract_content(&json!([{ "content": 42 }])), "");
        assert_eq!(extract_content(&json!([null])), "");
    }

    #[test]
    fn fetch_leaf_text_cleans_markup() -> Result<(), SourceError> {
        let mut source = OneShot {
            job: job(),
            response: json!([{ "content": "<p>Hello <a href=\"http://x\">world</a></p>" }]),
            requested: Vec::new(),
        };
        let text = fetch_leaf_text(&mut source, "S1")?;
        assert_eq!(text, "Hello world (http://x)");
        assert_eq!(source.requested, vec!["S1".to_string()]);
        Ok(())
    }
}
