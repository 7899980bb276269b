//! Municode adapter. Reads the full TOC tree once, then one content document per leaf.
//!
//! The API sits behind browser session checks; the cookie and headers come from config and go stale.

use crate::source::{ApiClient, CodeSource, JobContext, SourceError};
use serde_json::Value;

const TOC_PATH: &str = "/api/codesToc/fullTree";
const CONTENT_PATH: &str = "/api/CodesContent/docIds";

/// HTTP-backed [CodeSource] for one Municode code product.
pub struct MunicodeSource<'a> {
    client: &'a ApiClient,
    base_url: String,
    job: JobContext,
}

impl<'a> MunicodeSource<'a> {
    pub fn new(client: &'a ApiClient, base_url: &str, job: JobContext) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            job,
        }
    }

    fn toc_url(&self) -> String {
        format!("{}{}", self.base_url, TOC_PATH)
    }

    fn content_url(&self) -> String {
        format!("{}{}", self.base_url, CONTENT_PATH)
    }
}

/// Query for the full tree: the product id doubles as the root node id.
fn toc_query(job: &JobContext) -> [(&'static str, &str); 3] {
    [
        ("jobId", job.job_id.as_str()),
        ("nodeId", job.product_id.as_str()),
        ("productId", job.product_id.as_str()),
    ]
}

/// Query for one leaf document as HTML without change-tracking markup.
fn content_query<'q>(job: &'q JobContext, doc_id: &'q str) -> [(&'static str, &'q str); 5] {
    [
        ("docIds", doc_id),
        ("jobId", job.job_id.as_str()),
        ("productId", job.product_id.as_str()),
        ("outputType", "html"),
        ("showChanges", "false"),
    ]
}

impl CodeSource for MunicodeSource<'_> {
    fn job(&self) -> &JobContext {
        &self.job
    }

    fn fetch_toc(&mut self) -> Result<Value, SourceError> {
        let url = self.toc_url();
        log::debug!("Fetching table of contents from {}", url);
        self.client
            .get_json(&url, &toc_query(&self.job), Some("table of contents"))
    }

    fn fetch_content(&mut self, doc_id: &str) -> Result<Value, SourceError> {
        let url = self.content_url();
        let context = format!("section {}", doc_id);
        self.client
            .get_json(&url, &content_query(&self.job, doc_id), Some(&context))
    }
}
