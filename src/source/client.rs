//! Blocking HTTP client carrying the captured session cookie and browser-like headers.

use crate::source::error::SourceError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Mobile Safari/537.36";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";
const MAX_REDIRECTS: usize = 10;

/// Blocking JSON client for the content API.
#[derive(Debug)]
pub struct ApiClient {
    inner: reqwest::blocking::Client,
}

impl ApiClient {
    /// Build a client with default User-Agent and timeout and no cookie.
    pub fn new() -> Result<Self, SourceError> {
        Self::builder().build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// GET `url` with `query` and parse the body as JSON.
    ///
    /// Connection errors and non-success statuses are returned as errors; there are no retries.
    pub fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        context: Option<&str>,
    ) -> Result<Value, SourceError> {
        let response = self
            .inner
            .get(url)
            .query(query)
            .send()
            .map_err(|e| SourceError::Network {
                url: url.to_string(),
                source: e,
            })?;
        let body = check_response(response, url, context)?;
        serde_json::from_str(&body).map_err(|e| SourceError::InvalidJson {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Check response status and read the body as text.
fn check_response(
    response: reqwest::blocking::Response,
    url: &str,
    context: Option<&str>,
) -> Result<String, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
            context: context.map(String::from),
        });
    }
    response
        .text()
        .map_err(|e| SourceError::BodyRead { source: e })
}

/// Builder for ApiClient. Credentials are passed in here, never read from globals.
#[derive(Debug)]
pub struct ApiClientBuilder {
    user_agent: Option<String>,
    timeout_secs: u64,
    cookie: Option<String>,
    headers: Vec<(String, String)>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cookie: None,
            headers: Vec::new(),
        }
    }
}

impl ApiClientBuilder {
    /// Set a custom User-Agent. If not set, a mobile Chrome string is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set connect/read timeout in seconds. Default 30.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Session cookie captured from a browser. Sent verbatim as the `cookie` header.
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Add an extra header sent on every request. Later values replace earlier ones.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn default_headers(&self) -> Result<HeaderMap, SourceError> {
        let mut map = HeaderMap::new();
        map.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| {
                SourceError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| SourceError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            map.insert(header_name, header_value);
        }
        if let Some(ref cookie) = self.cookie {
            let value = HeaderValue::from_str(cookie).map_err(|e| SourceError::InvalidHeader {
                name: "cookie".to_string(),
                reason: e.to_string(),
            })?;
            map.insert(COOKIE, value);
        }
        Ok(map)
    }

    /// A configured cookie header suppresses reqwest's jar, so the jar is only kept without one.
    fn uses_cookie_store(&self) -> bool {
        self.cookie.is_none()
    }

    pub fn build(self) -> Result<ApiClient, SourceError> {
        let headers = self.default_headers()?;
        let cookie_store = self.uses_cookie_store();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .cookie_store(cookie_store)
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| SourceError::ClientBuild { source: e })?;
        Ok(ApiClient { inner })
    }
}
