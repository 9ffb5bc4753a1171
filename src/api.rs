//! HTTP client for the text-aid API
//!
//! Three operations against a fixed base URL: grammar check, translation,
//! polishing. One POST per call, typed decode, no retries.

use std::time::Duration;

use reqwest::header;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Base URL the local API server listens on unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// One detected grammar problem. `start`/`end` are character offsets into
/// the submitted text, with whatever range semantics the server uses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GrammarIssue {
    pub start: usize,
    pub end: usize,
    pub message: String,
    #[serde(default)]
    pub replacements: Vec<String>,
}

/// Grammar check outcome. An empty `issues` list means "no problems found"
/// and is not an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GrammarCheckResult {
    pub original: String,
    #[serde(default)]
    pub issues: Vec<GrammarIssue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranslateResult {
    pub translated: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolishResult {
    pub polished: String,
}

#[derive(Serialize)]
struct GrammarRequest<'a> {
    text: &'a str,
    language: &'a str,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Serialize)]
struct PolishRequest<'a> {
    text: &'a str,
}

/// Client for the three text-aid endpoints.
///
/// Holds one pooled `reqwest::Client`; cloning shares the pool. Operations
/// are stateless with respect to each other.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    target_lang: String,
}

impl ApiClient {
    pub fn new(base_url: &str, target_lang: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(classify)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            target_lang: target_lang.to_string(),
        })
    }

    /// Check `text` for grammar problems.
    ///
    /// The input is trimmed before sending; blank input fails with
    /// `Error::Validation` without touching the network.
    pub async fn check_grammar(&self, text: &str) -> Result<GrammarCheckResult> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("no input provided"));
        }

        let body = GrammarRequest { text, language: "auto" };
        self.post_json("grammar-check", &body).await
    }

    /// Translate `text` into the configured target language.
    ///
    /// Unlike `check_grammar` this sends the text untouched, empty string
    /// included; the server decides what to do with it.
    pub async fn translate(&self, text: &str) -> Result<TranslateResult> {
        let body = TranslateRequest {
            text,
            source_lang: "auto",
            target_lang: &self.target_lang,
        };
        self.post_json("translate", &body).await
    }

    /// Rewrite `text` into a stylistically improved version.
    pub async fn polish(&self, text: &str) -> Result<PolishResult> {
        let body = PolishRequest { text };
        self.post_json("polish", &body).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} failed: {} - {}", endpoint, status, body);
            return Err(Error::Server {
                status: status.as_u16(),
                body,
            });
        }

        // Decode from raw bytes so transport errors and schema errors
        // classify separately.
        let bytes = response.bytes().await.map_err(classify)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}

fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err)
    } else {
        Error::Network(err)
    }
}
