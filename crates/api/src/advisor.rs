#![forbid(unsafe_code)]

//! Optional external ranking advisor. The advisor only ever reorders the
//! locally computed candidate list; any failure along the way (not
//! configured, transport error, malformed reply, order that drops or
//! invents ids) falls back to the local ranking without surfacing an error.

use crate::config::AdvisorConfig;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::time::Duration;

/// What the advisor sees for one gapped shift.
#[derive(Debug, Serialize)]
pub struct RerankRequest {
    pub shift_role: String,
    /// RFC 3339 instants.
    pub shift_start: String,
    pub shift_end: String,
    /// Local ranking, best first.
    pub candidates: Vec<String>,
    /// Existing assignment counts per candidate for the same schedule.
    pub assignment_counts: BTreeMap<String, u32>,
}

pub trait RankAdvisor {
    /// A proposed reordering of `request.candidates`, or `None` to keep the
    /// local order. The caller validates the proposal; implementations do
    /// not have to.
    fn rerank(&self, request: &RerankRequest) -> Option<Vec<String>>;
}

/// The always-local fallback used when no advisor is configured.
pub struct NoAdvisor;

impl RankAdvisor for NoAdvisor {
    fn rerank(&self, _request: &RerankRequest) -> Option<Vec<String>> {
        None
    }
}

const INSTRUCTION: &str = "You rank shift-work candidates. Given a shift and a candidate list, \
reply with ONLY a JSON array of the candidate ids, best first. Use every id exactly once and \
add nothing else.";

/// OpenAI-compatible chat-completion client.
pub struct HttpAdvisor {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpAdvisor {
    pub fn from_config(config: &AdvisorConfig) -> Option<Self> {
        let client = match reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(error = %err, "advisor client init failed, staying local");
                return None;
            }
        };
        Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn request_payload(&self, request: &RerankRequest) -> Option<Value> {
        let body = serde_json::to_string(request).ok()?;
        Some(json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": INSTRUCTION },
                { "role": "user", "content": body }
            ]
        }))
    }
}

impl RankAdvisor for HttpAdvisor {
    fn rerank(&self, request: &RerankRequest) -> Option<Vec<String>> {
        let payload = self.request_payload(request)?;
        let url = format!("{}/chat/completions", self.base_url);

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "advisor request failed, keeping local order");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "advisor returned non-success status");
            return None;
        }
        let body: Value = match response.json() {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "advisor reply is not JSON");
                return None;
            }
        };

        parse_reply_ids(&body)
    }
}

/// The reply content must be a JSON array of id strings; a fenced code
/// block around it is tolerated.
fn parse_reply_ids(body: &Value) -> Option<Vec<String>> {
    let content = body
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let parsed: Value = serde_json::from_str(trimmed).ok()?;
    let items = parsed.as_array()?;
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        ids.push(item.as_str()?.to_string());
    }
    Some(ids)
}
