//! Reqwest-based client for OpenAI-compatible Chat Completions (non-streaming).

use std::time::Duration;

use anyhow::Result;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    StatusCode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("invalid API key header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    /// `Ok(None)` when no credential is configured.
    pub fn from_config(cfg: &Config) -> Result<Option<Self>> {
        let Some(api_key) = cfg.api_key() else {
            return Ok(None);
        };
        let timeout = cfg.get_u64("REQUEST_TIMEOUT").unwrap_or(60);
        let api_base_url = cfg.get("API_BASE_URL").unwrap_or_else(|| "default".into());
        let base_url = normalize_base_url(&api_base_url);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Some(Self { http, base_url, api_key }))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One request, one reply: the first choice's message content.
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        opts: ChatOptions,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", self.api_key))?);

        let body = serde_json::json!({
            "model": opts.model,
            "messages": messages,
        });

        debug!(%url, model = %opts.model, "sending completion request");
        let resp = self.http.post(url).headers(headers).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let text = resp.text().await?;
        parse_completion(&text)
    }
}

fn normalize_base_url(api_base_url: &str) -> String {
    let base_url = if api_base_url == "default" {
        "https://api.openai.com/v1"
    } else {
        api_base_url
    };
    let trimmed = base_url.trim_end_matches('/');
    if !trimmed.ends_with("/v1") && !trimmed.contains("/v1/") {
        format!("{}/v1", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn parse_completion(text: &str) -> Result<String, LlmError> {
    let completion: Completion =
        serde_json::from_str(text).map_err(|e| LlmError::Malformed(e.to_string()))?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::Malformed("no message content in reply".into()))
}

// Minimal response structures for OpenAI-like completions
#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(normalize_base_url("default"), "https://api.openai.com/v1");
        assert_eq!(normalize_base_url("http://localhost:8080"), "http://localhost:8080/v1");
        assert_eq!(normalize_base_url("http://localhost:8080/v1/"), "http://localhost:8080/v1");
    }

    #[test]
    fn test_no_credential_no_client() {
        let cfg = Config::from_file(Path::new("/nonexistent"));
        assert!(LlmClient::from_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn test_client_with_credential() {
        let mut cfg = Config::from_file(Path::new("/nonexistent"));
        cfg.overlay([("OPENAI_API_KEY", "sk-test"), ("API_BASE_URL", "http://127.0.0.1:9/")]);
        let client = LlmClient::from_config(&cfg).unwrap().unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9/v1");
    }

    #[test]
    fn test_parse_completion() {
        let text = concat!(
            r#"{"id":"x","choices":[{"index":0,"#,
            r#""message":{"role":"assistant","content":"hello"}}]}"#
        );
        assert_eq!(parse_completion(text).unwrap(), "hello");
    }

    #[test]
    fn test_parse_completion_malformed() {
        assert!(matches!(parse_completion("not json"), Err(LlmError::Malformed(_))));
        assert!(matches!(parse_completion(r#"{"choices":[]}"#), Err(LlmError::Malformed(_))));
        let null_content = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(matches!(parse_completion(null_content), Err(LlmError::Malformed(_))));
    }

    #[test]
    fn test_chat_message_serialization() {
        let msg = ChatMessage::new(Role::User, "hi");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v, serde_json::json!({"role": "user", "content": "hi"}));
    }
}
