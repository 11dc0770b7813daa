//! Explanation of a failed run: offline patterns first, then the remote service.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    config::Config,
    llm::{ChatMessage, ChatOptions, LlmClient, Role},
};

pub mod fence;
pub mod offline;

pub const OFFLINE_MODE_MESSAGE: &str = "No explanation available (offline mode).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplanationSource {
    Offline,
    Remote,
    RemoteFailed,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub source: ExplanationSource,
    pub explanation: Option<String>,
    pub fix: Option<String>,
    pub corrected_code: Option<String>,
}

impl Explanation {
    fn offline(hit: &offline::OfflineFix) -> Self {
        Self {
            source: ExplanationSource::Offline,
            explanation: Some(hit.explanation.to_string()),
            fix: Some(hit.fix.to_string()),
            corrected_code: None,
        }
    }

    fn remote(reply: String) -> Self {
        let corrected_code = fence::extract_code(&reply);
        Self {
            source: ExplanationSource::Remote,
            explanation: None,
            fix: Some(reply),
            corrected_code,
        }
    }

    fn remote_failed(err: &anyhow::Error) -> Self {
        Self {
            source: ExplanationSource::RemoteFailed,
            explanation: Some(format!("Could not get AI explanation: {:#}", err)),
            fix: None,
            corrected_code: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            source: ExplanationSource::Unavailable,
            explanation: Some(OFFLINE_MODE_MESSAGE.to_string()),
            fix: None,
            corrected_code: None,
        }
    }
}

/// A service that turns source code plus error text into a free-text reply.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, source: &str, error: &str) -> Result<String>;
}

pub struct RemoteExplainer {
    client: LlmClient,
    model: String,
}

impl RemoteExplainer {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }

    /// `None` without a credential. A client that cannot be built is logged
    /// and also yields `None`, so the run continues in offline mode.
    pub fn from_config(cfg: &Config) -> Option<Self> {
        match LlmClient::from_config(cfg) {
            Ok(Some(client)) => {
                let model = cfg.get("DEFAULT_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
                debug!(base_url = client.base_url(), %model, "remote explainer enabled");
                Some(Self::new(client, model))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "remote explainer disabled");
                None
            }
        }
    }
}

#[async_trait]
impl Explainer for RemoteExplainer {
    async fn explain(&self, source: &str, error: &str) -> Result<String> {
        let messages = vec![ChatMessage::new(Role::User, build_prompt(source, error))];
        let opts = ChatOptions { model: self.model.clone() };
        Ok(self.client.complete(messages, opts).await?)
    }
}

pub fn build_prompt(source: &str, error: &str) -> String {
    format!(
        "The following code has an error:\n{source}\n\nError:\n{error}\n\nPlease:\n\
         1. Explain the error in beginner-friendly language.\n\
         2. Provide a corrected version of the code.\n"
    )
}

/// Explain `stderr` produced by running the file at `path`.
///
/// Exactly one source fills the result. Remote failures are folded into the
/// explanation text and never returned as errors.
pub async fn explain_failure(
    stderr: &str,
    path: &Path,
    remote: Option<&dyn Explainer>,
) -> Explanation {
    if let Some(hit) = offline::lookup(stderr) {
        debug!(pattern = hit.pattern, "offline pattern matched");
        return Explanation::offline(hit);
    }

    let Some(remote) = remote else {
        debug!("no offline match and no credential");
        return Explanation::unavailable();
    };

    let reply: Result<String> = async {
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        remote.explain(&source, stderr).await
    }
    .await;

    match reply {
        Ok(reply) => Explanation::remote(reply),
        Err(err) => {
            debug!(error = %err, "remote explanation failed");
            Explanation::remote_failed(&err)
        }
    }
}
