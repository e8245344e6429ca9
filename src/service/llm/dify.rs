//! Integration with the Dify chat-messages API.
//!
//! Every question is sent as a fresh, blocking-mode conversation: the bridge
//! never carries a `conversation_id` between requests.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::base::{config::Config, types::Res};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the dify implementation.

impl LlmClient {
    pub fn dify(config: &Config) -> Res<Self> {
        let client = DifyLlmClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

/// Body of `POST /v1/chat-messages`.
#[derive(Debug, Serialize)]
pub struct DifyChatRequest<'a> {
    pub inputs: Map<String, Value>,
    pub query: &'a str,
    pub response_mode: &'static str,
    pub conversation_id: &'static str,
    pub user: &'a str,
}

impl<'a> DifyChatRequest<'a> {
    /// A stateless, blocking query.
    pub fn blocking(query: &'a str, user: &'a str) -> Self {
        Self {
            inputs: Map::new(),
            query,
            response_mode: "blocking",
            conversation_id: "",
            user,
        }
    }
}

// Specific implementations.

/// Dify LLM client implementation.
#[derive(Clone)]
pub struct DifyLlmClient {
    client: reqwest::Client,
    config: Config,
}

impl DifyLlmClient {
    /// Create a new Dify LLM client.
    #[instrument(name = "DifyLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.dify.timeout_secs))
            .build()
            .context("Failed to build Dify HTTP client")?;

        Ok(Self { client, config: config.clone() })
    }
}

#[async_trait]
impl GenericLlmClient for DifyLlmClient {
    #[instrument(name = "DifyLlmClient::ask", skip_all)]
    async fn ask(&self, question: &str) -> Res<Option<String>> {
        let request = DifyChatRequest::blocking(question, &self.config.dify.user);

        debug!("Dify request endpoint: {}", self.config.dify.chat_api);
        debug!("Dify request body: {}", serde_json::to_string_pretty(&request)?);

        let response = self
            .client
            .post(&self.config.dify.chat_api)
            .bearer_auth(&self.config.dify.api_key)
            .json(&request)
            .send()
            .await
            .context("Dify request failed")?;

        info!("Dify response status: {}", response.status());

        let response = response.error_for_status().context("Dify returned a non-success status")?;
        let body = response.text().await.context("Failed to read Dify response body")?;

        let body: Value = match serde_json::from_str(&body) {
            Ok(body) => body,
            Err(err) => {
                warn!("Dify response is not valid JSON ({}): {}", err, body);
                return Ok(None);
            }
        };

        Ok(extract_answer(&body))
    }
}

/// Pull the `answer` string out of a Dify response.
///
/// Returns `None` when the field is missing, is not a string, or is empty.
pub fn extract_answer(body: &Value) -> Option<String> {
    let Some(answer) = body.get("answer") else {
        warn!("Dify response has no `answer` field.");
        return None;
    };

    let Some(answer) = answer.as_str() else {
        warn!("Dify response `answer` is not a string: {}", answer);
        return None;
    };

    if answer.is_empty() {
        warn!("Dify response `answer` is empty.");
        return None;
    }

    Some(answer.to_string())
}

// Tests.
