//! WeCom group robot webhook.
//!
//! The robot posts through the group's webhook URL; it has no session or token
//! of its own beyond the key embedded in that URL.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    types::{Res, Void},
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the wecom implementation.

impl ChatClient {
    /// Creates a new WeCom group robot client.
    pub fn wecom(config: &Config) -> Res<Self> {
        let client = WeComChatClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<WeComChatClient> for ChatClient {
    fn from(client: WeComChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Wire types.

/// `{"msgtype": "markdown", "markdown": {"content": ...}}`
#[derive(Debug, Serialize)]
pub struct WeComMarkdownMessage<'a> {
    pub msgtype: &'static str,
    pub markdown: WeComMarkdown<'a>,
}

#[derive(Debug, Serialize)]
pub struct WeComMarkdown<'a> {
    pub content: &'a str,
}

impl<'a> WeComMarkdownMessage<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            msgtype: "markdown",
            markdown: WeComMarkdown { content },
        }
    }
}

// Structs.

/// WeCom group robot client implementation.
#[derive(Clone)]
pub struct WeComChatClient {
    client: reqwest::Client,
    webhook_url: String,
    bot_user_id: String,
}

impl WeComChatClient {
    /// Create a new WeCom chat client.
    #[instrument(name = "WeComChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.wechat.timeout_secs))
            .build()
            .context("Failed to build WeCom HTTP client")?;

        info!("WeCom robot user ID: {}", config.wechat.robot_user_id);

        Ok(Self {
            client,
            webhook_url: config.wechat.webhook_url.clone(),
            bot_user_id: config.wechat.robot_user_id.clone(),
        })
    }
}

#[async_trait]
impl GenericChatClient for WeComChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    #[instrument(skip_all)]
    async fn send_markdown(&self, content: &str) -> Void {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WeComMarkdownMessage::new(content))
            .send()
            .await
            .context("WeCom webhook request failed")?;

        let status = response.status();
        let body = response.text().await.context("Failed to read WeCom webhook response")?;

        if !status.is_success() {
            return Err(anyhow!("WeCom webhook returned {status}: {body}"));
        }

        check_business_response(&body)
    }
}

/// The webhook answers HTTP 200 even on rejection; the verdict is in `errcode`.
fn check_business_response(body: &str) -> Void {
    let parsed: Value = serde_json::from_str(body).context("Invalid WeCom response JSON")?;
    let errcode = parsed.get("errcode").and_then(Value::as_i64).ok_or_else(|| anyhow!("Missing errcode in WeCom response"))?;

    if errcode != 0 {
        let errmsg = parsed.get("errmsg").and_then(Value::as_str).unwrap_or("unknown");
        return Err(anyhow!("WeCom webhook rejected the message: errcode={errcode} errmsg={errmsg}"));
    }

    Ok(())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::config::{ConfigInner, WechatConfig};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config(webhook_url: &str) -> Config {
        Config {
            inner: Arc::new(ConfigInner {
                wechat: WechatConfig {
                    webhook_url: webhook_url.to_string(),
                    robot_user_id: "robot001".to_string(),
                    mention_marker: "@智能运维机器人".to_string(),
                    timeout_secs: 5,
                },
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_check_business_response() {
        assert!(check_business_response(r#"{"errcode":0,"errmsg":"ok"}"#).is_ok());
        assert!(check_business_response(r#"{"errcode":93000,"errmsg":"invalid webhook url"}"#).is_err());
        assert!(check_business_response(r#"{"errmsg":"ok"}"#).is_err());
        assert!(check_business_response("<html></html>").is_err());
    }

    #[tokio::test]
    async fn test_send_markdown_posts_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/webhook/send"))
            .and(query_param("key", "abc"))
            .and(body_json(json!({
                "msgtype": "markdown",
                "markdown": { "content": "## 问题\nq\n\n## 回答\na" },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0, "errmsg": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let config = create_test_config(&format!("{}/cgi-bin/webhook/send?key=abc", server.uri()));
        let chat = ChatClient::wecom(&config).unwrap();

        assert_eq!(chat.bot_user_id(), "robot001");
        chat.send_markdown("## 问题\nq\n\n## 回答\na").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_markdown_fails_on_errcode() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 45009, "errmsg": "api freq out of limit" })))
            .mount(&server)
            .await;

        let config = create_test_config(&format!("{}/cgi-bin/webhook/send?key=abc", server.uri()));
        let chat = ChatClient::wecom(&config).unwrap();

        let err = chat.send_markdown("x").await.unwrap_err();
        assert!(err.to_string().contains("45009"));
    }

    #[tokio::test]
    async fn test_send_markdown_fails_on_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST")).respond_with(ResponseTemplate::new(502)).mount(&server).await;

        let config = create_test_config(&format!("{}/cgi-bin/webhook/send?key=abc", server.uri()));
        let chat = ChatClient::wecom(&config).unwrap();

        assert!(chat.send_markdown("x").await.is_err());
    }
}
