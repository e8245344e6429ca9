//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::Path, sync::Arc};

use anyhow::{Context, anyhow};
use reqwest::Url;
use serde::Deserialize;

use crate::base::prompts;

use super::types::{Res, Void};

/// Default user identifier reported to Dify.
fn default_dify_user() -> String {
    prompts::DIFY_USER.to_string()
}

/// Default timeout for the blocking Dify call.
fn default_dify_timeout_secs() -> u64 {
    120
}

/// Default mention marker rendered by the WeCom client.
fn default_wechat_mention_marker() -> String {
    prompts::MENTION_MARKER.to_string()
}

/// Default timeout for the group webhook post.
fn default_wechat_timeout_secs() -> u64 {
    30
}

/// Default bind host.
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

/// Default bind port.
fn default_server_port() -> u16 {
    8080
}

/// Configuration for the bridge.
///
/// Loaded once at startup, then cloned into every request. The inner record is
/// never mutated after [`Config::load`] returns.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Dify chat app settings (`dify.*`).
    pub dify: DifyConfig,
    /// WeCom group robot settings (`wechat.*`).
    pub wechat: WechatConfig,
    /// HTTP listener settings (`server.*`).
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DifyConfig {
    /// Dify app API key (`WECOM_BOT_DIFY__API_KEY`).
    pub api_key: String,
    /// Dify chat-messages endpoint (`WECOM_BOT_DIFY__CHAT_API`).
    pub chat_api: String,
    /// User identifier sent with every query (`WECOM_BOT_DIFY__USER`).
    #[serde(default = "default_dify_user")]
    pub user: String,
    /// Request timeout, in seconds (`WECOM_BOT_DIFY__TIMEOUT_SECS`).
    #[serde(default = "default_dify_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WechatConfig {
    /// Group robot webhook URL (`WECOM_BOT_WECHAT__WEBHOOK_URL`).
    pub webhook_url: String,
    /// The robot's own user id in the group (`WECOM_BOT_WECHAT__ROBOT_USER_ID`).
    pub robot_user_id: String,
    /// Text the WeCom client inserts into `content` for an @-mention of the robot
    /// (`WECOM_BOT_WECHAT__MENTION_MARKER`).
    #[serde(default = "default_wechat_mention_marker")]
    pub mention_marker: String,
    /// Request timeout, in seconds (`WECOM_BOT_WECHAT__TIMEOUT_SECS`).
    #[serde(default = "default_wechat_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Bind host (`WECOM_BOT_SERVER__HOST`).
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Bind port (`WECOM_BOT_SERVER__PORT`).
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Config {
    /// Load the configuration from `explicit_path` (or `config.{yaml,toml}` in the
    /// working directory) overlaid with `WECOM_BOT_*` environment variables.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else {
            cfg = cfg.add_source(config::File::with_name("config").required(false));
        }

        cfg = cfg.add_source(config::Environment::with_prefix("WECOM_BOT").prefix_separator("_").separator("__"));

        Self::from_builder(cfg)
    }

    /// Build and validate a configuration from any set of sources.
    pub fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Res<Self> {
        let inner: ConfigInner = builder.build()?.try_deserialize().context("Failed to parse configuration")?;

        let result = Config { inner: Arc::new(inner) };
        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Void {
        if self.dify.api_key.trim().is_empty() {
            return Err(anyhow!("dify.api_key must not be empty."));
        }

        if self.wechat.robot_user_id.trim().is_empty() {
            return Err(anyhow!("wechat.robot_user_id must not be empty."));
        }

        validate_http_url("dify.chat_api", &self.dify.chat_api)?;
        validate_http_url("wechat.webhook_url", &self.wechat.webhook_url)?;

        if !(1..=600).contains(&self.dify.timeout_secs) {
            return Err(anyhow!("dify.timeout_secs must be between 1 and 600."));
        }

        if !(1..=600).contains(&self.wechat.timeout_secs) {
            return Err(anyhow!("wechat.timeout_secs must be between 1 and 600."));
        }

        Ok(())
    }
}

fn validate_http_url(key: &str, value: &str) -> Void {
    let url = Url::parse(value).with_context(|| format!("{key} is not a valid URL: `{value}`"))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(anyhow!("{key} must use http or https, not `{scheme}`.")),
    }
}

// Tests.
