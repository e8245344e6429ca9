//! Library root for `wecom-dify-bot`.
//!
//! The bot sits in a WeCom group as a webhook robot and:
//! - Receives GBK-encoded group message callbacks
//! - Answers only when it (or `@all`) is mentioned
//! - Forwards the question to a Dify chat app as a stateless query
//! - Posts the question and answer back to the group as markdown
//!
//! The architecture is built around extensible traits for the LLM and chat
//! sides, so either backend can be swapped or mocked.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Builds the runtime context with the Dify and WeCom clients, then serves the
/// webhook until shutdown.
pub async fn start(config: Config) -> Void {
    info!("Starting wecom-dify-bot ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
