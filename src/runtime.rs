//! Runtime services and shared state for the bridge.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::webhook,
    service::{chat::ChatClient, llm::LlmClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration and the outbound clients. It is designed
/// to be trivially cloneable, allowing it to be handed to every request
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Initialize the LLM client.
        let llm = LlmClient::dify(&config)?;

        // Initialize the chat client.
        let chat = ChatClient::wecom(&config)?;

        Ok(Self { config, llm, chat })
    }

    /// Serve the webhook until Ctrl-C.
    pub async fn start(&self) -> Void {
        let host = self.config.server.host.as_str();
        let port = self.config.server.port;

        let listener = TcpListener::bind((host, port)).await.with_context(|| format!("Failed to bind {host}:{port}"))?;
        info!("WeCom webhook listening on {}", listener.local_addr()?);

        axum::serve(listener, webhook::router(self.clone()))
            .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
            .await?;

        Ok(())
    }
}

/// Resolve once `signal` fires.
///
/// If the signal handler cannot be installed, never resolve: the server keeps
/// serving instead of stopping right after bind.
async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        error!("Failed to listen for Ctrl-C, serving without a shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }

    info!("Shutting down ...");
}

// Tests.
