pub mod dify;

use crate::base::{prompts, types::Res};
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the single operation the bridge needs from a
/// conversational backend: one stateless question in, at most one answer out.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Ask a single, non-empty question with no conversation history.
    ///
    /// Returns `Ok(None)` when the backend answered successfully but the answer
    /// is missing, not a string, or empty. Transport failures and non-success
    /// statuses are errors.
    async fn ask(&self, question: &str) -> Res<Option<String>>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}

// Helpers.

/// Replace a missing answer with the fixed apology so a reply is never blank.
pub fn answer_or_fallback(answer: Option<String>) -> String {
    match answer {
        Some(answer) if !answer.is_empty() => answer,
        _ => prompts::FALLBACK_ANSWER.to_string(),
    }
}

// Tests.
