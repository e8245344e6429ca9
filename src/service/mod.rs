//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the bridge:
//! - Chat services (e.g., the WeCom group robot webhook)
//! - LLM services (e.g., Dify)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod llm;
