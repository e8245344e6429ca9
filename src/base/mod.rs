//! Core components, types, and utilities for the bridge.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Fixed texts exchanged with WeCom and Dify.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
