//! Event handling and user interactions for the bridge.
//!
//! This module provides functionality for handling inbound group messages:
//! - Decoding GBK webhook bodies into chat events
//! - Deciding whether the robot was @-mentioned
//! - Coordinating the Dify call and the group reply
//! - Mapping pipeline results onto HTTP responses

pub mod chat_event;
pub mod inbound;
pub mod reply;
pub mod trigger;
pub mod webhook;
