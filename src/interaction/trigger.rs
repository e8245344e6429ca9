//! Decides whether an inbound message addresses the robot.

use tracing::{info, instrument};

use crate::base::{
    prompts,
    types::{ChatEvent, TriggerDecision},
};

/// Whether `mentioned_users` names the robot or everyone.
///
/// Entries are compared verbatim: no trimming or case folding.
pub fn is_mentioned(mentioned_users: &[String], bot_user_id: &str) -> bool {
    mentioned_users.iter().any(|id| id == bot_user_id || id == prompts::BROADCAST_MENTION)
}

/// Strip the first `mention_marker` from `content` and trim what is left.
///
/// Later markers stay in the text. An empty result becomes the fallback question.
pub fn extract_question(content: &str, mention_marker: &str) -> String {
    let stripped = if mention_marker.is_empty() {
        content.to_string()
    } else {
        content.replacen(mention_marker, "", 1)
    };

    let question = stripped.trim();

    if question.is_empty() {
        prompts::FALLBACK_QUESTION.to_string()
    } else {
        question.to_string()
    }
}

/// Evaluate one event against the robot's identity.
#[instrument(skip_all)]
pub fn evaluate(event: &ChatEvent, bot_user_id: &str, mention_marker: &str) -> TriggerDecision {
    if !is_mentioned(&event.mentioned_users, bot_user_id) {
        info!("Not mentioned, mentioned list: {:?}, expected robot ID: {}", event.mentioned_users, bot_user_id);
        return TriggerDecision::NotTriggered;
    }

    let question = extract_question(&event.content, mention_marker);
    info!("User question: {}", question);

    TriggerDecision::Triggered { question }
}

// Tests.
