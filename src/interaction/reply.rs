//! Formatting of the group reply.

use crate::base::prompts;

/// Render the question/answer pair as WeCom markdown.
pub fn format_reply(question: &str, answer: &str) -> String {
    format!("{}\n{question}\n\n{}\n{answer}", prompts::QUESTION_HEADING, prompts::ANSWER_HEADING)
}

// Tests.
