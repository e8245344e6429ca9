//! Fixed texts exchanged with WeCom and Dify.

/// How the WeCom client renders an @-mention of the robot inside `text.content`.
pub const MENTION_MARKER: &str = "@智能运维机器人";

/// Broadcast entry in `mentioned_list` that addresses every member, the robot included.
pub const BROADCAST_MENTION: &str = "@all";

/// Sent to Dify when the robot is mentioned without a question.
pub const FALLBACK_QUESTION: &str = "你想问什么？";

/// Posted back when Dify returns no usable answer.
pub const FALLBACK_ANSWER: &str = "抱歉，我暂时无法回答你的问题。";

/// User identifier reported to Dify for every query.
pub const DIFY_USER: &str = "wecom-user-001";

/// Markdown heading above the question in the group reply.
pub const QUESTION_HEADING: &str = "## 问题";

/// Markdown heading above the answer in the group reply.
pub const ANSWER_HEADING: &str = "## 回答";
