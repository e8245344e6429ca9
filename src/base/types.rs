use serde::Deserialize;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Wire shape of a WeCom group text message.
///
/// Every field is optional on the wire: a missing or `null` value decodes to its
/// empty form, including `null` entries of `mentioned_list`. Wrong types (e.g. a
/// number for `content`) are rejected.
#[derive(Debug, Default, Deserialize)]
pub struct WeComPayload {
    pub msgtype: Option<String>,
    pub text: Option<WeComText>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeComText {
    pub content: Option<String>,
    pub mentioned_list: Option<Vec<Option<String>>>,
}

/// A decoded inbound chat event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatEvent {
    /// WeCom `msgtype`; may be empty.
    pub message_type: String,
    /// Raw `text.content`; may be empty.
    pub content: String,
    /// `text.mentioned_list`, verbatim and in wire order.
    pub mentioned_users: Vec<String>,
}

impl From<WeComPayload> for ChatEvent {
    fn from(payload: WeComPayload) -> Self {
        let text = payload.text.unwrap_or_default();

        Self {
            message_type: payload.msgtype.unwrap_or_default(),
            content: text.content.unwrap_or_default(),
            mentioned_users: text.mentioned_list.unwrap_or_default().into_iter().map(Option::unwrap_or_default).collect(),
        }
    }
}

/// Whether the robot was addressed, and if so what it was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerDecision {
    NotTriggered,
    /// The question is never empty.
    Triggered { question: String },
}

/// Successful end states of one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The robot was not mentioned; nothing was sent anywhere.
    NotTriggered,
    /// Dify answered and a reply post was attempted.
    Replied,
}

/// Request-local failures of the pipeline.
///
/// Reply-post failures are deliberately absent: they never fail a request.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The body could not be read off the connection.
    #[error("failed to read request body: {0:#}")]
    ReadBody(Err),
    /// The body is not valid GBK.
    #[error("failed to decode request body: {0:#}")]
    Decode(Err),
    /// The decoded text is not a WeCom message document.
    #[error("invalid json: {0:#}")]
    Parse(Err),
    /// Dify could not be reached or answered with a non-success status.
    #[error("dify call failed: {0:#}")]
    Llm(Err),
}
