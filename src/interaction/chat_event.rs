//! The per-message pipeline: decode, trigger, ask, reply.

use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{PipelineError, PipelineOutcome, TriggerDecision},
    },
    interaction::{inbound, reply, trigger},
    service::{
        chat::ChatClient,
        llm::{LlmClient, answer_or_fallback},
    },
};

/// Run one inbound webhook body through the pipeline.
///
/// Steps run strictly in order. Decode and Dify failures end the request with an
/// error; a failed reply post is only logged, so the caller still sees
/// [`PipelineOutcome::Replied`].
#[instrument(skip_all)]
pub async fn handle_chat_event(body: &[u8], config: &Config, llm: &LlmClient, chat: &ChatClient) -> Result<PipelineOutcome, PipelineError> {
    let event = inbound::decode_event(body)?;

    let question = match trigger::evaluate(&event, chat.bot_user_id(), &config.wechat.mention_marker) {
        TriggerDecision::NotTriggered => return Ok(PipelineOutcome::NotTriggered),
        TriggerDecision::Triggered { question } => question,
    };

    let answer = llm.ask(&question).await.map_err(PipelineError::Llm)?;
    let answer = answer_or_fallback(answer);

    let reply = reply::format_reply(&question, &answer);
    info!("Reply content: {}", reply);

    if let Err(err) = chat.send_markdown(&reply).await {
        error!("Failed to post reply to WeCom group: {:#}", err);
    }

    Ok(PipelineOutcome::Replied)
}
