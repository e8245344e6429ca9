//! Decoding of inbound WeCom webhook bodies.
//!
//! WeCom delivers group messages GBK-encoded; everything downstream works on
//! UTF-8 text.

use anyhow::anyhow;
use encoding_rs::GBK;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::base::types::{ChatEvent, PipelineError, WeComPayload};

/// Transcode a raw GBK body into UTF-8.
///
/// Any malformed byte sequence fails the whole body; nothing is replaced.
pub fn decode_gbk(body: &[u8]) -> Result<String, PipelineError> {
    GBK.decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| PipelineError::Decode(anyhow!("malformed GBK byte sequence in {} byte body", body.len())))
}

/// Parse decoded text into a [`ChatEvent`].
///
/// The text goes through a [`Value`] first so a repeated key keeps its last
/// occurrence instead of being rejected.
pub fn parse_event(text: &str) -> Result<ChatEvent, PipelineError> {
    let value: Value = serde_json::from_str(text).map_err(|e| PipelineError::Parse(e.into()))?;
    let payload = Option::<WeComPayload>::deserialize(value).map_err(|e| PipelineError::Parse(e.into()))?;

    Ok(payload.unwrap_or_default().into())
}

/// Transcode and parse one inbound body.
#[instrument(skip_all)]
pub fn decode_event(body: &[u8]) -> Result<ChatEvent, PipelineError> {
    let text = decode_gbk(body)?;
    info!("Decoded request body: {}", text);

    let event = parse_event(&text)?;
    info!("Received message, msgtype: `{}`, mentioned list: {:?}", event.message_type, event.mentioned_users);

    Ok(event)
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn gbk(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = GBK.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_decode_gbk_chinese() {
        let body = gbk("服务器宕机了怎么办");
        assert_ne!(body, "服务器宕机了怎么办".as_bytes());

        assert_eq!(decode_gbk(&body).unwrap(), "服务器宕机了怎么办");
    }

    #[test]
    fn test_decode_gbk_ascii_passthrough() {
        assert_eq!(decode_gbk(b"{\"msgtype\":\"text\"}").unwrap(), "{\"msgtype\":\"text\"}");
    }

    #[test]
    fn test_decode_gbk_rejects_truncated_sequence() {
        // 0x81 is a GBK lead byte with no trail byte.
        let err = decode_gbk(&[b'{', 0x81]).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn test_parse_event_full() {
        let event = parse_event(r#"{"msgtype":"text","text":{"content":"@智能运维机器人 hi","mentioned_list":["robot001","@all"]}}"#).unwrap();

        assert_eq!(
            event,
            ChatEvent {
                message_type: "text".to_string(),
                content: "@智能运维机器人 hi".to_string(),
                mentioned_users: vec!["robot001".to_string(), "@all".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_event_missing_fields_are_empty() {
        assert_eq!(parse_event("{}").unwrap(), ChatEvent::default());
        assert_eq!(parse_event(r#"{"text":{"content":"x"}}"#).unwrap().mentioned_users, Vec::<String>::new());
        assert_eq!(parse_event(r#"{"msgtype":null,"text":{"mentioned_list":null}}"#).unwrap(), ChatEvent::default());
    }

    #[test]
    fn test_parse_event_repeated_key_keeps_last() {
        let event = parse_event(r#"{"msgtype":"a","msgtype":"text","text":{"content":"x"}}"#).unwrap();

        assert_eq!(event.message_type, "text");
    }

    #[test]
    fn test_parse_event_null_mention_entry_is_empty() {
        let event = parse_event(r#"{"text":{"mentioned_list":[null,"robot001"]}}"#).unwrap();

        assert_eq!(event.mentioned_users, vec![String::new(), "robot001".to_string()]);
    }

    #[test]
    fn test_parse_event_rejects_bad_shapes() {
        assert!(matches!(parse_event("not json"), Err(PipelineError::Parse(_))));
        assert!(matches!(parse_event("[]"), Err(PipelineError::Parse(_))));
        assert!(matches!(parse_event(r#"{"text":{"content":42}}"#), Err(PipelineError::Parse(_))));
        assert!(matches!(parse_event(r#"{"text":{"mentioned_list":"robot001"}}"#), Err(PipelineError::Parse(_))));
    }

    #[test]
    fn test_decode_event_from_gbk() {
        let body = gbk(r#"{"msgtype":"text","text":{"content":"你好","mentioned_list":["robot001"]}}"#);
        let event = decode_event(&body).unwrap();

        assert_eq!(event.content, "你好");
        assert_eq!(event.mentioned_users, vec!["robot001".to_string()]);
    }
}
