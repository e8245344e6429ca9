//! HTTP surface of the bridge.
//!
//! `POST /wechat` receives the raw WeCom callback and drives
//! [`handle_chat_event`]; `GET /health` answers liveness probes.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::{error, instrument, warn};

use crate::{
    base::types::{PipelineError, PipelineOutcome},
    interaction::chat_event::handle_chat_event,
    runtime::Runtime,
};

/// Build the router over a shared runtime.
pub fn router(runtime: Runtime) -> Router {
    Router::new()
        .route("/wechat", post(handle_wechat))
        .route("/health", get(handle_health))
        .with_state(runtime)
}

#[instrument(name = "wecom.webhook", skip_all)]
async fn handle_wechat(State(runtime): State<Runtime>, body: Result<Bytes, BytesRejection>) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return PipelineError::ReadBody(anyhow::anyhow!("{rejection}")).into_response(),
    };

    match handle_chat_event(&body, &runtime.config, &runtime.llm, &runtime.chat).await {
        Ok(PipelineOutcome::NotTriggered) => json_response(StatusCode::OK, json!({ "msg": "not triggered" })),
        Ok(PipelineOutcome::Replied) => json_response(StatusCode::OK, json!({ "msg": "replied" })),
        Err(err) => err.into_response(),
    }
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PipelineError::ReadBody(_) | PipelineError::Decode(_) => (StatusCode::BAD_REQUEST, "failed to read request body"),
            PipelineError::Parse(_) => (StatusCode::BAD_REQUEST, "invalid json"),
            PipelineError::Llm(_) => (StatusCode::INTERNAL_SERVER_ERROR, "dify 调用失败"),
        };

        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        json_response(status, json!({ "error": message }))
    }
}

/// JSON body with an explicit UTF-8 charset, which WeCom expects.
fn json_response(status: StatusCode, body: Value) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json; charset=utf-8")], body.to_string()).into_response()
}
