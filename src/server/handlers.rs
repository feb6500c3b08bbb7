use super::types::AppState;
use crate::signal::SignalReply;
use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{Method, header},
    response::{Html, IntoResponse},
};

const ASSISTANT_PAGE: &str = include_str!("../../static/assistant.html");
const ASSISTANT_SCRIPT: &str = include_str!("../../static/js/ai-assistant.js");

pub async fn assistant_page() -> Html<&'static str> {
    Html(ASSISTANT_PAGE)
}

pub async fn assistant_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        ASSISTANT_SCRIPT,
    )
}

/// Accepts every method so that non-POST requests receive the JSON 405 body.
/// Body rejections (over the size limit, aborted) are answered as JSON too.
pub async fn webrtc_signal(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> SignalReply {
    match body {
        Ok(body) => state.proxy.handle(&method, &body).await,
        Err(rejection) => {
            state
                .proxy
                .reject_unreadable_body(&method, rejection.status(), rejection.body_text())
        }
    }
}
