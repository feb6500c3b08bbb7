use super::types::*;
use super::upstream::{RealtimeUpstream, SdpOffer, UpstreamOutcome};
use axum::http::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Relays browser SDP offers to the realtime API.
///
/// Holds no per-request state: every call to [`SignalingProxy::handle`] is
/// independent and makes at most one upstream call.
#[derive(Clone)]
pub struct SignalingProxy {
    upstream: Arc<dyn RealtimeUpstream>,
    api_key: Option<String>,
    default_model: String,
}

impl SignalingProxy {
    pub fn new(
        upstream: Arc<dyn RealtimeUpstream>,
        api_key: Option<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            upstream,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            default_model: default_model.into(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Method and credential checks, run before the body is looked at.
    fn precheck(&self, method: &Method) -> Result<&str, SignalReply> {
        if *method != Method::POST {
            warn!("Rejecting {} request to signaling endpoint", method);
            return Err(SignalReply::error(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED));
        }

        self.api_key.as_deref().ok_or_else(|| {
            error!("Signaling request received but no API key is configured");
            SignalReply::error(StatusCode::INTERNAL_SERVER_ERROR, API_KEY_NOT_CONFIGURED)
        })
    }

    /// Reply for a request whose body could not be read (too large, aborted).
    pub fn reject_unreadable_body(
        &self,
        method: &Method,
        status: StatusCode,
        reason: impl Into<String>,
    ) -> SignalReply {
        if let Err(reply) = self.precheck(method) {
            return reply;
        }

        let reason = reason.into();
        warn!("Unreadable signaling request body: {}", reason);
        SignalReply::error_with_details(status, SERVER_ERROR, Some(Value::String(reason)))
    }

    pub async fn handle(&self, method: &Method, body: &[u8]) -> SignalReply {
        let api_key = match self.precheck(method) {
            Ok(api_key) => api_key,
            Err(reply) => return reply,
        };

        let request = match SignalRequest::parse(body) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejecting signaling request: {:?}", e);
                return e.into_reply();
            }
        };

        let offer = SdpOffer {
            model: request.model(&self.default_model),
            speed: request.speed(),
            sdp: request.sdp,
        };

        info!(
            model = %offer.model,
            speed = offer.speed.as_deref().unwrap_or("default"),
            sdp_len = offer.sdp.len(),
            "Forwarding SDP offer to realtime API"
        );

        match self.upstream.exchange(api_key, offer).await {
            UpstreamOutcome::Answer(sdp) => {
                info!("Relaying SDP answer ({} bytes)", sdp.len());
                SignalReply::answer(SignalAnswer {
                    sdp,
                    session_data: request.session_params,
                })
            }
            UpstreamOutcome::Rejected { status, body } => {
                let status = status
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                warn!("Realtime API rejected offer with status {}", status);
                SignalReply::error_with_details(status, UPSTREAM_ERROR, Some(error_details(body)))
            }
            UpstreamOutcome::Transport(message) => {
                error!("Realtime API call failed: {}", message);
                SignalReply::error_with_details(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR,
                    Some(Value::String(message)),
                )
            }
        }
    }
}

/// Decoded JSON error body, else raw text, else a generic message.
fn error_details(body: Option<String>) -> Value {
    match body {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
        _ => Value::String(UNKNOWN_ERROR.to_string()),
    }
}
