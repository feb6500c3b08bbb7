use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const API_KEY_NOT_CONFIGURED: &str = "OpenAI API key not configured";
pub const INVALID_JSON: &str = "Invalid JSON in request body";
pub const SDP_NOT_PROVIDED: &str = "SDP offer not provided in request body";
pub const UPSTREAM_ERROR: &str = "OpenAI API error";
pub const SERVER_ERROR: &str = "Server error";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Client-supplied session parameters, echoed back verbatim on success.
pub type SessionParams = Map<String, Value>;

/// A validated signaling request.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRequest {
    pub sdp: String,
    pub session_params: SessionParams,
}

/// Why a request body was rejected before reaching the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Not parseable as JSON: a client error.
    InvalidJson,
    /// No usable `sdp`: a client error.
    MissingSdp,
    /// Parsed, but not in a shape the proxy can process.
    Malformed(String),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingSdp => StatusCode::BAD_REQUEST,
            Self::Malformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_reply(self) -> SignalReply {
        let status = self.status();
        match self {
            Self::InvalidJson => SignalReply::error(status, INVALID_JSON),
            Self::MissingSdp => SignalReply::error(status, SDP_NOT_PROVIDED),
            Self::Malformed(reason) => {
                SignalReply::error_with_details(status, SERVER_ERROR, Some(Value::String(reason)))
            }
        }
    }
}

/// Whether a field counts as supplied: null, false, zero and empty values do not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Query-string text for a passed-through value.
fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

impl SignalRequest {
    pub fn parse(body: &[u8]) -> Result<Self, RequestError> {
        let text = std::str::from_utf8(body).map_err(|e| {
            RequestError::Malformed(format!("request body is not valid UTF-8: {}", e))
        })?;
        let value: Value = serde_json::from_str(text).map_err(|_| RequestError::InvalidJson)?;
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(RequestError::Malformed(format!(
                    "request body must be a JSON object, got {}",
                    type_name(&other)
                )));
            }
        };

        let sdp = fields.remove("sdp").unwrap_or(Value::Null);
        if !is_truthy(&sdp) {
            return Err(RequestError::MissingSdp);
        }
        let sdp = match sdp {
            Value::String(sdp) => sdp,
            other => {
                return Err(RequestError::Malformed(format!(
                    "sdp must be a string, got {}",
                    type_name(&other)
                )));
            }
        };

        let session_params = match fields.remove("session_params") {
            None => Map::new(),
            Some(Value::Object(params)) => params,
            Some(other) => {
                return Err(RequestError::Malformed(format!(
                    "session_params must be a JSON object, got {}",
                    type_name(&other)
                )));
            }
        };

        Ok(Self {
            sdp,
            session_params,
        })
    }

    /// Model requested by the client, or `default` when absent or null.
    pub fn model(&self, default: &str) -> String {
        match self.session_params.get("model") {
            None | Some(Value::Null) => default.to_string(),
            Some(model) => query_text(model),
        }
    }

    /// Playback speed passed through to the upstream, if one was supplied.
    ///
    /// Falsy values (`null`, `false`, zero, `""`, `[]`, `{}`) count as not
    /// supplied.
    pub fn speed(&self) -> Option<String> {
        self.session_params
            .get("speed")
            .filter(|speed| is_truthy(speed))
            .map(query_text)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Serialize)]
pub struct SignalAnswer {
    pub sdp: String,
    pub session_data: SessionParams,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Status and JSON payload returned to the browser client.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalReply {
    pub status: StatusCode,
    pub body: Value,
}

impl SignalReply {
    pub fn answer(answer: SignalAnswer) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!(answer),
        }
    }

    pub fn error(status: StatusCode, error: impl Into<String>) -> Self {
        Self::error_with_details(status, error, None)
    }

    pub fn error_with_details(
        status: StatusCode,
        error: impl Into<String>,
        details: Option<Value>,
    ) -> Self {
        let body = ErrorResponse {
            error: error.into(),
            details,
        };
        Self {
            status,
            body: json!(body),
        }
    }
}

impl IntoResponse for SignalReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(value: Value) -> SignalRequest {
        SignalRequest {
            sdp: "v=0".to_string(),
            session_params: value.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_parse_full_request() {
        let body = json!({
            "sdp": "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\n",
            "session_params": {"model": "m", "speed": 1.5}
        });
        let request = SignalRequest::parse(body.to_string().as_bytes()).unwrap();

        assert_eq!(request.sdp, "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\n");
        assert_eq!(request.session_params.get("model"), Some(&json!("m")));
    }

    #[test]
    fn test_parse_without_session_params() {
        let request = SignalRequest::parse(br#"{"sdp": "v=0"}"#).unwrap();
        assert!(request.session_params.is_empty());
    }

    #[test]
    fn test_parse_client_errors() {
        assert_eq!(SignalRequest::parse(b"{not json"), Err(RequestError::InvalidJson));
        assert_eq!(SignalRequest::parse(b""), Err(RequestError::InvalidJson));
        assert_eq!(SignalRequest::parse(b"{}"), Err(RequestError::MissingSdp));
        for sdp in [json!(""), json!(null), json!(0), json!(false), json!([])] {
            let body = json!({"sdp": sdp});
            assert_eq!(
                SignalRequest::parse(body.to_string().as_bytes()),
                Err(RequestError::MissingSdp)
            );
        }
        // The SDP check runs before session_params is inspected.
        assert_eq!(
            SignalRequest::parse(br#"{"session_params": "fast"}"#),
            Err(RequestError::MissingSdp)
        );
    }

    #[test]
    fn test_parse_unprocessable_shapes() {
        let cases: [&[u8]; 6] = [
            b"[1, 2]",
            b"\"just a string\"",
            b"\xff\xfe",
            br#"{"sdp": 42}"#,
            br#"{"sdp": "v=0", "session_params": "fast"}"#,
            br#"{"sdp": "v=0", "session_params": null}"#,
        ];
        for body in cases {
            let err = SignalRequest::parse(body).unwrap_err();
            assert!(matches!(err, RequestError::Malformed(_)), "{:?}", err);
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_malformed_reply_carries_details() {
        let reply = SignalRequest::parse(br#"{"sdp": "v=0", "session_params": [1]}"#)
            .unwrap_err()
            .into_reply();

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.body,
            json!({
                "error": "Server error",
                "details": "session_params must be a JSON object, got array"
            })
        );
    }

    #[test]
    fn test_model_resolution() {
        assert_eq!(params(json!({})).model("default"), "default");
        assert_eq!(params(json!({"model": null})).model("default"), "default");
        assert_eq!(params(json!({"model": "custom"})).model("default"), "custom");
        assert_eq!(params(json!({"model": 4})).model("default"), "4");
    }

    #[test]
    fn test_speed_resolution() {
        assert_eq!(params(json!({})).speed(), None);
        assert_eq!(params(json!({"speed": null})).speed(), None);
        assert_eq!(params(json!({"speed": 0})).speed(), None);
        assert_eq!(params(json!({"speed": 0.0})).speed(), None);
        assert_eq!(params(json!({"speed": ""})).speed(), None);
        assert_eq!(params(json!({"speed": false})).speed(), None);
        assert_eq!(params(json!({"speed": []})).speed(), None);
        assert_eq!(params(json!({"speed": {}})).speed(), None);
        assert_eq!(params(json!({"speed": true})).speed(), Some("True".to_string()));
        assert_eq!(params(json!({"speed": 1.0})).speed(), Some("1.0".to_string()));
        assert_eq!(params(json!({"speed": 2})).speed(), Some("2".to_string()));
        assert_eq!(params(json!({"speed": "1.25"})).speed(), Some("1.25".to_string()));
    }

    #[test]
    fn test_error_reply_omits_missing_details() {
        let reply = SignalReply::error(StatusCode::BAD_REQUEST, INVALID_JSON);

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body, json!({"error": "Invalid JSON in request body"}));
    }
}
