use super::mocks::MockUpstream;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use realtime_signal::{
    config::DEFAULT_REALTIME_MODEL,
    server::{self, AppState},
    signal::{RealtimeUpstream, SignalingProxy},
};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_API_KEY: &str = "sk-test-key";
pub const TEST_OFFER: &str = "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\ns=-\r\n";

/// Create a proxy over the given upstream with the test key
pub fn create_proxy(upstream: Arc<dyn RealtimeUpstream>) -> SignalingProxy {
    SignalingProxy::new(
        upstream,
        Some(TEST_API_KEY.to_string()),
        DEFAULT_REALTIME_MODEL,
    )
}

/// Create a proxy backed by a mock, returning both
pub fn create_mock_proxy(mock: MockUpstream) -> (SignalingProxy, MockUpstream) {
    let proxy = create_proxy(Arc::new(mock.clone()));
    (proxy, mock)
}

pub fn create_test_app(proxy: SignalingProxy) -> Router {
    server::router(AppState { proxy })
}

pub fn json_request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
