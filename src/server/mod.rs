pub mod handlers;
mod types;

pub use types::AppState;

use crate::{
    Result,
    config::Config,
    signal::{HttpUpstream, SignalingProxy},
};
use axum::{
    Router,
    routing::{any, get},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::assistant_page))
        .route("/static/js/ai-assistant.js", get(handlers::assistant_script))
        .route("/webrtc-signal/", any(handlers::webrtc_signal))
        .route("/webrtc-signal", any(handlers::webrtc_signal))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let upstream = HttpUpstream::from_config(&config.realtime)?;
    let proxy = SignalingProxy::new(
        Arc::new(upstream),
        config.realtime.api_key().map(str::to_string),
        config.realtime.default_model.clone(),
    );

    if !proxy.has_api_key() {
        warn!("OPENAI_API_KEY is not set; signaling requests will fail until it is configured");
    }

    let app = router(AppState { proxy });

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
