mod proxy;
mod types;
mod upstream;

pub use proxy::SignalingProxy;
pub use types::*;
pub use upstream::{
    BETA_HEADER, HttpUpstream, RealtimeUpstream, SDP_CONTENT_TYPE, SdpOffer, UpstreamOutcome,
    build_url,
};
