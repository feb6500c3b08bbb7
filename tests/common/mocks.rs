use async_trait::async_trait;
use realtime_signal::signal::{RealtimeUpstream, SdpOffer, UpstreamOutcome};
use std::sync::{Arc, Mutex};

/// Mock realtime API for testing
#[derive(Debug, Clone)]
pub struct MockUpstream {
    pub outcome: UpstreamOutcome,
    pub calls: Arc<Mutex<Vec<(String, SdpOffer)>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::with_outcome(UpstreamOutcome::Answer("v=0\r\nanswer".to_string()))
    }

    pub fn with_outcome(outcome: UpstreamOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_calls(&self) -> Vec<(String, SdpOffer)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RealtimeUpstream for MockUpstream {
    async fn exchange(&self, api_key: &str, offer: SdpOffer) -> UpstreamOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), offer));
        self.outcome.clone()
    }
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}
