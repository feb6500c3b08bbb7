use crate::{Error, Result, config::RealtimeConfig};
use async_trait::async_trait;
use reqwest::{Client, Url, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

pub const SDP_CONTENT_TYPE: &str = "application/sdp";
pub const BETA_HEADER: &str = "OpenAI-Beta";

/// An SDP offer addressed to a specific realtime model.
#[derive(Debug, Clone, PartialEq)]
pub struct SdpOffer {
    pub model: String,
    pub speed: Option<String>,
    pub sdp: String,
}

/// What the realtime API did with an offer.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    /// 2xx with the SDP answer as text.
    Answer(String),
    /// Non-success status with whatever body could be read.
    Rejected {
        status: Option<u16>,
        body: Option<String>,
    },
    /// The call never produced a usable response.
    Transport(String),
}

#[async_trait]
pub trait RealtimeUpstream: Send + Sync {
    async fn exchange(&self, api_key: &str, offer: SdpOffer) -> UpstreamOutcome;
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| Error::config(format!("Invalid realtime base URL '{}': {}", base_url, e)))
}

/// Builds `<base_url>?model=<model>[&speed=<speed>]`.
pub fn build_url(base_url: &str, model: &str, speed: Option<&str>) -> Result<Url> {
    let mut url = parse_base_url(base_url)?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("model", model);
        if let Some(speed) = speed {
            query.append_pair("speed", speed);
        }
    }

    Ok(url)
}

/// Forwards offers to the realtime API over HTTPS.
pub struct HttpUpstream {
    client: Client,
    base_url: String,
    beta_header: String,
}

impl HttpUpstream {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        parse_base_url(&base_url)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            beta_header: "realtime=v1".to_string(),
        })
    }

    pub fn from_config(config: &RealtimeConfig) -> Result<Self> {
        Ok(Self::new(config.base_url.clone(), config.timeout())?
            .with_beta_header(config.beta_header.clone()))
    }

    pub fn with_beta_header(mut self, value: impl Into<String>) -> Self {
        self.beta_header = value.into();
        self
    }
}

#[async_trait]
impl RealtimeUpstream for HttpUpstream {
    async fn exchange(&self, api_key: &str, offer: SdpOffer) -> UpstreamOutcome {
        let url = match build_url(&self.base_url, &offer.model, offer.speed.as_deref()) {
            Ok(url) => url,
            Err(e) => return UpstreamOutcome::Transport(e.to_string()),
        };

        debug!("Posting SDP offer to {}", url);

        let response = match self
            .client
            .post(url)
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, SDP_CONTENT_TYPE)
            .header(BETA_HEADER, &self.beta_header)
            .body(offer.sdp)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return UpstreamOutcome::Transport(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return UpstreamOutcome::Rejected {
                status: Some(status.as_u16()),
                body: response.text().await.ok(),
            };
        }

        match response.text().await {
            Ok(answer) => UpstreamOutcome::Answer(answer),
            Err(e) => UpstreamOutcome::Transport(e.to_string()),
        }
    }
}
