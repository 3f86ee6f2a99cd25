use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info};

use super::error::UpstreamError;
use super::lines::MessageLines;
use super::oauth::{OAuthSigner, percent_encode};
use crate::domain::BoundingBox;

/// Location-filtered post stream endpoint
pub const DEFAULT_FILTER_URL: &str = "https://stream.twitter.com/1.1/statuses/filter.json";

/// Raw message lines of one live connection
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<String, UpstreamError>> + Send>>;

/// Source of live connections to the post stream
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Open a new connection restricted to `filter`
    async fn connect(&self, filter: &BoundingBox) -> Result<MessageStream, UpstreamError>;
}

/// HTTP streaming client for the location filter endpoint
pub struct FilterStreamClient {
    http: reqwest::Client,
    signer: OAuthSigner,
    url: String,
}

impl FilterStreamClient {
    /// Build a client; `connect_timeout` bounds connection establishment only,
    /// the stream itself stays open indefinitely
    pub fn new(signer: OAuthSigner, connect_timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("geostream/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            signer,
            url: DEFAULT_FILTER_URL.to_string(),
        })
    }

    /// Point the client at another endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Upstream for FilterStreamClient {
    async fn connect(&self, filter: &BoundingBox) -> Result<MessageStream, UpstreamError> {
        let locations = filter.to_locations_param();
        let params = [
            ("locations", locations.as_str()),
            ("stall_warnings", "true"),
        ];

        let authorization = self.signer.authorization("POST", &self.url, &params)?;
        let body = params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        debug!(url = %self.url, %locations, "Connecting to filter stream");
        let response = self
            .http
            .post(&self.url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                code: status.as_u16(),
            });
        }

        info!(url = %self.url, "Connected to filter stream");
        Ok(Box::pin(MessageLines::new(response.bytes_stream())))
    }
}
