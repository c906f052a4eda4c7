use crate::model::{LocationReading, WeatherReading};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::{fmt::Debug, time::Duration};

pub mod ipinfo;
pub mod weatherapi;

const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

/// Everything that can go wrong talking to an external provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no answer within {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Result<LocationReading, ProviderError>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// `query` is a place name or a `"lat,lon"` pair.
    async fn current(&self, query: &str) -> Result<WeatherReading, ProviderError>;
}

/// HTTP client shared by the real providers.
pub fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Send a prepared GET and hand back the body of a 2xx answer.
async fn fetch_body(request: reqwest::RequestBuilder) -> Result<String, ProviderError> {
    let res = request.send().await?;
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(ProviderError::Status { status, body: truncate_body(&body) });
    }

    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
