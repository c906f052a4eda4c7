use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::LocationReading;

use super::{LocationProvider, ProviderError, fetch_body};

pub const DEFAULT_URL: &str = "https://ipinfo.io/json";

/// IP geolocation through ipinfo.io.
#[derive(Debug, Clone)]
pub struct IpInfoProvider {
    url: String,
    http: Client,
}

impl IpInfoProvider {
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self { url: url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    loc: Option<String>,
}

/// Individual fields may be absent; only an undecodable body is an error.
pub fn parse_location(body: &str) -> Result<LocationReading, ProviderError> {
    let parsed: IpInfoResponse = serde_json::from_str(body)?;

    Ok(LocationReading {
        city: parsed.city.unwrap_or_else(|| "Unknown".to_string()),
        region: parsed.region.unwrap_or_default(),
        country: parsed.country.unwrap_or_default(),
        coordinates: parsed.loc.unwrap_or_default(),
    })
}

#[async_trait]
impl LocationProvider for IpInfoProvider {
    async fn locate(&self) -> Result<LocationReading, ProviderError> {
        let body = fetch_body(self.http.get(&self.url)).await?;
        parse_location(&body)
    }
}
