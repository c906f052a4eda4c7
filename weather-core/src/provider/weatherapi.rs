use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::WeatherReading;

use super::{ProviderError, WeatherProvider, fetch_body};

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        Self { api_key, base_url: base_url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
    feelslike_c: f64,
    feelslike_f: f64,
    humidity: u8,
    wind_kph: f64,
    wind_mph: f64,
    condition: WaCondition,
    uv: f64,
    last_updated: String,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

/// Decode a `current.json` body. Every field is required.
pub fn parse_current(body: &str) -> Result<WeatherReading, ProviderError> {
    let WaResponse { location, current } = serde_json::from_str(body)?;

    Ok(WeatherReading {
        city: location.name,
        region: location.region,
        country: location.country,
        temp_c: current.temp_c,
        temp_f: current.temp_f,
        feels_like_c: current.feelslike_c,
        feels_like_f: current.feelslike_f,
        humidity: current.humidity,
        wind_kph: current.wind_kph,
        wind_mph: current.wind_mph,
        condition: current.condition.text,
        condition_icon: current.condition.icon,
        uv: current.uv,
        last_updated: current.last_updated,
    })
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, query: &str) -> Result<WeatherReading, ProviderError> {
        let url = format!("{}/current.json", self.base_url.trim_end_matches('/'));

        let request = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("q", query), ("aqi", "no")]);

        let body = fetch_body(request).await?;
        parse_current(&body)
    }
}
