//! Resolvers wrap one provider call each and turn every failure into `None`.
//!
//! A fetch chain strings them together: by location (IP lookup, then weather for the
//! returned city) or by search (weather for a user-entered query).

use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    model::{LocationReading, WeatherReading},
    provider::{
        LocationProvider, ProviderError, WeatherProvider, http_client, ipinfo::IpInfoProvider,
        weatherapi::WeatherApiProvider,
    },
};

/// Placeholder credential. While it (or no key at all) is configured the weather
/// resolver answers with [`WeatherReading::demo`] and never calls the network.
pub const DEMO_API_KEY: &str = "YOUR_WEATHERAPI_KEY";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Message shown for any failed chain, whichever stage failed.
pub const FETCH_FAILED: &str = "Could not fetch weather data.\nCheck your connection or API key.";

pub fn is_demo_key(api_key: Option<&str>) -> bool {
    match api_key.map(str::trim) {
        None | Some("") => true,
        Some(key) => key == DEMO_API_KEY,
    }
}

async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::time::timeout(limit, call).await.map_err(|_| ProviderError::Timeout(limit))?
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    provider: Arc<dyn LocationProvider>,
    timeout: Duration,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn LocationProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn resolve_location(&self) -> Option<LocationReading> {
        match with_timeout(self.timeout, self.provider.locate()).await {
            Ok(location) => {
                debug!(
                    city = %location.city,
                    coordinates = %location.coordinates,
                    "location resolved"
                );
                Some(location)
            }
            Err(err) => {
                warn!(error = %err, "location lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum WeatherMode {
    Live(Arc<dyn WeatherProvider>),
    /// Unconfigured credential: serve the synthetic reading.
    Demo,
}

#[derive(Debug, Clone)]
pub struct WeatherResolver {
    mode: WeatherMode,
    timeout: Duration,
}

impl WeatherResolver {
    pub fn new(mode: WeatherMode, timeout: Duration) -> Self {
        Self { mode, timeout }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.mode, WeatherMode::Demo)
    }

    pub async fn resolve_weather(&self, query: &str) -> Option<WeatherReading> {
        let provider = match &self.mode {
            WeatherMode::Live(provider) => provider,
            WeatherMode::Demo => {
                info!(query, "no API key configured, serving demo reading");
                return Some(WeatherReading::demo());
            }
        };

        match with_timeout(self.timeout, provider.current(query)).await {
            Ok(reading) => {
                debug!(query, city = %reading.city, "weather resolved");
                Some(reading)
            }
            Err(err) => {
                warn!(query, error = %err, "weather lookup failed");
                None
            }
        }
    }
}

/// Which resolvers to run for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchChain {
    ByLocation,
    BySearch(String),
}

impl FetchChain {
    /// Build a search chain; blank input yields `None`.
    pub fn search(text: &str) -> Option<Self> {
        let query = text.trim();
        if query.is_empty() { None } else { Some(FetchChain::BySearch(query.to_string())) }
    }
}

#[derive(Debug, Clone)]
pub struct Resolvers {
    pub location: LocationResolver,
    pub weather: WeatherResolver,
}

impl Resolvers {
    pub fn new(location: LocationResolver, weather: WeatherResolver) -> Self {
        Self { location, weather }
    }

    /// Real ipinfo.io and weatherapi.com resolvers, or demo mode when no key is set.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let timeout = config.timeout();
        let http = http_client(timeout)?;

        let location = LocationResolver::new(
            Arc::new(IpInfoProvider::new(config.ipinfo.url.clone(), http.clone())),
            timeout,
        );

        let api_key = config.weatherapi.api_key.as_deref();
        let mode = if is_demo_key(api_key) {
            WeatherMode::Demo
        } else {
            let key = api_key.unwrap_or_default().trim().to_string();
            WeatherMode::Live(Arc::new(WeatherApiProvider::new(
                key,
                config.weatherapi.base_url.clone(),
                http,
            )))
        };

        Ok(Self::new(location, WeatherResolver::new(mode, timeout)))
    }

    pub async fn run(&self, chain: &FetchChain) -> Option<WeatherReading> {
        match chain {
            FetchChain::ByLocation => {
                let location = self.location.resolve_location().await?;
                self.weather.resolve_weather(location.query()).await
            }
            FetchChain::BySearch(query) => self.weather.resolve_weather(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeLocation, FakeWeather, paris, paris_location};

    fn resolvers(location: &Arc<FakeLocation>, weather: &Arc<FakeWeather>) -> Resolvers {
        Resolvers::new(
            LocationResolver::new(location.clone(), DEFAULT_TIMEOUT),
            WeatherResolver::new(WeatherMode::Live(weather.clone()), DEFAULT_TIMEOUT),
        )
    }

    #[test]
    fn demo_key_detection() {
        assert!(is_demo_key(None));
        assert!(is_demo_key(Some("")));
        assert!(is_demo_key(Some("  YOUR_WEATHERAPI_KEY ")));
        assert!(!is_demo_key(Some("abc123")));
    }

    #[test]
    fn search_chain_trims_and_rejects_blank() {
        assert_eq!(FetchChain::search("  Paris \n"), Some(FetchChain::BySearch("Paris".into())));
        assert_eq!(FetchChain::search(""), None);
        assert_eq!(FetchChain::search(" \t "), None);
    }

    #[tokio::test]
    async fn location_chain_queries_weather_by_city() {
        let location = Arc::new(FakeLocation::ok(paris_location()));
        let weather = Arc::new(FakeWeather::new());
        weather.respond("Paris", paris());

        let reading = resolvers(&location, &weather).run(&FetchChain::ByLocation).await;

        assert_eq!(reading, Some(paris()));
        assert_eq!(weather.queries(), vec!["Paris".to_string()]);
    }

    #[tokio::test]
    async fn location_failure_skips_weather() {
        let location = Arc::new(FakeLocation::failing());
        let weather = Arc::new(FakeWeather::new());
        weather.respond("Paris", paris());

        let reading = resolvers(&location, &weather).run(&FetchChain::ByLocation).await;

        assert_eq!(reading, None);
        assert_eq!(location.calls(), 1);
        assert_eq!(weather.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_location_provider_times_out() {
        let location = Arc::new(FakeLocation::hanging());
        let weather = Arc::new(FakeWeather::new());

        let reading = resolvers(&location, &weather).run(&FetchChain::ByLocation).await;

        assert_eq!(reading, None);
        assert_eq!(weather.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_weather_provider_times_out() {
        let weather = Arc::new(FakeWeather::new());
        weather.hang("Paris");
        let resolver = WeatherResolver::new(WeatherMode::Live(weather.clone()), DEFAULT_TIMEOUT);

        assert_eq!(resolver.resolve_weather("Paris").await, None);
        assert_eq!(weather.calls(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_none() {
        let weather = Arc::new(FakeWeather::new());
        weather.unreachable("Paris");
        let resolver = WeatherResolver::new(WeatherMode::Live(weather.clone()), DEFAULT_TIMEOUT);

        assert_eq!(resolver.resolve_weather("Paris").await, None);
        assert_eq!(weather.calls(), 1);
    }

    #[tokio::test]
    async fn closed_port_collapses_to_none() {
        let mut cfg = Config::default();
        cfg.set_api_key("abc123".into());
        cfg.ipinfo.url = "http://127.0.0.1:1/json".into();
        cfg.weatherapi.base_url = "http://127.0.0.1:1/v1".into();

        let resolvers = Resolvers::from_config(&cfg).unwrap();

        assert_eq!(resolvers.location.resolve_location().await, None);
        assert_eq!(resolvers.weather.resolve_weather("Paris").await, None);
        assert_eq!(resolvers.run(&FetchChain::ByLocation).await, None);
    }

    #[tokio::test]
    async fn weather_failure_is_none() {
        let weather = Arc::new(FakeWeather::new());
        weather.fail("Atlantis");
        let resolver = WeatherResolver::new(WeatherMode::Live(weather.clone()), DEFAULT_TIMEOUT);

        assert_eq!(resolver.resolve_weather("Atlantis").await, None);
    }

    #[tokio::test]
    async fn demo_mode_never_calls_provider() {
        let resolver = WeatherResolver::new(WeatherMode::Demo, DEFAULT_TIMEOUT);

        let reading = resolver.resolve_weather("anything").await.unwrap();

        assert!(resolver.is_demo());
        assert_eq!(reading.city, "Demo City");
        assert_eq!(reading, WeatherReading::demo());
    }

    #[tokio::test]
    async fn sentinel_key_in_config_selects_demo() {
        let mut cfg = Config::default();
        cfg.set_api_key(DEMO_API_KEY.to_string());

        let resolvers = Resolvers::from_config(&cfg).unwrap();
        assert!(resolvers.weather.is_demo());

        let reading = resolvers.run(&FetchChain::BySearch("anything".into())).await;
        assert_eq!(reading.map(|r| r.city), Some("Demo City".to_string()));
    }

    #[test]
    fn real_key_in_config_selects_live() {
        let mut cfg = Config::default();
        cfg.set_api_key("abc123".to_string());

        let resolvers = Resolvers::from_config(&cfg).unwrap();
        assert!(!resolvers.weather.is_demo());
    }
}
