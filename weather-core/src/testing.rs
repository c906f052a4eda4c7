//! Fakes shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{
    controller::PresentationSurface,
    model::{LocationReading, UnitPreference, WeatherReading},
    provider::{LocationProvider, ProviderError, WeatherProvider},
};

fn decode_error() -> ProviderError {
    ProviderError::Decode(serde_json::from_str::<serde_json::Value>("{\"current\":").unwrap_err())
}

fn transport_error() -> ProviderError {
    let err = reqwest::Client::new().get("http://[::1").build().unwrap_err();
    ProviderError::Transport(err)
}

pub fn paris_location() -> LocationReading {
    LocationReading {
        city: "Paris".into(),
        region: "Ile-de-France".into(),
        country: "FR".into(),
        coordinates: "48.85,2.35".into(),
    }
}

pub fn paris() -> WeatherReading {
    reading("Paris", 18.0, 70, "Clear")
}

pub fn reading(city: &str, temp_c: f64, humidity: u8, condition: &str) -> WeatherReading {
    WeatherReading {
        city: city.to_string(),
        region: "Ile-de-France".into(),
        country: "France".into(),
        temp_c,
        temp_f: 64.4,
        feels_like_c: 17.4,
        feels_like_f: 63.3,
        humidity,
        wind_kph: 11.2,
        wind_mph: 6.9,
        condition: condition.to_string(),
        condition_icon: "//cdn.weatherapi.com/weather/64x64/day/113.png".into(),
        uv: 3.5,
        last_updated: "2025-10-14 10:15".into(),
    }
}

#[derive(Debug, Clone)]
enum Behavior<T> {
    Ok(T),
    Fail,
    Unreachable,
    Hang,
}

async fn act<T>(behavior: Behavior<T>) -> Result<T, ProviderError> {
    match behavior {
        Behavior::Ok(value) => Ok(value),
        Behavior::Fail => Err(decode_error()),
        Behavior::Unreachable => Err(transport_error()),
        Behavior::Hang => std::future::pending().await,
    }
}

#[derive(Debug)]
pub struct FakeLocation {
    behavior: Behavior<LocationReading>,
    calls: AtomicUsize,
}

impl FakeLocation {
    fn with(behavior: Behavior<LocationReading>) -> Self {
        Self { behavior, calls: AtomicUsize::new(0) }
    }

    pub fn ok(location: LocationReading) -> Self {
        Self::with(Behavior::Ok(location))
    }

    pub fn failing() -> Self {
        Self::with(Behavior::Fail)
    }

    pub fn unreachable() -> Self {
        Self::with(Behavior::Unreachable)
    }

    pub fn hanging() -> Self {
        Self::with(Behavior::Hang)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn locate(&self) -> Result<LocationReading, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        act(self.behavior.clone()).await
    }
}

/// Answers per query; unknown queries fail. A gated query waits for its sender.
#[derive(Debug, Default)]
pub struct FakeWeather {
    behaviors: Mutex<HashMap<String, Behavior<WeatherReading>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    queries: Mutex<Vec<String>>,
}

impl FakeWeather {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, query: &str, behavior: Behavior<WeatherReading>) {
        self.behaviors.lock().unwrap().insert(query.to_string(), behavior);
    }

    pub fn respond(&self, query: &str, reading: WeatherReading) {
        self.set(query, Behavior::Ok(reading));
    }

    pub fn fail(&self, query: &str) {
        self.set(query, Behavior::Fail);
    }

    pub fn unreachable(&self, query: &str) {
        self.set(query, Behavior::Unreachable);
    }

    pub fn hang(&self, query: &str) {
        self.set(query, Behavior::Hang);
    }

    /// Hold the answer for `query` until the returned sender fires.
    pub fn gate(&self, query: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, query: &str) -> Result<WeatherReading, ProviderError> {
        self.queries.lock().unwrap().push(query.to_string());

        let gate = self.gates.lock().unwrap().remove(query);
        if let Some(gate) = gate {
            gate.await.ok();
        }

        let behavior = self.behaviors.lock().unwrap().get(query).cloned();
        act(behavior.unwrap_or(Behavior::Fail)).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Render {
    Loading,
    Weather(WeatherReading, UnitPreference),
    Error(String),
    Theme,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub renders: Vec<Render>,
}

impl RecordingSurface {
    pub fn last(&self) -> Option<&Render> {
        self.renders.last()
    }
}

impl PresentationSurface for RecordingSurface {
    fn render_loading(&mut self) {
        self.renders.push(Render::Loading);
    }

    fn render_weather(&mut self, reading: &WeatherReading, unit: UnitPreference) {
        self.renders.push(Render::Weather(reading.clone(), unit));
    }

    fn render_error(&mut self, message: &str) {
        self.renders.push(Render::Error(message.to_string()));
    }

    fn toggle_theme(&mut self) {
        self.renders.push(Render::Theme);
    }
}
