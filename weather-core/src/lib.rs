//! Core library for the `weather` app.
//!
//! This crate defines:
//! - Shared domain models (weather and location readings, units)
//! - Provider clients and the resolvers that wrap them
//! - The task dispatcher and the view state controller
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but any front end implementing
//! [`PresentationSurface`] can drive a [`ViewController`].

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod display;
pub mod model;
pub mod provider;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use controller::{PresentationSurface, StalePolicy, ViewController, ViewState};
pub use dispatch::{Dispatcher, InteractionHandle, InteractionLoop, interaction_queue};
pub use display::{DetailKind, WeatherView};
pub use model::{LocationReading, UnitPreference, WeatherReading};
pub use provider::{LocationProvider, ProviderError, WeatherProvider};
pub use resolver::{FetchChain, LocationResolver, Resolvers, WeatherMode, WeatherResolver};
