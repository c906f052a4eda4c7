//! View state machine.
//!
//! [`ViewController`] owns what is on screen. It lives on the interaction context,
//! starts fetch chains through the [`Dispatcher`] and is the only thing that mutates
//! [`ViewState`], the unit preference or the current reading.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    dispatch::Dispatcher,
    model::{UnitPreference, WeatherReading},
    resolver::{FETCH_FAILED, FetchChain, Resolvers},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Showing(WeatherReading, UnitPreference),
    Failed(String),
}

/// What the user sees. Every render fully replaces the previous one.
pub trait PresentationSurface {
    fn render_loading(&mut self);
    fn render_weather(&mut self, reading: &WeatherReading, unit: UnitPreference);
    fn render_error(&mut self, message: &str);

    /// Appearance is the surface's own business.
    fn toggle_theme(&mut self) {}
}

/// How to treat a completion that belongs to a fetch which has since been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Apply every completion; whichever lands last wins.
    #[default]
    Accept,
    /// Only the most recently started fetch may change the view.
    Discard,
}

pub struct ViewController<P> {
    state: ViewState,
    unit: UnitPreference,
    current: Option<WeatherReading>,
    last_chain: Option<FetchChain>,
    generation: u64,
    policy: StalePolicy,
    surface: P,
    resolvers: Arc<Resolvers>,
    dispatcher: Dispatcher<Self>,
}

impl<P: PresentationSurface + 'static> ViewController<P> {
    pub fn new(
        surface: P,
        resolvers: Arc<Resolvers>,
        dispatcher: Dispatcher<Self>,
        unit: UnitPreference,
        policy: StalePolicy,
    ) -> Self {
        Self {
            state: ViewState::Loading,
            unit,
            current: None,
            last_chain: None,
            generation: 0,
            policy,
            surface,
            resolvers,
            dispatcher,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn unit(&self) -> UnitPreference {
        self.unit
    }

    pub fn current_reading(&self) -> Option<&WeatherReading> {
        self.current.as_ref()
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn dispatcher(&self) -> &Dispatcher<Self> {
        &self.dispatcher
    }

    pub fn on_start(&mut self) {
        self.enter_loading(FetchChain::ByLocation);
    }

    pub fn on_use_current_location(&mut self) {
        self.enter_loading(FetchChain::ByLocation);
    }

    /// Returns `false`, leaving everything untouched, for blank input.
    pub fn on_search(&mut self, text: &str) -> bool {
        match FetchChain::search(text) {
            Some(chain) => {
                self.enter_loading(chain);
                true
            }
            None => {
                debug!("ignoring blank search");
                false
            }
        }
    }

    pub fn on_toggle_unit(&mut self) {
        self.toggle_unit();
    }

    pub fn on_toggle_theme(&mut self) {
        self.surface.toggle_theme();
    }

    pub fn on_retry(&mut self) {
        self.retry();
    }

    /// Show the loading view and start `chain` in the background.
    pub fn enter_loading(&mut self, chain: FetchChain) {
        self.state = ViewState::Loading;
        self.surface.render_loading();

        self.generation += 1;
        let generation = self.generation;
        debug!(generation, ?chain, "entering loading");

        let resolvers = self.resolvers.clone();
        let task_chain = chain.clone();
        self.last_chain = Some(chain);

        self.dispatcher.run(
            async move { resolvers.run(&task_chain).await },
            move |controller: &mut Self, result| controller.finish(generation, result),
        );
    }

    fn finish(&mut self, generation: u64, result: Option<WeatherReading>) {
        if self.policy == StalePolicy::Discard && generation != self.generation {
            debug!(generation, latest = self.generation, "discarding stale completion");
            return;
        }

        match result {
            Some(reading) => self.complete_with_reading(reading),
            None => self.complete_with_failure(FETCH_FAILED),
        }
    }

    pub fn complete_with_reading(&mut self, reading: WeatherReading) {
        debug!(city = %reading.city, unit = %self.unit, "showing weather");
        self.surface.render_weather(&reading, self.unit);
        self.state = ViewState::Showing(reading.clone(), self.unit);
        self.current = Some(reading);
    }

    /// The stored reading survives a failure untouched.
    pub fn complete_with_failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "showing error");
        self.surface.render_error(&message);
        self.state = ViewState::Failed(message);
    }

    /// Flip the unit; re-render only while showing a reading.
    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggle();

        if let ViewState::Showing(reading, unit) = &mut self.state {
            *unit = self.unit;
            self.surface.render_weather(reading, self.unit);
        }
    }

    /// Re-run the last chain. Only meaningful from `Failed`.
    pub fn retry(&mut self) {
        if !matches!(self.state, ViewState::Failed(_)) {
            debug!("retry ignored outside of failed state");
            return;
        }

        let chain = self.last_chain.clone().unwrap_or(FetchChain::ByLocation);
        self.enter_loading(chain);
    }
}
