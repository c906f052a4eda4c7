//! Interaction loop: user input and fetch completions, both handled on one task.

use std::{io, sync::Arc};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_core::{
    Config, Dispatcher, InteractionLoop, PresentationSurface, Resolvers, UnitPreference,
    ViewController, ViewState, interaction_queue,
};

use crate::surface::TerminalSurface;

/// A parsed line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    UseCurrentLocation,
    ToggleUnit,
    ToggleTheme,
    Retry,
    Help,
    Quit,
    /// An unrecognised `:command`.
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Input::Search(line.to_string());
        };

        match command.trim().to_lowercase().as_str() {
            "loc" | "location" => Input::UseCurrentLocation,
            "unit" | "u" => Input::ToggleUnit,
            "theme" | "t" => Input::ToggleTheme,
            "retry" | "r" => Input::Retry,
            "help" | "h" | "?" => Input::Help,
            "quit" | "q" | "exit" => Input::Quit,
            other => Input::Unknown(other.to_string()),
        }
    }
}

const HELP: &str = "\
Type a city name (or \"lat,lon\") to search.
  :loc     weather for your current location
  :unit    switch between Celsius and Fahrenheit
  :theme   switch between dark and light output
  :retry   repeat the last failed lookup
  :quit    leave";

fn build<P: PresentationSurface + 'static>(
    surface: P,
    config: &Config,
    unit: UnitPreference,
) -> Result<(ViewController<P>, InteractionLoop<ViewController<P>>)> {
    let resolvers = Resolvers::from_config(config).context("Failed to set up HTTP client")?;
    if resolvers.weather.is_demo() {
        tracing::info!("no weatherapi.com key configured, running in demo mode");
    }

    let (handle, queue) = interaction_queue();
    let controller = ViewController::new(
        surface,
        Arc::new(resolvers),
        Dispatcher::new(handle),
        unit,
        config.stale_results,
    );

    Ok((controller, queue))
}

/// Apply one input. Returns `false` when the user asked to leave.
fn handle_input<P: PresentationSurface + 'static>(
    controller: &mut ViewController<P>,
    input: Input,
) -> bool {
    match input {
        Input::Search(text) => {
            controller.on_search(&text);
        }
        Input::UseCurrentLocation => controller.on_use_current_location(),
        Input::ToggleUnit => controller.on_toggle_unit(),
        Input::ToggleTheme => controller.on_toggle_theme(),
        Input::Retry => controller.on_retry(),
        Input::Help => println!("{HELP}"),
        Input::Unknown(cmd) => println!("Unknown command ':{cmd}'. Type :help for a list."),
        Input::Quit => return false,
    }
    true
}

pub async fn run_interactive(config: &Config) -> Result<()> {
    let (mut controller, mut queue) =
        build(TerminalSurface::new(io::stdout()), config, config.default_unit)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    controller.on_start();

    loop {
        tokio::select! {
            Some(job) = queue.next_job() => job(&mut controller),
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                if !handle_input(&mut controller, Input::parse(&line)) {
                    break;
                }
            }
        }
    }

    // In-flight fetches are abandoned when the runtime shuts down.
    Ok(())
}

/// Run a single chain to completion and return where the view settled.
pub async fn show_once<P: PresentationSurface + 'static>(
    surface: P,
    config: &Config,
    query: Option<&str>,
    unit: UnitPreference,
) -> Result<ViewState> {
    let (mut controller, mut queue) = build(surface, config, unit)?;

    match query {
        Some(text) => {
            if !controller.on_search(text) {
                anyhow::bail!("Nothing to search for: the query is blank");
            }
        }
        None => controller.on_use_current_location(),
    }

    while matches!(controller.state(), ViewState::Loading) {
        if !queue.run_next(&mut controller).await {
            break;
        }
    }

    Ok(controller.state().clone())
}
