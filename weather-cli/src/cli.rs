use std::{io, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use weather_core::{Config, UnitPreference, ViewState};

use crate::{
    app,
    surface::{JsonSurface, TerminalSurface},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for where you are, or anywhere")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a weatherapi.com key and default unit.
    Configure,

    /// Print the current weather once and exit.
    Show {
        /// City name or "lat,lon". Uses IP geolocation when absent.
        query: Option<String>,

        /// Show imperial units regardless of the configured default.
        #[arg(long)]
        fahrenheit: bool,

        /// Print the reading as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactive session (the default).
    Run,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Run) {
            Command::Configure => configure(),
            Command::Show { query, fahrenheit, json } => {
                let config = Config::load()?;
                let unit =
                    if fahrenheit { UnitPreference::Fahrenheit } else { config.default_unit };

                let query = query.as_deref();
                let state = if json {
                    app::show_once(JsonSurface::new(io::stdout()), &config, query, unit).await?
                } else {
                    app::show_once(TerminalSurface::new(io::stdout()), &config, query, unit).await?
                };

                Ok(match state {
                    ViewState::Showing(..) => ExitCode::SUCCESS,
                    _ => ExitCode::FAILURE,
                })
            }
            Command::Run => {
                let config = Config::load()?;
                app::run_interactive(&config).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let key = Password::new("weatherapi.com API key (empty for demo mode):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(key);

    let units = vec![UnitPreference::Celsius, UnitPreference::Fahrenheit];
    let start = units.iter().position(|u| *u == config.default_unit).unwrap_or(0);
    config.default_unit = Select::new("Default unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read default unit")?;

    config.save()?;

    let path = Config::config_file_path()?;
    if config.is_demo() {
        println!("Saved {} (demo mode, no API key).", path.display());
    } else {
        println!("Saved {}.", path.display());
    }

    Ok(ExitCode::SUCCESS)
}
