use std::io::Write;

use crossterm::style::{Color, Stylize};
use weather_core::{PresentationSurface, UnitPreference, WeatherReading, WeatherView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    fn accent(&self) -> Color {
        match self {
            Theme::Dark => Color::Cyan,
            Theme::Light => Color::DarkBlue,
        }
    }

    fn muted(&self) -> Color {
        match self {
            Theme::Dark => Color::DarkGrey,
            Theme::Light => Color::Grey,
        }
    }

    fn alert(&self) -> Color {
        match self {
            Theme::Dark => Color::Yellow,
            Theme::Light => Color::DarkRed,
        }
    }
}

/// Human-readable rendering onto a terminal (or any writer).
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: W,
    theme: Theme,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, theme: Theme::default() }
    }

    #[cfg(test)]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    fn write_weather(
        &mut self,
        reading: &WeatherReading,
        unit: UnitPreference,
    ) -> std::io::Result<()> {
        let view = WeatherView::new(reading, unit);
        let theme = self.theme;

        writeln!(self.out)?;
        writeln!(self.out, "{}", view.headline.as_str().with(theme.accent()).bold())?;
        writeln!(self.out, "{}", view.subtitle.as_str().with(theme.muted()))?;
        let temperature = view.temperature.as_str().bold();
        writeln!(self.out, "{}{}  {}", temperature, view.unit, view.condition)?;

        for pair in view.details.chunks(2) {
            let line: Vec<String> = pair
                .iter()
                .map(|(kind, value)| format!("{:<11} {:<9}", format!("{}:", kind.label()), value))
                .collect();
            writeln!(self.out, "  {}", line.join(" ").trim_end())?;
        }

        writeln!(self.out, "{}", view.updated.as_str().with(theme.muted()))?;
        self.out.flush()
    }

    fn write_error(&mut self, message: &str) -> std::io::Result<()> {
        let theme = self.theme;
        writeln!(self.out)?;
        for line in message.lines() {
            writeln!(self.out, "{} {}", "!".with(theme.alert()).bold(), line)?;
        }
        writeln!(self.out, "{}", "Type :retry to try again.".with(theme.muted()))?;
        self.out.flush()
    }

    fn report(result: std::io::Result<()>) {
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to write to terminal");
        }
    }
}

impl<W: Write> PresentationSurface for TerminalSurface<W> {
    fn render_loading(&mut self) {
        let line = format!("{}", "Loading...".with(self.theme.muted()));
        Self::report(writeln!(self.out, "{line}").and_then(|_| self.out.flush()));
    }

    fn render_weather(&mut self, reading: &WeatherReading, unit: UnitPreference) {
        let result = self.write_weather(reading, unit);
        Self::report(result);
    }

    fn render_error(&mut self, message: &str) {
        let result = self.write_error(message);
        Self::report(result);
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        tracing::debug!(theme = ?self.theme, "theme switched");
    }
}

/// Machine-readable rendering for `show --json`: only settled views produce output.
#[derive(Debug)]
pub struct JsonSurface<W> {
    out: W,
}

impl<W: Write> JsonSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> PresentationSurface for JsonSurface<W> {
    fn render_loading(&mut self) {}

    fn render_weather(&mut self, reading: &WeatherReading, unit: UnitPreference) {
        let doc = serde_json::json!({ "unit": unit, "reading": reading });
        if let Err(err) = writeln!(self.out, "{doc:#}") {
            tracing::warn!(error = %err, "failed to write JSON");
        }
    }

    fn render_error(&mut self, message: &str) {
        let doc = serde_json::json!({ "error": message });
        if let Err(err) = writeln!(self.out, "{doc:#}") {
            tracing::warn!(error = %err, "failed to write JSON");
        }
    }
}
