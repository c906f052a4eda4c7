//! Text for the weather view, in whichever unit is selected.

use crate::model::{UnitPreference, WeatherReading};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    FeelsLike,
    Humidity,
    Wind,
    Uv,
}

impl DetailKind {
    /// Display order.
    pub const ALL: [DetailKind; 4] =
        [DetailKind::FeelsLike, DetailKind::Humidity, DetailKind::Wind, DetailKind::Uv];

    pub fn label(&self) -> &'static str {
        match self {
            DetailKind::FeelsLike => "Feels Like",
            DetailKind::Humidity => "Humidity",
            DetailKind::Wind => "Wind",
            DetailKind::Uv => "UV Index",
        }
    }

    pub fn value(&self, reading: &WeatherReading, unit: UnitPreference) -> String {
        match (self, unit) {
            (DetailKind::FeelsLike, UnitPreference::Celsius) => {
                format!("{:.0}°C", reading.feels_like_c)
            }
            (DetailKind::FeelsLike, UnitPreference::Fahrenheit) => {
                format!("{:.0}°F", reading.feels_like_f)
            }
            (DetailKind::Humidity, _) => format!("{}%", reading.humidity),
            (DetailKind::Wind, UnitPreference::Celsius) => format!("{:.0} km/h", reading.wind_kph),
            (DetailKind::Wind, UnitPreference::Fahrenheit) => {
                format!("{:.0} mph", reading.wind_mph)
            }
            (DetailKind::Uv, _) => reading.uv.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub headline: String,
    pub subtitle: String,
    pub temperature: String,
    pub unit: &'static str,
    pub condition: String,
    pub details: Vec<(DetailKind, String)>,
    pub updated: String,
}

impl WeatherView {
    pub fn new(reading: &WeatherReading, unit: UnitPreference) -> Self {
        let temp = match unit {
            UnitPreference::Celsius => reading.temp_c,
            UnitPreference::Fahrenheit => reading.temp_f,
        };

        Self {
            headline: reading.city.clone(),
            subtitle: format!("{}, {}", reading.region, reading.country),
            temperature: format!("{temp:.0}°"),
            unit: unit.symbol(),
            condition: reading.condition.clone(),
            details: DetailKind::ALL.iter().map(|k| (*k, k.value(reading, unit))).collect(),
            updated: format!("Updated: {}", reading.last_updated),
        }
    }

    pub fn detail(&self, kind: DetailKind) -> Option<&str> {
        self.details.iter().find(|(k, _)| *k == kind).map(|(_, v)| v.as_str())
    }
}
