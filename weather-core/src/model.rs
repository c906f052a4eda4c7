use serde::{Deserialize, Serialize};

/// Current conditions for one place, exactly as the weather provider reported them.
///
/// Metric and imperial fields are both filled by the provider; nothing here converts
/// between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub region: String,
    pub country: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub feels_like_c: f64,
    pub feels_like_f: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub wind_mph: f64,
    pub condition: String,
    pub condition_icon: String,
    pub uv: f64,
    pub last_updated: String,
}

impl WeatherReading {
    /// Fixed reading returned while no API key is configured.
    pub fn demo() -> Self {
        Self {
            city: "Demo City".to_string(),
            region: "Demo Region".to_string(),
            country: "DC".to_string(),
            temp_c: 22.5,
            temp_f: 72.5,
            feels_like_c: 23.0,
            feels_like_f: 73.4,
            humidity: 65,
            wind_kph: 15.0,
            wind_mph: 9.3,
            condition: "Partly Cloudy".to_string(),
            condition_icon: "//cdn.weatherapi.com/weather/64x64/day/116.png".to_string(),
            uv: 5.0,
            last_updated: "2024-01-01 12:00".to_string(),
        }
    }
}

/// Location derived from the caller's IP address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationReading {
    pub city: String,
    pub region: String,
    pub country: String,
    /// `"lat,lon"`, empty when the provider did not send one.
    pub coordinates: String,
}

impl LocationReading {
    /// Query string handed to the weather provider for this location.
    pub fn query(&self) -> &str {
        &self.city
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Celsius,
    Fahrenheit,
}

impl UnitPreference {
    pub fn toggle(self) -> Self {
        match self {
            UnitPreference::Celsius => UnitPreference::Fahrenheit,
            UnitPreference::Fahrenheit => UnitPreference::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnitPreference::Celsius => "C",
            UnitPreference::Fahrenheit => "F",
        }
    }
}

impl std::fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UnitPreference::Celsius => "celsius",
            UnitPreference::Fahrenheit => "fahrenheit",
        })
    }
}
