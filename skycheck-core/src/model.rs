use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    /// ISO country code, empty when the provider omits it.
    pub country: String,
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
    pub icon: String,
    pub description: String,
}

/// One forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub icon: String,
    pub description: String,
}

/// Everything a successful search produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub weather: WeatherSnapshot,
    /// One entry per day, oldest first.
    pub forecast: Vec<ForecastEntry>,
}
