// ── Wire types for the provider's JSON payloads ──
//
// Only the fields SkyCast reads are modelled; serde ignores the rest.

use serde::{Deserialize, Serialize};

/// Response of `GET /weather`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Canonical city name as resolved by the provider.
    pub name: String,
    pub main: Measurements,
    /// Condition list; the first entry is the primary condition.
    #[serde(default)]
    pub weather: Vec<Conditions>,
}

/// Response of `GET /forecast`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// 3-hour interval entries in chronological order.
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp of the interval.
    pub dt: i64,
    /// Same instant as `"YYYY-MM-DD HH:MM:SS"`.
    pub dt_txt: String,
    pub main: Measurements,
    #[serde(default)]
    pub weather: Vec<Conditions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurements {
    /// Temperature in the requested unit system (Celsius for `metric`).
    pub temp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conditions {
    /// Short category, e.g. `"Clear"`, `"Rain"`.
    pub main: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Icon code, e.g. `"01d"`.
    pub icon: String,
}

impl CurrentWeather {
    pub fn primary(&self) -> Option<&Conditions> {
        self.weather.first()
    }
}

impl ForecastEntry {
    pub fn primary(&self) -> Option<&Conditions> {
        self.weather.first()
    }
}

/// Error body, e.g. `{"cod": "404", "message": "city not found"}`.
///
/// `cod` is a string on some endpoints and a number on others.
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderError {
    #[serde(default)]
    pub message: Option<String>,
}
