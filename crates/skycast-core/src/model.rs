// ── Domain types ──
//
// Field names on the wire follow the stored favorites record
// (`city`, `temperature`, `favorite`, ...) so existing snapshots load as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the provider icon code in icon URL templates.
pub const ICON_PLACEHOLDER: &str = "{icon}";

/// One tracked location: current conditions plus an optional daily forecast.
///
/// `name` is the sole equality key within a [`CityStore`](crate::CityStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Name as returned by the provider (case-sensitive).
    #[serde(rename = "city")]
    pub name: String,
    #[serde(rename = "temperature")]
    pub temperature_celsius: i32,
    pub condition: String,
    #[serde(rename = "favorite")]
    pub is_favorite: bool,
    pub icon: IconRef,
    /// At most five future days; `None` until the first successful fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<ForecastDay>>,
}

/// Summary of one future calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Provider timestamp, kept verbatim for display formatting.
    #[serde(rename = "date")]
    pub source_timestamp: String,
    #[serde(rename = "temperature")]
    pub temperature_celsius: i32,
    pub condition: String,
    pub icon: IconRef,
}

/// Reference to a displayable icon resource (a URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(String);

impl IconRef {
    /// Expand `template` with a provider icon code, e.g. `01d`.
    pub fn from_code(template: &str, code: &str) -> Self {
        Self(template.replace(ICON_PLACEHOLDER, code))
    }

    pub fn url(&self) -> &str {
        &self.0
    }

    /// Recover the provider icon code from the URL's last path segment.
    ///
    /// `https://openweathermap.org/img/wn/10n@2x.png` → `10n`.
    pub fn code(&self) -> Option<&str> {
        let segment = self.0.rsplit('/').next()?;
        let code = segment.split(['@', '.']).next()?;
        (!code.is_empty()).then_some(code)
    }
}

impl From<String> for IconRef {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Round a provider temperature to whole degrees, halves toward +∞.
///
/// `18.5 → 19`, `-2.5 → -2`. Non-finite input rounds to 0.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn round_celsius(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    // Saturating float→int cast; real temperatures are far from the bounds.
    (value + 0.5).floor() as i32
}
