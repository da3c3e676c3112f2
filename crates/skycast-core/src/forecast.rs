// ── Forecast reduction ──
//
// The provider returns readings at 3-hour intervals. The dashboard shows
// one reading per future calendar day: the first one seen for that date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono::NaiveDateTime;

use crate::error::FetchError;
use crate::model::{ForecastDay, IconRef, round_celsius};

/// Maximum number of days kept after reduction.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Provider timestamp layout of `dt_txt`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One forecast reading after validation, ready for reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastEntry {
    /// Calendar date of the reading.
    pub date: NaiveDate,
    /// Provider timestamp, carried through to [`ForecastDay::source_timestamp`].
    pub timestamp: String,
    pub temperature: f64,
    pub condition: String,
    pub icon: IconRef,
}

impl RawForecastEntry {
    /// Validate a provider entry and expand its icon code with `icon_url_template`.
    pub fn from_api(
        entry: &skycast_api::ForecastEntry,
        icon_url_template: &str,
    ) -> Result<Self, FetchError> {
        let conditions = entry.primary().ok_or_else(|| {
            FetchError::parse(format!("forecast entry {} has no conditions", entry.dt_txt))
        })?;
        let date = NaiveDateTime::parse_from_str(&entry.dt_txt, TIMESTAMP_FORMAT)
            .map_err(|e| {
                FetchError::parse(format!("bad forecast timestamp {:?}: {e}", entry.dt_txt))
            })?
            .date();

        Ok(Self {
            date,
            timestamp: entry.dt_txt.clone(),
            temperature: entry.main.temp,
            condition: conditions.main.clone(),
            icon: IconRef::from_code(icon_url_template, &conditions.icon),
        })
    }
}

/// Collapse readings into at most [`MAX_FORECAST_DAYS`] days after `today`.
///
/// The first reading per date wins. Today is skipped, and so are earlier
/// dates: a forecast only ever lists days still to come, so a past date
/// means a stale payload. Output is in ascending date order whatever the
/// input order.
pub fn reduce(entries: &[RawForecastEntry], today: NaiveDate) -> Vec<ForecastDay> {
    let mut days: BTreeMap<NaiveDate, &RawForecastEntry> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.date > today) {
        days.entry(entry.date).or_insert(entry);
    }

    days.into_values()
        .take(MAX_FORECAST_DAYS)
        .map(|entry| ForecastDay {
            source_timestamp: entry.timestamp.clone(),
            temperature_celsius: round_celsius(entry.temperature),
            condition: entry.condition.clone(),
            icon: entry.icon.clone(),
        })
        .collect()
}
