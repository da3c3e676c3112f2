// ── Weather fetcher ──
//
// Turns a city name into a `City`: current conditions first, then the
// forecast, reduced to one reading per future day. The second call is
// never issued if the first one fails.

use chrono::{Local, NaiveDate};
use tracing::{debug, instrument};

use skycast_api::{TransportConfig, WeatherClient};

use crate::config::WeatherConfig;
use crate::error::FetchError;
use crate::forecast::{RawForecastEntry, reduce};
use crate::model::{City, IconRef, round_celsius};

/// Trim user input into a query, or `None` when nothing is left.
pub fn normalize_query(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Resolves city names against the weather provider.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    client: WeatherClient,
    icon_url_template: String,
}

impl WeatherFetcher {
    /// Build a fetcher and its HTTP client from `config`.
    pub fn new(config: &WeatherConfig) -> Result<Self, FetchError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = WeatherClient::new(
            config.base_url.clone(),
            config.api_key.clone(),
            &transport,
        )?;
        Ok(Self::with_client(client, config.icon_url_template.clone()))
    }

    /// Wrap an existing client.
    pub fn with_client(client: WeatherClient, icon_url_template: impl Into<String>) -> Self {
        Self {
            client,
            icon_url_template: icon_url_template.into(),
        }
    }

    /// Fetch `city` relative to the local calendar date.
    ///
    /// `city` should already be trimmed and non-empty (see [`normalize_query`]).
    pub async fn fetch(&self, city: &str) -> Result<City, FetchError> {
        self.fetch_on(city, Local::now().date_naive()).await
    }

    /// Fetch `city`, treating `today` as the current date for the forecast.
    #[instrument(skip(self), fields(base = %self.client.base_url()))]
    pub async fn fetch_on(&self, city: &str, today: NaiveDate) -> Result<City, FetchError> {
        let current = self
            .client
            .current(city)
            .await
            .map_err(|e| FetchError::from_current(e, city))?;
        let conditions = current
            .primary()
            .ok_or_else(|| FetchError::parse("current conditions missing `weather` entry"))?;

        let forecast = self.client.forecast(city).await?;
        let entries = forecast
            .list
            .iter()
            .map(|entry| RawForecastEntry::from_api(entry, &self.icon_url_template))
            .collect::<Result<Vec<_>, _>>()?;
        let days = reduce(&entries, today);
        debug!(
            city = %current.name,
            readings = entries.len(),
            days = days.len(),
            "weather fetched"
        );

        Ok(City {
            temperature_celsius: round_celsius(current.main.temp),
            condition: conditions.main.clone(),
            icon: IconRef::from_code(&self.icon_url_template, &conditions.icon),
            is_favorite: false,
            forecast: Some(days),
            name: current.name,
        })
    }
}
