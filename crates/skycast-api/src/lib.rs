//! Async client for the OpenWeatherMap 2.5 REST surface used by SkyCast.
//!
//! Two read-only endpoints are covered, both keyed by city name and a fixed
//! metric unit system:
//!
//! - **`/weather`**: current conditions ([`CurrentWeather`]).
//! - **`/forecast`**: 3-hour interval forecast ([`Forecast`]).
//!
//! [`WeatherClient`] owns URL construction, the static `appid` credential,
//! and status/body handling. Payloads are returned as raw wire types; the
//! domain shape lives in `skycast-core`.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::WeatherClient;
pub use error::Error;
pub use models::{Conditions, CurrentWeather, Forecast, ForecastEntry, Measurements};
pub use transport::TransportConfig;
