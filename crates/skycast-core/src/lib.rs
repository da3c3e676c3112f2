//! Data layer between `skycast-api` and the terminal dashboard.
//!
//! - **[`WeatherFetcher`]**: resolves a city name into a [`City`] with two
//!   sequential provider calls (current conditions, then forecast) and hands
//!   the forecast to the reducer.
//!
//! - **[`forecast::reduce`]**: collapses 3-hour readings into at most five
//!   one-per-day [`ForecastDay`] entries, never including today.
//!
//! - **[`CityStore`]**: the ordered, name-deduplicated collection of tracked
//!   cities. Every favorite toggle rewrites the persisted snapshot before
//!   returning.
//!
//! - **[`FavoritesStore`]**: serialises the favorite subset to a single
//!   durable blob and rehydrates it on startup; corrupt or missing records
//!   read back as empty.

pub mod config;
pub mod error;
pub mod favorites;
pub mod fetcher;
pub mod forecast;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::WeatherConfig;
pub use error::{FavoritesError, FetchError};
pub use favorites::{FavoritesBackend, FavoritesStore, FileBackend, MemoryBackend};
pub use fetcher::{WeatherFetcher, normalize_query};
pub use forecast::{MAX_FORECAST_DAYS, RawForecastEntry};
pub use model::{City, ForecastDay, IconRef};
pub use store::{AddOutcome, CityStore};
