// Weather provider HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction, the static
// `appid` credential and status/body handling. Both endpoints share the
// same query parameters, so callers issue them sequentially.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{CurrentWeather, Forecast, ProviderError};
use crate::transport::TransportConfig;

/// Unit system requested from the provider. SkyCast always works in Celsius.
const UNITS: &str = "metric";

/// Raw HTTP client for the provider's current-conditions and forecast endpoints.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl WeatherClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root including the version segment,
    /// e.g. `https://api.openweathermap.org/data/2.5`.
    pub fn new(
        base_url: Url,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, api_key))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, api_key: SecretString) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /weather?q={city}`: current conditions.
    pub async fn current(&self, city: &str) -> Result<CurrentWeather, Error> {
        let url = self.endpoint_url("weather")?;
        self.get(url, city).await
    }

    /// `GET /forecast?q={city}`: 3-hour interval forecast.
    pub async fn forecast(&self, city: &str) -> Result<Forecast, Error> {
        let url = self.endpoint_url("forecast")?;
        self.get(url, city).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build `{base}/{endpoint}`, tolerating a trailing slash on the base.
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{endpoint}"))?)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, city: &str) -> Result<T, Error> {
        // The key travels in the query string; log the bare URL only.
        debug!(city, "GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.expose_secret()),
                ("units", UNITS),
            ])
            .send()
            .await?;

        Self::parse_body(resp).await
    }

    /// Map non-success statuses to `Error::Provider`, then decode the body.
    async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                });
            trace!(status = status.as_u16(), %message, "provider rejected request");
            return Err(Error::Provider {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
