use thiserror::Error;

/// Top-level error type for the `skycast-api` crate.
///
/// `skycast-core` maps these into the fetch taxonomy shown to users.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    ///
    /// The request URL is stripped on conversion: it carries the API key.
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to build the underlying HTTP client.
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    // ── Provider ────────────────────────────────────────────────────
    /// Non-success status from the provider, with its `message` field when present.
    #[error("Provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the provider rejected the requested city name.
    ///
    /// OpenWeatherMap answers `404 city not found` for unknown names and
    /// `400 Nothing to geocode` for names it cannot interpret.
    pub fn is_unknown_city(&self) -> bool {
        matches!(self, Self::Provider { status: 400 | 404, .. })
    }

    /// Returns `true` for connection-level failures (no response received).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}
