// ── Core error types ──
//
// User-facing errors from skycast-core. Consumers never see HTTP status
// codes or serde messages directly: `From<skycast_api::Error>` folds the
// transport layer into the fetch taxonomy.

use thiserror::Error;

/// Failure of a weather fetch. Every variant carries a displayable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider rejected the city name.
    #[error("City not found: {city}")]
    CityNotFound { city: String, message: String },

    /// Network failure or non-success status.
    #[error("Failed to fetch weather: {message}")]
    FetchFailed { message: String },

    /// The payload did not have the expected shape.
    #[error("Unexpected weather data: {message}")]
    ParseFailed { message: String },
}

impl FetchError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::ParseFailed {
            message: message.into(),
        }
    }

    /// Classify an error from the current-conditions call, where a provider
    /// rejection means the name itself is unknown.
    pub(crate) fn from_current(err: skycast_api::Error, city: &str) -> Self {
        if err.is_unknown_city() {
            let message = match err {
                skycast_api::Error::Provider { message, .. } => message,
                other => other.to_string(),
            };
            return Self::CityNotFound {
                city: city.to_owned(),
                message,
            };
        }
        err.into()
    }
}

impl From<skycast_api::Error> for FetchError {
    fn from(err: skycast_api::Error) -> Self {
        match err {
            skycast_api::Error::Deserialization { message, body: _ } => {
                Self::ParseFailed { message }
            }
            skycast_api::Error::Provider { status, message } => Self::FetchFailed {
                message: format!("provider returned HTTP {status}: {message}"),
            },
            skycast_api::Error::Transport(e) => Self::FetchFailed {
                message: error_chain(&e),
            },
            skycast_api::Error::InvalidUrl(e) => Self::FetchFailed {
                message: format!("invalid provider URL: {e}"),
            },
            skycast_api::Error::ClientSetup(message) => Self::FetchFailed { message },
        }
    }
}

/// `err` followed by its sources, joined with `": "`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Failure to write the favorites snapshot.
#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("failed to serialize favorites: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write favorites: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_not_found_becomes_city_not_found() {
        let err = skycast_api::Error::Provider {
            status: 404,
            message: "city not found".into(),
        };
        let mapped = FetchError::from_current(err, "Notacity123");
        assert_eq!(
            mapped,
            FetchError::CityNotFound {
                city: "Notacity123".into(),
                message: "city not found".into(),
            }
        );
        assert_eq!(mapped.to_string(), "City not found: Notacity123");
    }

    #[test]
    fn current_server_error_is_fetch_failed() {
        let err = skycast_api::Error::Provider {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert!(matches!(
            FetchError::from_current(err, "Paris"),
            FetchError::FetchFailed { .. }
        ));
    }

    #[test]
    fn forecast_not_found_is_fetch_failed() {
        let err = skycast_api::Error::Provider {
            status: 404,
            message: "city not found".into(),
        };
        assert!(matches!(
            FetchError::from(err),
            FetchError::FetchFailed { .. }
        ));
    }

    #[test]
    fn deserialization_is_parse_failed() {
        let err = skycast_api::Error::Deserialization {
            message: "missing field `main`".into(),
            body: "{}".into(),
        };
        assert_eq!(
            FetchError::from(err),
            FetchError::ParseFailed {
                message: "missing field `main`".into()
            }
        );
    }
}
