// ── Runtime provider configuration ──
//
// Describes *how* to reach the weather provider. Carries the credential
// and transport tuning but never touches disk: `skycast-config` builds
// one of these and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default API root (version segment included).
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Default icon URL pattern; `{icon}` is replaced with the provider code.
pub const DEFAULT_ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}@2x.png";

/// Configuration for talking to the weather provider.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// API root, e.g. `https://api.openweathermap.org/data/2.5`.
    pub base_url: Url,
    /// Static key sent as the `appid` query parameter.
    pub api_key: SecretString,
    /// Icon URL pattern containing `{icon}`.
    pub icon_url_template: String,
    /// Optional per-request timeout. `None` imposes no limit.
    pub timeout: Option<Duration>,
}

impl WeatherConfig {
    /// Config against the public provider with default icon hosting.
    pub fn with_api_key(api_key: SecretString) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            api_key,
            icon_url_template: DEFAULT_ICON_URL_TEMPLATE.to_owned(),
            timeout: None,
        })
    }
}
