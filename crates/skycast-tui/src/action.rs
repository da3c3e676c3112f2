//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use skycast_core::{City, FetchError};

use crate::theme::ThemeMode;

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
}

/// A short-lived toast in the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,

    // ── Overlays ──
    ToggleHelp,
    DismissError,
    Notify(Notification),
    DismissNotification,

    // ── Search ──
    OpenSearch,
    CloseSearch,
    SearchSubmit,
    /// Completion of a spawned fetch, success or failure.
    WeatherFetched(Result<City, FetchError>),

    // ── Collection ──
    ToggleFavorite(String),
    ToggleFavoritesOnly,
    /// Cities currently visible, in display order.
    CitiesUpdated(Arc<Vec<City>>),

    // ── Appearance ──
    ToggleTheme,
    ThemeChanged(ThemeMode),
}
