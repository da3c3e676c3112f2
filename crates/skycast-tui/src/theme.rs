//! Light and dark palettes plus semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};
use skycast_config::ThemePreference;

// ── Mode ──────────────────────────────────────────────────────────────

/// Active colour scheme. Starts from the platform preference, then only
/// changes when the user toggles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT,
            Self::Dark => &DARK,
        }
    }

    /// Label of the toggle, naming the mode it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Dark Mode",
            Self::Dark => "Light Mode",
        }
    }

    /// Resolve the configured preference, consulting `colorfgbg` for `System`.
    pub fn resolve(preference: ThemePreference, colorfgbg: Option<&str>) -> Self {
        match preference {
            ThemePreference::Light => Self::Light,
            ThemePreference::Dark => Self::Dark,
            ThemePreference::System => mode_from_colorfgbg(colorfgbg),
        }
    }
}

/// Interpret the `COLORFGBG` convention (`"fg;bg"` or `"fg;default;bg"`).
///
/// Background indices 7 and 9-15 are light; everything else, including an
/// unset or unparsable value, is treated as dark.
pub fn mode_from_colorfgbg(value: Option<&str>) -> ThemeMode {
    let bg = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match bg {
        Some(7 | 9..=15) => ThemeMode::Light,
        _ => ThemeMode::Dark,
    }
}

// ── Palettes ──────────────────────────────────────────────────────────

/// Colours for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub highlight: Color,
    pub star: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

pub const DARK: Palette = Palette {
    bg: Color::Rgb(3, 7, 18),         // #030712
    surface: Color::Rgb(31, 41, 55),  // #1f2937
    text: Color::Rgb(243, 244, 246),  // #f3f4f6
    muted: Color::Rgb(156, 163, 175), // #9ca3af
    border: Color::Rgb(55, 65, 81),   // #374151
    accent: Color::Rgb(59, 130, 246), // #3b82f6
    highlight: Color::Rgb(96, 165, 250),
    star: Color::Rgb(250, 204, 21), // #facc15
    success: Color::Rgb(74, 222, 128),
    warning: Color::Rgb(250, 204, 21),
    error: Color::Rgb(248, 113, 113),
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(249, 250, 251),     // #f9fafb
    surface: Color::Rgb(255, 255, 255),
    text: Color::Rgb(17, 24, 39),      // #111827
    muted: Color::Rgb(107, 114, 128),  // #6b7280
    border: Color::Rgb(209, 213, 219), // #d1d5db
    accent: Color::Rgb(37, 99, 235),   // #2563eb
    highlight: Color::Rgb(29, 78, 216),
    star: Color::Rgb(202, 138, 4),
    success: Color::Rgb(22, 163, 74),
    warning: Color::Rgb(202, 138, 4),
    error: Color::Rgb(220, 38, 38),
};

// ── Semantic Styles ───────────────────────────────────────────────────

impl Palette {
    /// Whole-screen background.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    /// Title text for blocks/panels.
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn subtitle(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Border for the selected card or focused input.
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    pub fn border_default(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Temperatures.
    pub fn temperature(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn star(&self, favorite: bool) -> Style {
        if favorite {
            Style::default().fg(self.star)
        } else {
            Style::default().fg(self.muted)
        }
    }

    /// Toggle button that is switched on.
    pub fn toggle_active(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.star)
            .add_modifier(Modifier::BOLD)
    }

    pub fn toggle_inactive(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    /// Search submit button.
    pub fn button(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint text (e.g., "q quit  ? help").
    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Key hint key character.
    pub fn key_hint_key(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorfgbg_light_backgrounds() {
        assert_eq!(mode_from_colorfgbg(Some("0;15")), ThemeMode::Light);
        assert_eq!(mode_from_colorfgbg(Some("0;default;7")), ThemeMode::Light);
    }

    #[test]
    fn colorfgbg_dark_or_unknown() {
        assert_eq!(mode_from_colorfgbg(Some("15;0")), ThemeMode::Dark);
        assert_eq!(mode_from_colorfgbg(Some("garbage")), ThemeMode::Dark);
        assert_eq!(mode_from_colorfgbg(None), ThemeMode::Dark);
    }

    #[test]
    fn explicit_preference_wins_over_detection() {
        assert_eq!(
            ThemeMode::resolve(ThemePreference::Dark, Some("0;15")),
            ThemeMode::Dark
        );
        assert_eq!(
            ThemeMode::resolve(ThemePreference::System, Some("0;15")),
            ThemeMode::Light
        );
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggle_label(), "Light Mode");
    }
}
