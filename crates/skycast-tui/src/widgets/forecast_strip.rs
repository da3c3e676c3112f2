//! Five-cell daily forecast strip: label row, glyph row, temperature row.

use chrono::NaiveDateTime;
use ratatui::text::{Line, Span};
use skycast_core::ForecastDay;

use crate::theme::Palette;
use crate::widgets::glyph;

/// Width of one day cell, wide enough for "Tomorrow" plus a gap.
pub const CELL_WIDTH: usize = 9;

/// Header for the `index`-th day: `Tomorrow`, then weekday abbreviations.
pub fn day_label(index: usize, day: &ForecastDay) -> String {
    if index == 0 {
        return "Tomorrow".into();
    }
    NaiveDateTime::parse_from_str(&day.source_timestamp, "%Y-%m-%d %H:%M:%S").map_or_else(
        |_| day.source_timestamp.chars().take(CELL_WIDTH - 1).collect(),
        |ts| ts.format("%a").to_string(),
    )
}

fn cell(text: &str) -> String {
    format!("{text:^CELL_WIDTH$}")
}

/// Three lines rendering `days` side by side.
pub fn lines<'a>(days: &[ForecastDay], palette: &Palette) -> Vec<Line<'a>> {
    let labels = days
        .iter()
        .enumerate()
        .map(|(i, d)| Span::styled(cell(&day_label(i, d)), palette.subtitle()));
    let glyphs = days
        .iter()
        .map(|d| Span::styled(cell(glyph::for_icon(&d.icon)), palette.title_style()));
    let temps = days.iter().map(|d| {
        Span::styled(
            cell(&format!("{}°C", d.temperature_celsius)),
            palette.temperature(),
        )
    });

    vec![
        Line::from(labels.collect::<Vec<_>>()),
        Line::from(glyphs.collect::<Vec<_>>()),
        Line::from(temps.collect::<Vec<_>>()),
    ]
}
