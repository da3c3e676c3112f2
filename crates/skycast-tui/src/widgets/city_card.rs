//! One city card: header, current conditions, favorite star, forecast strip.
//!
//! ```text
//! ╭ Paris (Today) ─────────────────────────── ★ ╮
//! │ ☀  18°C                                     │
//! │ Clear                                       │
//! │                                             │
//! │ Tomorrow   Mon      Tue      Wed      Thu   │
//! │    ☁        ☂        ☀        ☀        ☁    │
//! │  15°C     16°C     21°C     22°C     19°C   │
//! ╰─────────────────────────────────────────────╯
//! ```

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use skycast_core::City;

use crate::theme::Palette;
use crate::widgets::{forecast_strip, glyph};

/// Card width including borders: five forecast cells plus padding.
pub const CARD_WIDTH: u16 = 48;
/// Card height including borders.
pub const CARD_HEIGHT: u16 = 9;

pub fn star(favorite: bool) -> &'static str {
    if favorite { "★" } else { "☆" }
}

/// Text lines inside the card border.
pub fn body<'a>(city: &'a City, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{}  ", glyph::for_icon(&city.icon)), palette.title_style()),
            Span::styled(format!("{}°C", city.temperature_celsius), palette.temperature()),
        ]),
        Line::from(Span::styled(city.condition.as_str(), palette.subtitle())),
    ];
    if let Some(days) = city.forecast.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(""));
        lines.extend(forecast_strip::lines(days, palette));
    }
    lines
}

pub fn render(frame: &mut Frame, area: Rect, city: &City, palette: &Palette, selected: bool) {
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} (Today) ", city.name),
            palette.title_style(),
        )))
        .title(
            Line::from(Span::styled(
                format!(" {} ", star(city.is_favorite)),
                palette.star(city.is_favorite),
            ))
            .alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if selected {
            palette.border_focused()
        } else {
            palette.border_default()
        })
        .style(ratatui::style::Style::default().bg(palette.surface));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(body(city, palette)), inner);
}
