//! City grid: one card per visible city, keyboard-selectable.
//!
//! Cards flow left to right and wrap by terminal width. The grid scrolls
//! by whole rows to keep the selected card in view.

use std::cell::Cell;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    widgets::Paragraph,
};
use skycast_core::City;

use crate::action::Action;
use crate::component::Component;
use crate::theme::ThemeMode;
use crate::widgets::city_card::{self, CARD_HEIGHT, CARD_WIDTH};

const EMPTY_MESSAGE: &str = "No cities added yet.";

pub struct DashboardScreen {
    cities: Arc<Vec<City>>,
    selected: usize,
    mode: ThemeMode,
    focused: bool,
    /// Columns at the last render; drives up/down movement.
    columns: Cell<usize>,
}

impl DashboardScreen {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            cities: Arc::new(Vec::new()),
            selected: 0,
            mode,
            focused: true,
            columns: Cell::new(1),
        }
    }

    pub fn selected_city(&self) -> Option<&City> {
        self.cities.get(self.selected)
    }

    fn move_by(&mut self, delta: isize) {
        if self.cities.is_empty() {
            return;
        }
        let last = self.cities.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    fn columns_for(width: u16) -> usize {
        usize::from((width / CARD_WIDTH).max(1))
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if !self.focused {
            return Ok(None);
        }
        let columns = isize::try_from(self.columns.get()).unwrap_or(1);
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_by(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-columns),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(columns),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.cities.len().saturating_sub(1);
            }
            KeyCode::Char('f' | ' ') => {
                return Ok(self
                    .selected_city()
                    .map(|c| Action::ToggleFavorite(c.name.clone())));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CitiesUpdated(cities) => {
                self.cities = Arc::clone(cities);
                self.selected = self.selected.min(self.cities.len().saturating_sub(1));
            }
            Action::ThemeChanged(mode) => self.mode = *mode,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let palette = self.mode.palette();

        if self.cities.is_empty() {
            let y = area.y + area.height.saturating_sub(1) / 2;
            let line = Rect::new(area.x, y, area.width, 1.min(area.height));
            frame.render_widget(
                Paragraph::new(EMPTY_MESSAGE)
                    .alignment(Alignment::Center)
                    .style(palette.subtitle()),
                line,
            );
            return;
        }

        let columns = Self::columns_for(area.width);
        self.columns.set(columns);
        let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
        let selected_row = self.selected / columns;
        let first_row = selected_row.saturating_sub(visible_rows - 1);

        let card_width = CARD_WIDTH.min(area.width);
        let skip = first_row * columns;
        for (offset, city) in self.cities.iter().enumerate().skip(skip) {
            let slot = offset - skip;
            let (row, col) = (slot / columns, slot % columns);
            if row >= visible_rows {
                break;
            }
            let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(col)) else {
                break;
            };
            let card = Rect::new(
                area.x + col * CARD_WIDTH,
                area.y + row * CARD_HEIGHT,
                card_width,
                CARD_HEIGHT.min(area.height),
            );
            city_card::render(frame, card, city, palette, offset == self.selected);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "dashboard"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use skycast_core::{ForecastDay, IconRef};

    const TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}@2x.png";

    fn city(name: &str, favorite: bool) -> City {
        City {
            name: name.into(),
            temperature_celsius: 18,
            condition: "Clear".into(),
            is_favorite: favorite,
            icon: IconRef::from_code(TEMPLATE, "01d"),
            forecast: Some(vec![
                ForecastDay {
                    source_timestamp: "2024-06-16 00:00:00".into(),
                    temperature_celsius: 15,
                    condition: "Clouds".into(),
                    icon: IconRef::from_code(TEMPLATE, "03n"),
                },
                ForecastDay {
                    source_timestamp: "2024-06-17 00:00:00".into(),
                    temperature_celsius: 16,
                    condition: "Rain".into(),
                    icon: IconRef::from_code(TEMPLATE, "10n"),
                },
            ]),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_with(cities: Vec<City>) -> DashboardScreen {
        let mut screen = DashboardScreen::new(ThemeMode::Dark);
        screen
            .update(&Action::CitiesUpdated(Arc::new(cities)))
            .unwrap();
        screen
    }

    fn rendered(screen: &DashboardScreen, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn empty_grid_shows_placeholder() {
        let screen = DashboardScreen::new(ThemeMode::Light);
        assert!(rendered(&screen, 60, 10).contains("No cities added yet."));
    }

    #[test]
    fn card_shows_current_and_forecast() {
        let screen = screen_with(vec![city("Paris", true)]);
        let text = rendered(&screen, 60, 10);

        assert!(text.contains("Paris (Today)"));
        assert!(text.contains("18°C"));
        assert!(text.contains("Clear"));
        assert!(text.contains("★"));
        assert!(text.contains("Tomorrow"));
        assert!(text.contains("Mon"));
        assert!(text.contains("15°C"));
    }

    #[test]
    fn non_favorite_shows_hollow_star() {
        let screen = screen_with(vec![city("Oslo", false)]);
        let text = rendered(&screen, 60, 10);
        assert!(text.contains("☆"));
        assert!(!text.contains("★"));
    }

    #[test]
    fn favorite_key_targets_selected_card() {
        let mut screen = screen_with(vec![city("A", false), city("B", false), city("C", false)]);

        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Char('f'))).unwrap();

        match action {
            Some(Action::ToggleFavorite(name)) => assert_eq!(name, "C"),
            other => panic!("expected ToggleFavorite, got: {other:?}"),
        }
    }

    #[test]
    fn vertical_moves_follow_rendered_columns() {
        let cities: Vec<_> = ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|n| city(n, false))
            .collect();
        let mut screen = screen_with(cities);
        // Two columns fit in 100 cells.
        rendered(&screen, 100, 30);

        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(screen.selected_city().unwrap().name, "C");
        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(screen.selected_city().unwrap().name, "E");
        screen.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(screen.selected_city().unwrap().name, "C");
    }

    #[test]
    fn selection_clamps_when_list_shrinks() {
        let mut screen = screen_with(vec![city("A", true), city("B", true), city("C", true)]);
        screen.handle_key_event(key(KeyCode::End)).unwrap();

        screen
            .update(&Action::CitiesUpdated(Arc::new(vec![city("A", true)])))
            .unwrap();

        assert_eq!(screen.selected_city().unwrap().name, "A");
    }

    #[test]
    fn toggle_on_empty_grid_does_nothing() {
        let mut screen = DashboardScreen::new(ThemeMode::Dark);
        assert!(screen.handle_key_event(key(KeyCode::Char(' '))).unwrap().is_none());
    }
}
