//! Application core: event loop, search, collection updates, overlays.
//!
//! `App` owns the city store; every mutation happens here in response to an
//! [`Action`]. Weather fetches run on a spawned task and report back with
//! [`Action::WeatherFetched`], so the loading flag is always cleared.

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use skycast_core::{AddOutcome, City, CityStore, FetchError, WeatherFetcher, normalize_query};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::DashboardScreen;
use crate::theme::{Palette, ThemeMode};
use crate::tui::Tui;

const TITLE: &str = "Weather Dashboard";
const SUBTITLE: &str = "Search and track your favorite cities.";
const SEARCH_PLACEHOLDER: &str = "Search for a city...";
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    /// Tracked cities; the only copy of the collection.
    store: CityStore,
    fetcher: WeatherFetcher,
    dashboard: DashboardScreen,
    running: bool,
    help_visible: bool,
    /// Search field has focus.
    search_active: bool,
    search_query: String,
    /// A fetch is in flight; the search field is disabled.
    loading: bool,
    favorites_only: bool,
    theme: ThemeMode,
    /// Blocking error dialog from the last failed fetch.
    fetch_error: Option<FetchError>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    throbber_state: ThrobberState,
    /// Action sender. Spawned tasks report back through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver, drained by the main loop.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(store: CityStore, fetcher: WeatherFetcher, theme: ThemeMode) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            store,
            fetcher,
            dashboard: DashboardScreen::new(theme),
            running: true,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            loading: false,
            favorites_only: false,
            theme,
            fetch_error: None,
            notification: None,
            throbber_state: ThrobberState::default(),
            action_tx,
            action_rx,
        }
    }

    /// Mount the dashboard and hand it the restored collection.
    fn init(&mut self) -> Result<()> {
        self.dashboard.init(self.action_tx.clone())?;
        self.dashboard.set_focused(true);
        self.refresh_view()
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init()?;

        let mut events = EventReader::new(
            Duration::from_millis(100), // throbber + toast expiry
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(cities = self.store.len(), "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize | Event::Render => self.action_tx.send(Action::Render)?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Map a key event to an action. Overlays capture input first, then the
    /// search field, then global keys; the rest goes to the dashboard.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Error dialog captures all input
        if self.fetch_error.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => Ok(Some(Action::DismissError)),
                _ => Ok(None),
            };
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        if self.search_active {
            return match key.code {
                KeyCode::Esc => Ok(Some(Action::CloseSearch)),
                // Field is disabled while a fetch is in flight
                _ if self.loading => Ok(None),
                KeyCode::Enter => Ok(Some(Action::SearchSubmit)),
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Ok(None)
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    Ok(None)
                }
                _ => Ok(None),
            };
        }

        match key.code {
            KeyCode::Char('q') => return Ok(Some(Action::Quit)),
            KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
            KeyCode::Char('/' | 'i') => return Ok(Some(Action::OpenSearch)),
            KeyCode::Char('F') => return Ok(Some(Action::ToggleFavoritesOnly)),
            KeyCode::Char('t') => return Ok(Some(Action::ToggleTheme)),
            KeyCode::Esc => return Ok(Some(Action::DismissNotification)),
            _ => {}
        }

        self.dashboard.handle_key_event(key)
    }

    // ── State transitions ────────────────────────────────────────────

    /// Process a single action and propagate it to the dashboard.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Render => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                if self.loading {
                    self.throbber_state.calc_next();
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::OpenSearch => {
                self.search_active = true;
                self.dashboard.set_focused(false);
            }

            Action::CloseSearch => {
                self.search_active = false;
                self.dashboard.set_focused(true);
            }

            Action::SearchSubmit => self.submit_search(),

            Action::WeatherFetched(result) => self.finish_fetch(result.clone())?,

            Action::DismissError => {
                self.fetch_error = None;
            }

            Action::ToggleFavorite(name) => {
                match self.store.toggle_favorite(name) {
                    Ok(Some(favorite)) => debug!(city = %name, favorite, "favorite toggled"),
                    Ok(None) => debug!(city = %name, "toggle for unknown city"),
                    Err(e) => {
                        warn!(error = %e, "failed to save favorites");
                        self.action_tx.send(Action::Notify(Notification::warning(format!(
                            "Favorites not saved: {e}"
                        ))))?;
                    }
                }
                self.refresh_view()?;
            }

            Action::ToggleFavoritesOnly => {
                self.favorites_only = !self.favorites_only;
                self.refresh_view()?;
            }

            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.dashboard.update(&Action::ThemeChanged(self.theme))?;
            }

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            Action::DismissNotification => {
                self.notification = None;
            }

            other => {
                if let Some(follow_up) = self.dashboard.update(other)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }

        Ok(())
    }

    /// Start a fetch for the current query on a background task.
    fn submit_search(&mut self) {
        if self.loading {
            return;
        }
        let Some(query) = normalize_query(&self.search_query).map(str::to_owned) else {
            return;
        };

        info!(city = %query, "fetching weather");
        self.loading = true;

        let fetcher = self.fetcher.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&query).await;
            let _ = tx.send(Action::WeatherFetched(result));
        });
    }

    /// Apply the outcome of a fetch. Overlapping fetches land in completion order.
    fn finish_fetch(&mut self, result: Result<City, FetchError>) -> Result<()> {
        self.loading = false;

        match result {
            Ok(city) => {
                let name = city.name.clone();
                match self.store.add_city(city) {
                    AddOutcome::Added => {
                        self.action_tx
                            .send(Action::Notify(Notification::success(format!("Added {name}"))))?;
                    }
                    AddOutcome::AlreadyPresent => debug!(city = %name, "already tracked"),
                }
                self.search_query.clear();
                self.search_active = false;
                self.dashboard.set_focused(true);
                self.refresh_view()?;
            }
            Err(e) => {
                warn!(error = %e, "weather fetch failed");
                self.fetch_error = Some(e);
            }
        }
        Ok(())
    }

    /// Push the currently visible cities to the dashboard.
    fn refresh_view(&mut self) -> Result<()> {
        let visible: Vec<City> = self
            .store
            .filtered_view(self.favorites_only)
            .into_iter()
            .cloned()
            .collect();
        debug!(
            component = self.dashboard.id(),
            visible = visible.len(),
            "view refreshed"
        );
        self.dashboard
            .update(&Action::CitiesUpdated(Arc::new(visible)))?;
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = self.theme.palette();

        frame.render_widget(Block::default().style(palette.base()), area);

        // Layout: [header] [controls] [card grid] [status bar]
        let layout = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        render_header(frame, layout[0], palette);
        self.render_controls(frame, layout[1], palette);
        self.dashboard.render(frame, layout[2]);
        self.render_status_bar(frame, layout[3], palette);

        // Overlays (last = topmost)
        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif, palette);
        }

        if let Some(ref err) = self.fetch_error {
            render_error_dialog(frame, area, err, palette);
        }

        if self.help_visible {
            render_help_overlay(frame, area, palette);
        }
    }

    /// Search field, submit button, favorites filter and theme toggle.
    fn render_controls(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let [search, submit, _, favorites, theme] = Layout::horizontal([
            Constraint::Percentage(55),
            Constraint::Length(16),
            Constraint::Min(1),
            Constraint::Length(15),
            Constraint::Length(14),
        ])
        .areas(area);

        // Search input
        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.search_active && !self.loading {
                palette.border_focused()
            } else {
                palette.border_default()
            });
        let input = if self.search_query.is_empty() && !self.search_active {
            Line::from(Span::styled(SEARCH_PLACEHOLDER, palette.key_hint()))
        } else {
            let style = if self.loading {
                palette.key_hint()
            } else {
                Style::default().fg(palette.text)
            };
            let mut spans = vec![Span::raw(" "), Span::styled(self.search_query.as_str(), style)];
            if self.search_active && !self.loading {
                spans.push(Span::styled("▏", palette.border_focused()));
            }
            Line::from(spans)
        };
        frame.render_widget(Paragraph::new(input).block(input_block), search);

        // Submit button, replaced by a throbber while loading
        let button_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border_default());
        let button_inner = button_block.inner(submit);
        frame.render_widget(button_block, submit);
        if self.loading {
            let throbber = Throbber::default()
                .label("Loading...")
                .style(palette.key_hint())
                .throbber_style(palette.key_hint_key());
            frame.render_stateful_widget(throbber, button_inner, &mut self.throbber_state.clone());
        } else {
            frame.render_widget(
                Paragraph::new("Search")
                    .alignment(Alignment::Center)
                    .style(palette.button()),
                button_inner,
            );
        }

        let toggle = |label: &'static str, active: bool| {
            Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(if active {
                    palette.toggle_active()
                } else {
                    palette.toggle_inactive()
                })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(palette.border_default()),
                )
        };
        frame.render_widget(toggle("★ Favorites", self.favorites_only), favorites);
        frame.render_widget(toggle(self.theme.toggle_label(), false), theme);
    }

    /// Key hints on the left, collection counts on the right.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let hints = if self.search_active {
            vec![
                Span::styled(" Enter ", palette.key_hint_key()),
                Span::styled("search  ", palette.key_hint()),
                Span::styled("Esc ", palette.key_hint_key()),
                Span::styled("done", palette.key_hint()),
            ]
        } else {
            vec![
                Span::styled(" / ", palette.key_hint_key()),
                Span::styled("search  ", palette.key_hint()),
                Span::styled("f ", palette.key_hint_key()),
                Span::styled("favorite  ", palette.key_hint()),
                Span::styled("F ", palette.key_hint_key()),
                Span::styled("favorites only  ", palette.key_hint()),
                Span::styled("t ", palette.key_hint_key()),
                Span::styled("theme  ", palette.key_hint()),
                Span::styled("? ", palette.key_hint_key()),
                Span::styled("help  ", palette.key_hint()),
                Span::styled("q ", palette.key_hint_key()),
                Span::styled("quit", palette.key_hint()),
            ]
        };

        let counts = format!(
            "{} cities · {} favorites{} ",
            self.store.len(),
            self.store.favorites().count(),
            if self.favorites_only { " (filtered)" } else { "" },
        );

        let counts_width = u16::try_from(counts.chars().count()).unwrap_or(area.width);
        let [hints_area, counts_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(counts_width)]).areas(area);

        frame.render_widget(Paragraph::new(Line::from(hints)), hints_area);
        frame.render_widget(
            Paragraph::new(Span::styled(counts, palette.subtitle())).alignment(Alignment::Right),
            counts_area,
        );
    }
}

fn render_header(frame: &mut Frame, area: Rect, palette: &Palette) {
    let text = vec![
        Line::from(Span::styled(TITLE, palette.title_style())),
        Line::from(Span::styled(SUBTITLE, palette.subtitle())),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

// ── Overlays ─────────────────────────────────────────────────────────

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

/// Render a notification toast in the bottom-right corner.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification, palette: &Palette) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16.min(area.height);

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2); // above status bar
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (palette.success, "✓"),
        NotificationLevel::Warning => (palette.warning, "!"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(palette.surface));

    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.as_str(), Style::default().fg(palette.text)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// Render the blocking fetch-error dialog, tall enough for the wrapped message.
fn render_error_dialog(frame: &mut Frame, area: Rect, err: &FetchError, palette: &Palette) {
    let width = 60_u16.min(area.width.saturating_sub(4));
    let block = Block::default()
        .title(" Error ")
        .title_style(palette.title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.error))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.surface));

    let message = Paragraph::new(Span::styled(
        err.to_string(),
        Style::default().fg(palette.text),
    ))
    .wrap(Wrap { trim: true });
    // Borders and padding take four columns; borders, gap and hint four rows.
    let message_rows =
        u16::try_from(message.line_count(width.saturating_sub(4))).unwrap_or(u16::MAX);
    let dialog_area = centered(area, width, message_rows.saturating_add(4));

    frame.render_widget(Clear, dialog_area);
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let [message_area, _, hint_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(message, message_area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Enter/Esc ", palette.key_hint_key()),
            Span::styled("dismiss", palette.key_hint()),
        ])),
        hint_area,
    );
}

/// Render the help overlay centered on screen.
fn render_help_overlay(frame: &mut Frame, area: Rect, palette: &Palette) {
    let help_area = centered(area, 52, 16);

    frame.render_widget(Clear, help_area);
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(palette.title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border_focused())
        .style(Style::default().bg(palette.surface));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let row = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<12}"), palette.key_hint_key()),
            Span::styled(desc, palette.key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  Search", palette.title_style())),
        row("/ or i", "Focus the search field"),
        row("Enter", "Look up the typed city"),
        row("Esc", "Leave the search field"),
        Line::from(""),
        Line::from(Span::styled("  Cards", palette.title_style())),
        row("h/j/k/l ←↓↑→", "Select a card"),
        row("f or Space", "Toggle favorite"),
        row("F", "Show favorites only"),
        Line::from(""),
        row("t", "Toggle light/dark"),
        row("q  Ctrl+C", "Quit"),
        Line::from(Span::styled("                  Esc or ? to close", palette.key_hint())),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use secrecy::SecretString;
    use serde_json::json;
    use skycast_core::config::DEFAULT_ICON_URL_TEMPLATE;
    use skycast_core::{FavoritesBackend, FavoritesStore, IconRef, WeatherConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ── Helpers ──────────────────────────────────────────────────────

    fn fetcher_for(server: &MockServer) -> WeatherFetcher {
        WeatherFetcher::new(&WeatherConfig {
            base_url: url::Url::parse(&format!("{}/data/2.5", server.uri())).unwrap(),
            api_key: SecretString::from("test-key".to_owned()),
            icon_url_template: DEFAULT_ICON_URL_TEMPLATE.to_owned(),
            timeout: None,
        })
        .unwrap()
    }

    fn city(name: &str) -> City {
        City {
            name: name.into(),
            temperature_celsius: 20,
            condition: "Clear".into(),
            is_favorite: false,
            icon: IconRef::from_code(DEFAULT_ICON_URL_TEMPLATE, "01d"),
            forecast: None,
        }
    }

    async fn app_with(store: CityStore) -> (MockServer, App) {
        let server = MockServer::start().await;
        let mut app = App::new(store, fetcher_for(&server), ThemeMode::Dark);
        app.init().unwrap();
        (server, app)
    }

    fn press(app: &mut App, code: KeyCode) {
        let modifiers = match code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => KeyModifiers::SHIFT,
            _ => KeyModifiers::NONE,
        };
        if let Some(action) = app.handle_key_event(KeyEvent::new(code, modifiers)).unwrap() {
            app.process_action(&action).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Process everything already queued, e.g. notifications.
    fn drain(app: &mut App) {
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
        }
    }

    /// Wait for the spawned fetch to report back and apply it.
    async fn complete_fetch(app: &mut App) {
        loop {
            let action = app.action_rx.recv().await.unwrap();
            let done = matches!(action, Action::WeatherFetched(_));
            app.process_action(&action).unwrap();
            if done {
                break;
            }
        }
        drain(app);
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
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

    async fn mount_paris(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": { "temp": 18.4 },
                "weather": [{ "main": "Clear", "icon": "01d" }]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    {
                        "dt": 0,
                        "dt_txt": "2099-01-01 00:00:00",
                        "main": { "temp": 9.6 },
                        "weather": [{ "main": "Clouds", "icon": "03n" }]
                    }
                ]
            })))
            .mount(server)
            .await;
    }

    // ── Search ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_search_adds_city_and_clears_field() {
        let (server, mut app) = app_with(CityStore::new(FavoritesStore::in_memory())).await;
        mount_paris(&server).await;

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "  Paris ");
        press(&mut app, KeyCode::Enter);
        assert!(app.loading);

        complete_fetch(&mut app).await;

        assert!(!app.loading);
        assert_eq!(app.search_query, "");
        assert!(!app.search_active);
        assert_eq!(app.store.len(), 1);
        let paris = app.store.get("Paris").unwrap();
        assert_eq!(paris.temperature_celsius, 18);
        assert!(!paris.is_favorite);
        assert_eq!(
            app.notification.as_ref().map(|(n, _)| n.level),
            Some(NotificationLevel::Success)
        );

        let text = screen_text(&app);
        assert!(text.contains("Paris (Today)"));
        assert!(text.contains("Tomorrow"));
    }

    #[tokio::test]
    async fn test_unknown_city_shows_error_and_clears_loading() {
        let (server, mut app) = app_with(CityStore::new(FavoritesStore::in_memory())).await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "Notacity123");
        press(&mut app, KeyCode::Enter);

        // Input is disabled while the fetch is in flight.
        type_text(&mut app, "xyz");
        assert_eq!(app.search_query, "Notacity123");
        assert!(screen_text(&app).contains("Loading..."));

        complete_fetch(&mut app).await;

        assert!(!app.loading);
        assert!(app.store.is_empty());
        assert!(matches!(app.fetch_error, Some(FetchError::CityNotFound { .. })));
        assert!(screen_text(&app).contains("City not found: Notacity123"));

        // Dialog swallows other keys until dismissed.
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        press(&mut app, KeyCode::Enter);
        assert!(app.fetch_error.is_none());
        assert!(!screen_text(&app).contains("Loading..."));
    }

    #[tokio::test]
    async fn test_long_error_message_wraps_inside_dialog() {
        let (_server, mut app) = app_with(CityStore::new(FavoritesStore::in_memory())).await;
        app.fetch_error = Some(FetchError::FetchFailed {
            message: "provider returned HTTP 503: upstream maintenance window".into(),
        });

        let text = screen_text(&app);

        assert!(text.contains("upstream"));
        assert!(text.contains("maintenance window"));
        assert!(text.contains("Enter/Esc dismiss"));
    }

    #[tokio::test]
    async fn test_duplicate_search_is_silent() {
        let mut store = CityStore::new(FavoritesStore::in_memory());
        store.add_city(city("Paris"));
        let (server, mut app) = app_with(store).await;
        mount_paris(&server).await;

        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "Paris");
        press(&mut app, KeyCode::Enter);
        complete_fetch(&mut app).await;

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.get("Paris").unwrap().temperature_celsius, 20);
        assert_eq!(app.search_query, "");
        assert!(app.notification.is_none());
        assert!(app.fetch_error.is_none());
    }

    #[tokio::test]
    async fn test_blank_query_does_not_fetch() {
        let (_server, mut app) = app_with(CityStore::new(FavoritesStore::in_memory())).await;

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert!(!app.loading);
        assert!(app.action_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_backspace_edits_query() {
        let (_server, mut app) = app_with(CityStore::new(FavoritesStore::in_memory())).await;

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "Osloo");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search_query, "Oslo");

        press(&mut app, KeyCode::Esc);
        assert!(!app.search_active);
        assert_eq!(app.search_query, "Oslo");
    }

    // ── Favorites ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_favorite_filter_hides_other_cities() {
        let mut store = CityStore::new(FavoritesStore::in_memory());
        store.add_city(city("Oslo"));
        store.add_city(city("Lima"));
        let (_server, mut app) = app_with(store).await;

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('f'));
        assert!(app.store.get("Lima").unwrap().is_favorite);

        press(&mut app, KeyCode::Char('F'));
        let text = screen_text(&app);
        assert!(text.contains("Lima (Today)"));
        assert!(!text.contains("Oslo (Today)"));
        assert!(text.contains("(filtered)"));

        press(&mut app, KeyCode::Char('F'));
        assert!(screen_text(&app).contains("Oslo (Today)"));
    }

    #[tokio::test]
    async fn test_filter_with_no_favorites_shows_empty_message() {
        let mut store = CityStore::new(FavoritesStore::in_memory());
        store.add_city(city("Oslo"));
        let (_server, mut app) = app_with(store).await;

        press(&mut app, KeyCode::Char('F'));

        assert!(screen_text(&app).contains("No cities added yet."));
    }

    #[tokio::test]
    async fn test_failed_save_warns_but_keeps_toggle() {
        struct Unwritable;
        impl FavoritesBackend for Unwritable {
            fn read(&self) -> std::io::Result<Option<Vec<u8>>> {
                Ok(None)
            }
            fn write(&self, _: &[u8]) -> std::io::Result<()> {
                Err(std::io::Error::other("disk full"))
            }
        }

        let mut store = CityStore::new(FavoritesStore::new(Unwritable));
        store.add_city(city("Oslo"));
        let (_server, mut app) = app_with(store).await;

        press(&mut app, KeyCode::Char(' '));
        drain(&mut app);

        assert!(app.store.get("Oslo").unwrap().is_favorite);
        let (notif, _) = app.notification.clone().unwrap();
        assert_eq!(notif.level, NotificationLevel::Warning);
        assert!(notif.message.contains("disk full"));
    }

    // ── Chrome ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_theme_toggle_flips_label() {
        let (_server, mut app) = app_with(CityStore::new(FavoritesStore::in_memory())).await;
        assert!(screen_text(&app).contains("Light Mode"));

        press(&mut app, KeyCode::Char('t'));

        assert_eq!(app.theme, ThemeMode::Light);
        assert!(screen_text(&app).contains("Dark Mode"));
    }

    #[tokio::test]
    async fn test_empty_dashboard_render() {
        let (_server, app) = app_with(CityStore::new(FavoritesStore::in_memory())).await;
        let text = screen_text(&app);

        assert!(text.contains("Weather Dashboard"));
        assert!(text.contains("Search and track your favorite cities."));
        assert!(text.contains("Search for a city..."));
        assert!(text.contains("No cities added yet."));
    }

    #[tokio::test]
    async fn test_help_overlay_and_quit() {
        let (_server, mut app) = app_with(CityStore::new(FavoritesStore::in_memory())).await;

        press(&mut app, KeyCode::Char('?'));
        assert!(screen_text(&app).contains("Keyboard Shortcuts"));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        press(&mut app, KeyCode::Esc);
        assert!(!app.help_visible);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
