//! Terminal input plus the two clocks that drive the dashboard.
//!
//! A background task merges crossterm input with a tick clock (throbber
//! frames, toast expiry) and a render clock, and forwards the result over
//! an unbounded channel until cancelled.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized; the next draw picks up the new size.
    Resize,
    Tick,
    Render,
}

impl Event {
    /// Keep key presses and resizes; drop releases, repeats, mouse and paste.
    fn from_terminal(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Resize(..) => Some(Self::Resize),
            _ => None,
        }
    }
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Handle to the background reader. Dropping it stops the task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// `tick_rate` paces [`Event::Tick`], `render_rate` paces [`Event::Render`].
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cancel.clone(), tick_rate, render_rate));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader has shut down.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_rate: Duration,
    render_rate: Duration,
) {
    let mut input = EventStream::new();
    let mut ticks = clock(tick_rate);
    let mut frames = clock(render_rate);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => return,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            Some(Ok(raw)) = input.next() => match Event::from_terminal(raw) {
                Some(event) => event,
                None => continue,
            },
        };

        // Receiver gone: the app loop has exited.
        if tx.send(event).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn only_presses_and_resizes_are_forwarded() {
        assert!(matches!(
            Event::from_terminal(key(KeyEventKind::Press)),
            Some(Event::Key(_))
        ));
        assert!(Event::from_terminal(key(KeyEventKind::Release)).is_none());
        assert!(Event::from_terminal(key(KeyEventKind::Repeat)).is_none());
        assert!(matches!(
            Event::from_terminal(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize)
        ));
        assert!(Event::from_terminal(CrosstermEvent::FocusGained).is_none());
    }
}
