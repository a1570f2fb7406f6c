//! Terminal input events and the background poller feeding them

use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Input delivered to the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Key(KeyEvent),
    Resize(u16, u16),
}

impl EventKind {
    /// Ctrl+C / Ctrl+Q, handled before any view sees the event.
    pub fn is_quit(&self) -> bool {
        match self {
            EventKind::Key(key) => {
                key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            }
            EventKind::Resize(_, _) => false,
        }
    }
}

/// Raw event from crossterm before filtering.
#[derive(Debug)]
pub enum RawEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Spawn the polling task that forwards crossterm events until cancelled.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("event poller cancelled");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut processed = 0;
                    while processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        processed += 1;
                        let raw = match event::read() {
                            Ok(event::Event::Key(key)) => Some(RawEvent::Key(key)),
                            Ok(event::Event::Resize(w, h)) => Some(RawEvent::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(raw) = raw {
                            if tx.send(raw).is_err() {
                                debug!("event channel closed, stopping poller");
                                return;
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Convert a raw event into an [`EventKind`]; key releases are dropped.
pub fn process_raw_event(raw: RawEvent) -> Option<EventKind> {
    match raw {
        RawEvent::Key(key) if key.kind == KeyEventKind::Release => None,
        RawEvent::Key(key) => Some(EventKind::Key(key)),
        RawEvent::Resize(w, h) => Some(EventKind::Resize(w, h)),
    }
}
