//! Event handling: terminal input, ticks and cache notifications.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseEvent};
use sockdash_query::QueryEvent;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

/// Application events.
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press.
    Key(KeyEvent),
    /// Mouse click or scroll.
    Mouse(MouseEvent),
    /// Terminal resize.
    Resize(u16, u16),
    /// Redraw tick.
    Tick,
    /// A cached query changed.
    Query(QueryEvent),
}

/// Merges terminal input, ticks and cache events into one stream.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandler").finish_non_exhaustive()
    }
}

impl EventHandler {
    /// Handler with no sources attached. Events arrive only through
    /// [`EventHandler::sender`] and [`EventHandler::forward_queries`].
    #[must_use]
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Handler reading the terminal, emitting a tick every `tick_rate`
    /// without input.
    #[must_use]
    pub fn new(tick_rate: Duration) -> Self {
        let handler = Self::detached();
        let event_tx = handler.tx.clone();

        // crossterm polling blocks, so it gets its own thread.
        tokio::task::spawn_blocking(move || {
            loop {
                let ready = match event::poll(tick_rate) {
                    Ok(ready) => ready,
                    Err(err) => {
                        warn!(error = %err, "terminal poll failed");
                        break;
                    }
                };
                let next = if ready {
                    match event::read() {
                        Ok(Event::Key(key)) => Some(AppEvent::Key(key)),
                        Ok(Event::Mouse(mouse)) => Some(AppEvent::Mouse(mouse)),
                        Ok(Event::Resize(w, h)) => Some(AppEvent::Resize(w, h)),
                        Ok(_) => None,
                        Err(err) => {
                            warn!(error = %err, "terminal read failed");
                            break;
                        }
                    }
                } else {
                    Some(AppEvent::Tick)
                };
                if let Some(next) = next {
                    if event_tx.send(next).is_err() {
                        break;
                    }
                }
            }
        });

        handler
    }

    /// Forward cache notifications from `events` until either side closes.
    pub fn forward_queries(&self, mut events: broadcast::Receiver<QueryEvent>) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if tx.send(AppEvent::Query(event)).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "query events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Next event, or `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Extra sender for injecting events.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use sockdash_query::QueryClient;

    #[tokio::test]
    async fn test_sender_delivers_events() {
        let mut events = EventHandler::detached();
        events.sender().send(AppEvent::Key(KeyEvent::from(KeyCode::Char('q')))).unwrap();
        events.sender().send(AppEvent::Tick).unwrap();

        assert!(matches!(events.next().await, Some(AppEvent::Key(k)) if k.code == KeyCode::Char('q')));
        assert!(matches!(events.next().await, Some(AppEvent::Tick)));
    }

    #[tokio::test]
    async fn test_query_events_are_forwarded() {
        let cache = QueryClient::new();
        let mut events = EventHandler::detached();
        events.forward_queries(cache.subscribe());

        cache.set_data(&"status".into(), 7_u32).unwrap();

        match events.next().await {
            Some(AppEvent::Query(QueryEvent::Updated(key))) => assert_eq!(key.name(), "status"),
            other => panic!("expected update, got {other:?}"),
        }
    }
}
