//! Event system for editor notifications.
//!
//! Events are values broadcast over `tokio::sync::broadcast`. The editor
//! never awaits: it sends synchronously, and a front end drains its
//! receiver with `try_recv` after each command to decide what to redraw.

use tokio::sync::broadcast;

use crate::language::Language;

/// Events that can occur in the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    // Tab events
    /// A tab was created
    TabOpened(String),
    /// A tab was closed
    TabClosed(String),
    /// A tab became the selected one
    TabSelected(String),

    // Document events
    /// A file was loaded into a tab
    DocumentLoaded(String),
    /// A tab's content was written to disk
    DocumentSaved(String),
    /// A tab's content changed and its gutter was recomputed
    DocumentChanged { tab: String, line_count: usize },
    /// Find marked new ranges
    HighlightsChanged { tab: String, matches: usize },
    /// A tab was given a new language tag
    LanguageChanged { tab: String, language: Language },

    // View events
    /// Content and gutter views moved together
    Scrolled { tab: String, fraction: f64 },

    /// Editor is quitting
    Quit,
}

/// Event bus for broadcasting editor events.
///
/// Lagged receivers lose old events instead of blocking the sender.
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: EditorEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to events.
    ///
    /// Returns a receiver that will get all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Takes every event currently queued on `receiver` without waiting.
pub fn drain(receiver: &mut broadcast::Receiver<EditorEvent>) -> Vec<EditorEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                tracing::warn!("Event receiver lagged, missed {} events", n);
            }
            Err(_) => break,
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(EditorEvent::Quit);

        assert_eq!(rx.try_recv().unwrap(), EditorEvent::Quit);
    }

    #[test]
    fn test_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(EditorEvent::TabOpened("Untitled-1".into()));

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_drain_empties_queue() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(EditorEvent::TabOpened("Untitled-1".into()));
        bus.emit(EditorEvent::TabSelected("Untitled-1".into()));

        assert_eq!(drain(&mut rx).len(), 2);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_emit_without_subscribers() {
        EventBus::new().emit(EditorEvent::Quit);
    }
}
