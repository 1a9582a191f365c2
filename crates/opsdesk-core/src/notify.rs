//! One-shot user notices emitted by the entity stores.
//!
//! Every mutation and refresh outcome publishes a [`Notice`] on a
//! broadcast channel. Consumers subscribe, show each notice once, and
//! drop it. Notices are not state: nothing is stored, nothing is
//! replayed, and a late subscriber simply misses earlier ones.

use tokio::sync::broadcast;

const NOTICE_CHANNEL_CAPACITY: usize = 64;

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A single user-facing message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// Publisher handle shared by all stores in a workspace.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to notices published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub(crate) fn success(&self, message: impl Into<String>) {
        self.publish(Severity::Success, message.into());
    }

    pub(crate) fn error(&self, message: impl Into<String>) {
        self.publish(Severity::Error, message.into());
    }

    fn publish(&self, severity: Severity, message: String) {
        // A send error only means no receivers are subscribed.
        let _ = self.tx.send(Notice { severity, message });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_notices_in_order() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.success("Ticket created successfully");
        notifier.error("Failed to update ticket");

        let first = rx.try_recv().unwrap();
        assert_eq!(first.severity, Severity::Success);
        assert_eq!(first.message, "Ticket created successfully");

        let second = rx.try_recv().unwrap();
        assert_eq!(second.severity, Severity::Error);
        assert_eq!(second.message, "Failed to update ticket");

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let notifier = Notifier::new();
        notifier.success("nobody listening");

        // A subscription opened afterwards starts empty.
        let mut rx = notifier.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
