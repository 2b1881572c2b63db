//! Cross-window message channel.
//!
//! Every window owns one [`Mailbox`]. Other windows hold an [`Outbox`]
//! pointing at it. Dropping the mailbox (closing the window) flips every
//! outbox pointing at it to closed, which is the liveness flag senders poll
//! before each send.

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use super::message::SyncMessage;

#[derive(Debug)]
pub struct Mailbox {
    tx: UnboundedSender<Value>,
    rx: UnboundedReceiver<Value>,
}

impl Mailbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// An address other windows can post to.
    pub fn outbox(&self) -> Outbox {
        Outbox {
            tx: self.tx.clone(),
        }
    }

    /// Take every queued message, in arrival order, keeping only the ones
    /// that decode as a [`SyncMessage`].
    pub fn drain(&mut self) -> Vec<SyncMessage> {
        let mut messages = Vec::new();
        while let Ok(value) = self.rx.try_recv() {
            match SyncMessage::from_value(&value) {
                Some(msg) => messages.push(msg),
                None => trace!(%value, "ignoring unrecognised message"),
            }
        }
        messages
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Outbox {
    tx: UnboundedSender<Value>,
}

impl Outbox {
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Fire-and-forget. Returns false if the receiving window is gone, in
    /// which case the message is dropped.
    pub fn post(&self, message: &SyncMessage) -> bool {
        self.post_value(message.to_value())
    }

    pub fn post_value(&self, value: Value) -> bool {
        self.tx.send(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_arrive_in_order() {
        let mut mailbox = Mailbox::new();
        let outbox = mailbox.outbox();
        for n in [2, 3, 4] {
            assert!(outbox.post(&SyncMessage::DeckAdvanced { slide_index: n }));
        }
        let got: Vec<usize> = mailbox.drain().iter().map(SyncMessage::slide_index).collect();
        assert_eq!(got, vec![2, 3, 4]);
        assert!(mailbox.drain().is_empty());
    }

    #[test]
    fn test_drain_filters_foreign_values() {
        crate::logging::init_test_logging();
        let mut mailbox = Mailbox::new();
        let outbox = mailbox.outbox();
        outbox.post_value(json!({"type": "slideChange", "slideNum": "2"}));
        outbox.post(&SyncMessage::PresenterAdvanced { slide_index: 7 });
        outbox.post_value(json!(42));
        assert_eq!(
            mailbox.drain(),
            vec![SyncMessage::PresenterAdvanced { slide_index: 7 }]
        );
    }

    #[test]
    fn test_dropping_mailbox_closes_outboxes() {
        let mailbox = Mailbox::new();
        let outbox = mailbox.outbox();
        let copy = outbox.clone();
        assert!(!outbox.is_closed());
        drop(mailbox);
        assert!(outbox.is_closed());
        assert!(copy.is_closed());
        assert!(!outbox.post(&SyncMessage::DeckAdvanced { slide_index: 1 }));
    }
}
