use std::time::Instant;

use tracing::{debug, trace};

use super::channel::Outbox;
use super::message::SyncMessage;

/// A handle to another window, as seen from the window holding it.
pub trait WindowHandle {
    /// True once the referenced window has gone away.
    fn is_closed(&self) -> bool;
    /// Bring the window to the front.
    fn focus(&mut self);
    /// Fire-and-forget delivery. Returns false if the message was dropped.
    fn post_message(&self, message: &SyncMessage) -> bool;
}

impl WindowHandle for Outbox {
    fn is_closed(&self) -> bool {
        Outbox::is_closed(self)
    }

    fn focus(&mut self) {}

    fn post_message(&self, message: &SyncMessage) -> bool {
        self.post(message)
    }
}

/// Creates new window contexts.
pub trait WindowOpener {
    type Handle: WindowHandle;

    /// Open a window at `address`. `None` when the platform refuses.
    fn open(&mut self, address: &str, opened_at: Instant) -> Option<Self::Handle>;
}

/// Check the window is still there, then post. Closed windows are skipped.
pub fn send_if_open<H: WindowHandle + ?Sized>(handle: &H, message: &SyncMessage) -> bool {
    if handle.is_closed() {
        trace!(kind = message.kind(), "target window closed, skipping send");
        return false;
    }
    let delivered = handle.post_message(message);
    if !delivered {
        trace!(kind = message.kind(), "target window closed during send");
    }
    delivered
}

/// The deck's live handle to its presenter window.
#[derive(Debug)]
pub struct PresenterLink<H> {
    handle: H,
    opened_at: Instant,
    last_relayed: Option<usize>,
}

impl<H: WindowHandle> PresenterLink<H> {
    pub fn new(handle: H, opened_at: Instant) -> Self {
        Self {
            handle,
            opened_at,
            last_relayed: None,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.handle.is_closed()
    }

    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    pub fn focus(&mut self) {
        self.handle.focus();
    }

    /// Tell the presenter window that the deck now shows `index`.
    pub fn relay(&mut self, index: usize) -> bool {
        let message = SyncMessage::DeckAdvanced { slide_index: index };
        let delivered = send_if_open(&self.handle, &message);
        if delivered {
            debug!(slide = index, "relayed slide to presenter window");
            self.last_relayed = Some(index);
        }
        delivered
    }

    /// Record that the presenter window already knows about `index`,
    /// without sending anything.
    pub fn mark_known(&mut self, index: usize) {
        self.last_relayed = Some(index);
    }

    /// Whether the presenter window may be showing something other than `index`.
    pub fn is_stale(&self, index: usize) -> bool {
        self.last_relayed != Some(index)
    }

    #[cfg(test)]
    pub fn handle(&self) -> &H {
        &self.handle
    }
}
