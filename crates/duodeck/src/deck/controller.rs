use std::num::NonZeroUsize;
use std::time::Instant;

use tracing::{debug, info, trace};

use super::cursor::{Move, SlideCursor, Step};
use super::launch::presenter_address;
use super::link::{PresenterLink, WindowOpener};
use super::message::SyncMessage;
use super::surface::{self, SlideSurface};

/// What an open request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterOpen {
    /// A live presenter window already existed and was brought to front.
    Focused,
    /// A new presenter window was created.
    Opened,
    /// The opener refused to create a window.
    Refused,
}

/// Owns the deck state of the main window and its presenter link.
pub struct DeckController<S, O: WindowOpener> {
    cursor: SlideCursor,
    surface: S,
    opener: O,
    address: String,
    link: Option<PresenterLink<O::Handle>>,
}

impl<S: SlideSurface, O: WindowOpener> DeckController<S, O> {
    pub fn new(total: NonZeroUsize, mut surface: S, opener: O, address: impl Into<String>) -> Self {
        let cursor = SlideCursor::new(total);
        surface::apply(&mut surface, &cursor, Move { from: 1, to: 1 });
        Self {
            cursor,
            surface,
            opener,
            address: address.into(),
            link: None,
        }
    }

    pub fn current(&self) -> usize {
        self.cursor.current()
    }

    pub fn total(&self) -> usize {
        self.cursor.total()
    }

    pub fn cursor(&self) -> &SlideCursor {
        &self.cursor
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub fn opener_mut(&mut self) -> &mut O {
        &mut self.opener
    }

    pub fn is_presenter_open(&self) -> bool {
        self.link.as_ref().is_some_and(PresenterLink::is_live)
    }

    pub fn presenter_opened_at(&self) -> Option<Instant> {
        self.link
            .as_ref()
            .filter(|link| link.is_live())
            .map(PresenterLink::opened_at)
    }

    /// Move one slide back or forward. Ignored at the deck boundaries.
    pub fn advance(&mut self, step: Step) -> bool {
        match self.cursor.advance(step) {
            Some(mv) => {
                self.commit(mv);
                true
            }
            None => {
                trace!(?step, slide = self.current(), "advance ignored at boundary");
                false
            }
        }
    }

    /// Jump to a 1-based slide. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        match self.cursor.go_to(index) {
            Some(mv) => {
                self.commit(mv);
                true
            }
            None => {
                trace!(index, total = self.total(), "go_to ignored, out of range");
                false
            }
        }
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.total())
    }

    fn commit(&mut self, mv: Move) {
        debug!(from = mv.from, to = mv.to, "deck moved");
        surface::apply(&mut self.surface, &self.cursor, mv);
        self.relay_current();
    }

    fn relay_current(&mut self) {
        let current = self.cursor.current();
        if let Some(link) = self.live_link() {
            link.relay(current);
        }
    }

    /// The presenter link if its window is still open. A link whose window
    /// has closed is dropped here.
    fn live_link(&mut self) -> Option<&mut PresenterLink<O::Handle>> {
        if self.link.as_ref().is_some_and(|link| !link.is_live()) {
            debug!("presenter window closed");
            self.link = None;
        }
        self.link.as_mut()
    }

    /// Open the presenter window, or focus it if one is already open.
    pub fn open_presenter_window(&mut self) -> PresenterOpen {
        if let Some(link) = self.live_link() {
            link.focus();
            debug!("presenter window already open, focusing");
            return PresenterOpen::Focused;
        }

        let address = presenter_address(&self.address);
        let opened_at = Instant::now();
        match self.opener.open(&address, opened_at) {
            Some(handle) => {
                info!(%address, "opened presenter window");
                self.link = Some(PresenterLink::new(handle, opened_at));
                self.observe();
                PresenterOpen::Opened
            }
            None => {
                debug!(%address, "presenter window could not be opened");
                PresenterOpen::Refused
            }
        }
    }

    /// Snapshot check run after each input event while a presenter window
    /// is open: relays the current slide if the presenter has not been told
    /// about it yet.
    pub fn observe(&mut self) {
        let current = self.cursor.current();
        if let Some(link) = self.live_link() {
            if link.is_stale(current) {
                link.relay(current);
            }
        }
    }

    /// Apply a message received from the presenter window.
    ///
    /// A `presenter-advanced` is handled like a `go_to` but never echoed
    /// back: the presenter already shows that slide.
    pub fn receive(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::PresenterAdvanced { slide_index } => {
                let Some(mv) = self.cursor.go_to(slide_index) else {
                    trace!(slide_index, "presenter requested out-of-range slide");
                    return;
                };
                debug!(from = mv.from, to = mv.to, "deck moved by presenter window");
                surface::apply(&mut self.surface, &self.cursor, mv);
                if let Some(link) = self.live_link() {
                    link.mark_known(slide_index);
                }
            }
            SyncMessage::DeckAdvanced { .. } => {
                trace!("deck window ignores deck-advanced");
            }
        }
    }

    #[cfg(test)]
    fn link(&self) -> Option<&PresenterLink<O::Handle>> {
        self.link.as_ref()
    }
}
