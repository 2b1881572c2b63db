use std::num::NonZeroUsize;
use std::time::Instant;

use tracing::{debug, trace};

use crate::deck::cursor::{SlideCursor, Step};
use crate::deck::launch::LaunchParams;
use crate::deck::link::{WindowHandle, send_if_open};
use crate::deck::message::SyncMessage;
use crate::notes::{NotesTable, SpeakerNote};

use super::timer::{ElapsedTimer, TimerReading, TimerThresholds};

/// Everything a presenter window needs at load time.
#[derive(Debug, Clone)]
pub struct PresenterSetup {
    pub total: NonZeroUsize,
    pub notes: NotesTable,
    pub thresholds: TimerThresholds,
    pub opened_at: Instant,
}

/// State of a presenter window: its own slide cursor, the note on display,
/// the elapsed timer, and the way back to the deck window that opened it.
#[derive(Debug)]
pub struct PresenterView<H> {
    cursor: SlideCursor,
    notes: NotesTable,
    displayed: SpeakerNote,
    timer: ElapsedTimer,
    opener: Option<H>,
}

impl<H: WindowHandle> PresenterView<H> {
    /// Set up presenter state for a window launched with `params`. A window
    /// launched without the presenter flag is an ordinary deck and gets `None`.
    pub fn on_load(params: LaunchParams, setup: PresenterSetup, opener: Option<H>) -> Option<Self> {
        if !params.presenter {
            return None;
        }
        let cursor = SlideCursor::new(setup.total);
        let displayed = setup.notes.lookup(cursor.current()).into_owned();
        Some(Self {
            cursor,
            notes: setup.notes,
            displayed,
            timer: ElapsedTimer::started_at(setup.opened_at, setup.thresholds),
            opener,
        })
    }

    pub fn current(&self) -> usize {
        self.cursor.current()
    }

    pub fn total(&self) -> usize {
        self.cursor.total()
    }

    /// The note currently on display, including its slide number.
    pub fn displayed(&self) -> &SpeakerNote {
        &self.displayed
    }

    pub fn slide_label(&self) -> String {
        format!("Slide {} / {}", self.displayed.slide_index, self.total())
    }

    pub fn target_label(&self) -> String {
        format!("Target: {}", self.displayed.target)
    }

    pub fn timer(&self) -> &ElapsedTimer {
        &self.timer
    }

    pub fn reading_at(&self, now: Instant) -> TimerReading {
        self.timer.reading_at(now)
    }

    /// Apply a message from the deck window. Never sends anything back.
    pub fn receive(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::DeckAdvanced { slide_index } => {
                if self.cursor.go_to(slide_index).is_none() {
                    trace!(slide_index, "deck slide outside local deck, display only");
                }
                self.show(slide_index);
                debug!(slide = slide_index, "presenter following deck");
            }
            SyncMessage::PresenterAdvanced { .. } => {
                trace!("presenter window ignores presenter-advanced");
            }
        }
    }

    pub fn advance(&mut self, step: Step) -> bool {
        match self.cursor.advance(step) {
            Some(_) => {
                self.local_move();
                true
            }
            None => false,
        }
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        match self.cursor.go_to(index) {
            Some(_) => {
                self.local_move();
                true
            }
            None => false,
        }
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.total())
    }

    fn local_move(&mut self) {
        let current = self.cursor.current();
        self.show(current);
        debug!(slide = current, "presenter moved locally");
        if let Some(opener) = &self.opener {
            send_if_open(opener, &SyncMessage::PresenterAdvanced {
                slide_index: current,
            });
        }
    }

    fn show(&mut self, slide_index: usize) {
        self.displayed = self.notes.lookup(slide_index).into_owned();
    }
}
