use std::time::Instant;

use super::cursor::{Move, SlideCursor, Step};

/// The display hooks a deck window exposes to its controller.
///
/// The controller only writes to a surface, it never reads back.
pub trait SlideSurface {
    /// Make `transition.to` the visible slide.
    fn show_slide(&mut self, transition: Move);
    fn set_counter(&mut self, text: &str);
    /// Progress bar width as a fraction of the full width.
    fn set_progress(&mut self, fraction: f32);
    fn set_navigation(&mut self, back_enabled: bool, forward_enabled: bool);
}

/// Push every side effect of a move onto the surface.
pub fn apply<S: SlideSurface + ?Sized>(surface: &mut S, cursor: &SlideCursor, transition: Move) {
    surface.show_slide(transition);
    surface.set_counter(&cursor.counter_label());
    surface.set_progress(cursor.progress());
    surface.set_navigation(!cursor.is_first(), !cursor.is_last());
}

/// Retained surface state, painted by the app each frame.
#[derive(Debug, Clone)]
pub struct SurfaceState {
    pub active: usize,
    /// Slide that left towards the back on the last forward move.
    pub behind: Option<usize>,
    pub last_move: Option<Move>,
    pub changed_at: Option<Instant>,
    pub counter: String,
    pub progress: f32,
    pub back_enabled: bool,
    pub forward_enabled: bool,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            active: 1,
            behind: None,
            last_move: None,
            changed_at: None,
            counter: String::new(),
            progress: 0.0,
            back_enabled: false,
            forward_enabled: false,
        }
    }
}

impl SlideSurface for SurfaceState {
    fn show_slide(&mut self, transition: Move) {
        if transition.from == transition.to {
            self.active = transition.to;
            return;
        }
        self.behind = match transition.direction() {
            Step::Forward => Some(transition.from),
            Step::Back => None,
        };
        self.active = transition.to;
        self.last_move = Some(transition);
        self.changed_at = Some(Instant::now());
    }

    fn set_counter(&mut self, text: &str) {
        self.counter = text.to_string();
    }

    fn set_progress(&mut self, fraction: f32) {
        self.progress = fraction.clamp(0.0, 1.0);
    }

    fn set_navigation(&mut self, back_enabled: bool, forward_enabled: bool) {
        self.back_enabled = back_enabled;
        self.forward_enabled = forward_enabled;
    }
}
