//! The presenter window: speaker notes, elapsed timer, and a slide cursor
//! kept in step with the deck window.

pub mod timer;
pub mod view;

pub use timer::{ElapsedTimer, Severity, TimerThresholds};
pub use view::{PresenterSetup, PresenterView};
