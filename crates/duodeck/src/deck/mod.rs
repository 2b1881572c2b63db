//! Slide navigation and the deck ↔ presenter sync protocol.
//!
//! Nothing in here knows about egui: windows are reached through
//! [`link::WindowHandle`], and displays through [`surface::SlideSurface`].

pub mod channel;
pub mod controller;
pub mod cursor;
pub mod launch;
pub mod link;
pub mod message;
pub mod surface;

pub use controller::{DeckController, PresenterOpen};
pub use cursor::{Move, SlideCursor, Step};
pub use message::SyncMessage;
