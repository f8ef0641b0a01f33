//! Quiz client module.
//!
//! [`drive`] speaks the protocol; a [`Frontend`] decides how questions are
//! shown and answers collected. Two front-ends ship: a plain console one and
//! a full-screen terminal one.

pub mod console;
mod driver;
mod session;
mod state;
pub mod tui;
mod ui;

pub use console::ConsoleFrontend;
pub use driver::{Frontend, Outcome, connect, drive};
pub use session::{ClientEvent, ClientPhase, ClientSession};
pub use state::{ClientApp, KeyAction, Screen, UiEvent};
