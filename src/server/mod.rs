//! Quiz server module.
//!
//! One task per connection, each walking its client through the shared
//! read-only quiz bank.

mod server;
mod session;
mod state;

pub use server::{QuizServer, run};
pub use state::{Phase, SessionState, UNEXPECTED_MESSAGE};
