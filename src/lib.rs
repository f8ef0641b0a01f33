//! # hash-quiz
//!
//! A multi-client quiz game over a line-based TCP protocol.
//!
//! The server asks every connected client the same questions in order, one
//! `QUESTION#<n>#<text>` line at a time, grades each `ANSWER#<n>#<text>` and
//! finishes with `SCORE#<total>`. A client that sends `QUIT` mid-quiz stops
//! the server from accepting anyone else; clients already playing finish
//! undisturbed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hash_quiz::config::{Endpoint, ServerConfig};
//! use hash_quiz::{QuizError, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = ServerConfig::new(Endpoint::load_or_default("server_info.txt"));
//!     server::run(config, "quiz.txt").await
//! }
//! ```

pub mod client;
pub mod config;
mod data;
mod models;
pub mod protocol;
pub mod server;
pub mod terminal;

use std::io;

use thiserror::Error;

pub use data::{DEFAULT_QUIZ_PATH, LoadError, load_quiz_bank, parse_quiz_json, parse_quiz_text};
pub use models::{QuizBank, QuizItem};
pub use protocol::{CodecError, Message, ParseError, Verdict};

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The server could not listen on its configured address.
    #[error("failed to bind {endpoint}: {source}")]
    Bind {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// The client could not reach the server.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("connection error: {0}")]
    Codec(#[from] CodecError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
