//! Client side of the quiz protocol, independent of any front-end.

use crate::protocol::{Message, ParseError, Verdict};

/// Where the client is in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientPhase {
    /// Not connected yet.
    Idle,
    /// Connected, waiting for the server's next question.
    WaitingForQuestion,
    /// Question `n` is on screen and has not been answered.
    HasQuestion(usize),
    /// Score received or the player gave up.
    Done,
}

/// What a server line means for the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Question { number: usize, text: String },
    Result { number: usize, verdict: Verdict },
    Score { total: usize },
    /// Either an `ERROR#` from the server or a line we could not make sense of.
    Error { message: String },
}

#[derive(Debug)]
pub struct ClientSession {
    phase: ClientPhase,
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            phase: ClientPhase::Idle,
        }
    }

    pub fn phase(&self) -> ClientPhase {
        self.phase
    }

    pub fn connected(&mut self) {
        self.phase = ClientPhase::WaitingForQuestion;
    }

    /// Apply one line received from the server.
    pub fn handle(&mut self, incoming: Result<Message, ParseError>) -> ClientEvent {
        match incoming {
            Ok(Message::Question { number, text }) => {
                self.phase = ClientPhase::HasQuestion(number);
                ClientEvent::Question { number, text }
            }
            Ok(Message::Result { number, verdict }) => ClientEvent::Result { number, verdict },
            Ok(Message::Score { total }) => {
                self.phase = ClientPhase::Done;
                ClientEvent::Score { total }
            }
            Ok(Message::Error { message }) => ClientEvent::Error { message },
            Ok(other) => ClientEvent::Error {
                message: format!("Unexpected message from server: {other}"),
            },
            Err(e) => ClientEvent::Error {
                message: format!("Malformed message from server: {e}"),
            },
        }
    }

    /// Build the answer to the current question, if there is one.
    pub fn submit(&mut self, text: impl Into<String>) -> Option<Message> {
        let ClientPhase::HasQuestion(number) = self.phase else {
            return None;
        };
        self.phase = ClientPhase::WaitingForQuestion;
        Some(Message::Answer {
            number,
            text: text.into(),
        })
    }

    pub fn quit(&mut self) -> Message {
        self.phase = ClientPhase::Done;
        Message::Quit
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}
