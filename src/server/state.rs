//! Per-connection quiz state.
//!
//! [`SessionState`] is the pure transition function of a session: it takes
//! decoded client messages and returns the replies to write. The socket loop
//! in `session.rs` owns one of these and nothing else touches it.

use std::sync::Arc;

use crate::models::QuizBank;
use crate::protocol::{Message, ParseError, Verdict};

/// Reply sent when a client says something other than the expected answer.
pub const UNEXPECTED_MESSAGE: &str = "Unexpected message.";

/// Where a session is in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the answer to question `n` (1-based).
    AwaitingAnswer(usize),
    /// Every question was answered and the score was sent.
    Completed,
    /// The client quit before finishing. No score is sent.
    Aborted,
}

impl Phase {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

/// State of one client working through the quiz.
#[derive(Debug)]
pub struct SessionState {
    bank: Arc<QuizBank>,
    answered: usize,
    score: usize,
    phase: Phase,
}

impl SessionState {
    /// Create a session and return the opening messages.
    ///
    /// With an empty bank the session is complete immediately and the only
    /// message is `SCORE#0`.
    pub fn start(bank: Arc<QuizBank>) -> (Self, Vec<Message>) {
        let mut state = Self {
            bank,
            answered: 0,
            score: 0,
            phase: Phase::Completed,
        };
        let replies = state.advance_to(1);
        (state, replies)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of questions fully graded so far.
    pub fn answered(&self) -> usize {
        self.answered
    }

    /// Apply one line received from the client.
    ///
    /// Anything other than the answer to the current question or `QUIT`
    /// gets an `ERROR#` reply and the current question again; the session
    /// never skips a question.
    pub fn handle(&mut self, incoming: Result<Message, ParseError>) -> Vec<Message> {
        let Phase::AwaitingAnswer(current) = self.phase else {
            return Vec::new();
        };

        match incoming {
            Ok(Message::Answer { number, text }) if number == current => {
                let correct = self
                    .bank
                    .get(current)
                    .is_some_and(|item| item.accepts(&text));
                self.answered += 1;
                if correct {
                    self.score += 1;
                }

                let mut replies = vec![Message::Result {
                    number: current,
                    verdict: Verdict::from_correct(correct),
                }];
                replies.extend(self.advance_to(current + 1));
                replies
            }
            Ok(Message::Quit) => {
                self.phase = Phase::Aborted;
                Vec::new()
            }
            Ok(_) => self.reprompt(current, Message::error(UNEXPECTED_MESSAGE)),
            Err(e) => self.reprompt(current, Message::error(e.to_string())),
        }
    }

    fn advance_to(&mut self, number: usize) -> Vec<Message> {
        match self.bank.get(number) {
            Some(item) => {
                self.phase = Phase::AwaitingAnswer(number);
                vec![Message::Question {
                    number,
                    text: item.question.clone(),
                }]
            }
            None => {
                self.phase = Phase::Completed;
                vec![Message::Score { total: self.score }]
            }
        }
    }

    fn reprompt(&self, number: usize, error: Message) -> Vec<Message> {
        let mut replies = vec![error];
        if let Some(item) = self.bank.get(number) {
            replies.push(Message::Question {
                number,
                text: item.question.clone(),
            });
        }
        replies
    }
}
