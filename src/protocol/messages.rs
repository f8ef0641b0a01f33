//! Protocol messages for client-server communication.
//!
//! Every message is one line of `#`-separated fields. The last field of
//! `QUESTION`, `ANSWER` and `ERROR` is free text and may itself contain `#`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Outcome of a single answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "CORRECT",
            Self::Incorrect => "INCORRECT",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CORRECT" => Ok(Self::Correct),
            "INCORRECT" => Ok(Self::Incorrect),
            other => Err(ParseError::InvalidVerdict(other.to_string())),
        }
    }
}

/// Messages exchanged in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Server asks question `number` (1-based).
    Question { number: usize, text: String },

    /// Client answers question `number`.
    Answer { number: usize, text: String },

    /// Server grades the answer to question `number`.
    Result { number: usize, verdict: Verdict },

    /// Final count of correct answers, sent once the last question is graded.
    Score { total: usize },

    /// Protocol problem reported to the peer. Never closes the connection.
    Error { message: String },

    /// Client leaves before finishing the quiz.
    Quit,
}

impl Message {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question { number, text } => write!(f, "QUESTION#{number}#{text}"),
            Self::Answer { number, text } => write!(f, "ANSWER#{number}#{text}"),
            Self::Result { number, verdict } => write!(f, "RESULT#{number}#{verdict}"),
            Self::Score { total } => write!(f, "SCORE#{total}"),
            Self::Error { message } => write!(f, "ERROR#{message}"),
            Self::Quit => f.write_str("QUIT"),
        }
    }
}

/// A line that is not a well-formed message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty message.")]
    Empty,

    #[error("Message is not valid UTF-8.")]
    InvalidUtf8,

    #[error("Unknown message type: {0}")]
    UnknownKind(String),

    #[error("{kind} is missing its {field} field.")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("{kind} has an extra field.")]
    ExtraField { kind: &'static str },

    #[error("Invalid number in {kind}: {value}")]
    InvalidNumber { kind: &'static str, value: String },

    #[error("Invalid verdict: {0}")]
    InvalidVerdict(String),
}

impl FromStr for Message {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let (kind, rest) = match line.split_once('#') {
            Some((kind, rest)) => (kind, Some(rest)),
            None => (line, None),
        };

        match kind {
            "QUESTION" => {
                let (number, text) = numbered("QUESTION", rest)?;
                Ok(Self::Question {
                    number,
                    text: text.to_string(),
                })
            }
            "ANSWER" => {
                let (number, text) = numbered("ANSWER", rest)?;
                Ok(Self::Answer {
                    number,
                    text: text.to_string(),
                })
            }
            "RESULT" => {
                let (number, verdict) = numbered("RESULT", rest)?;
                Ok(Self::Result {
                    number,
                    verdict: verdict.parse()?,
                })
            }
            "SCORE" => {
                let total = rest.ok_or(ParseError::MissingField {
                    kind: "SCORE",
                    field: "total",
                })?;
                if total.contains('#') {
                    return Err(ParseError::ExtraField { kind: "SCORE" });
                }
                Ok(Self::Score {
                    total: parse_number("SCORE", total)?,
                })
            }
            "ERROR" => {
                let message = rest.ok_or(ParseError::MissingField {
                    kind: "ERROR",
                    field: "message",
                })?;
                Ok(Self::error(message))
            }
            "QUIT" => match rest {
                None => Ok(Self::Quit),
                Some(_) => Err(ParseError::ExtraField { kind: "QUIT" }),
            },
            other => Err(ParseError::UnknownKind(other.to_string())),
        }
    }
}

/// Split `<n>#<payload>`; only the first `#` separates, the payload keeps the rest.
fn numbered<'a>(kind: &'static str, rest: Option<&'a str>) -> Result<(usize, &'a str), ParseError> {
    let rest = rest.ok_or(ParseError::MissingField {
        kind,
        field: "number",
    })?;
    let (number, payload) = rest.split_once('#').ok_or(ParseError::MissingField {
        kind,
        field: "payload",
    })?;

    let number = parse_number(kind, number)?;
    if number == 0 {
        return Err(ParseError::InvalidNumber {
            kind,
            value: "0".to_string(),
        });
    }

    Ok((number, payload))
}

fn parse_number(kind: &'static str, value: &str) -> Result<usize, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        kind,
        value: value.to_string(),
    })
}
