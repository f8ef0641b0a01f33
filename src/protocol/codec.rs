//! Line framing for [`Message`]s.
//!
//! Lines are split on raw bytes so a line that is not UTF-8 still arrives as
//! an item and can be answered with `ERROR#`.

use std::io;

use bytes::{BufMut, BytesMut};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

use super::{Message, ParseError};

/// Longest line either side will buffer before giving up on the peer.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Transport-level failure. Unlike [`ParseError`] this ends the connection.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("line longer than {} bytes", MAX_LINE_LENGTH)]
    LineTooLong,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Decodes lines into `Result<Message, ParseError>` so a malformed line is
/// an ordinary item the session can answer with `ERROR#`.
#[derive(Debug, Clone, Default)]
pub struct QuizCodec {
    /// Bytes of `src` already searched for a newline.
    next_index: usize,
}

impl QuizCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_line(bytes: &[u8]) -> Result<Message, ParseError> {
    std::str::from_utf8(bytes)
        .map_err(|_| ParseError::InvalidUtf8)?
        .parse()
}

impl Decoder for QuizCodec {
    type Item = Result<Message, ParseError>;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

        match newline {
            Some(offset) => {
                let len = self.next_index + offset;
                self.next_index = 0;
                if len > MAX_LINE_LENGTH {
                    return Err(CodecError::LineTooLong);
                }
                let line = src.split_to(len + 1);
                Ok(Some(parse_line(&line[..len])))
            }
            None if src.len() > MAX_LINE_LENGTH => Err(CodecError::LineTooLong),
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }
        if src.is_empty() {
            return Ok(None);
        }

        self.next_index = 0;
        let line = src.split();
        Ok(Some(parse_line(&line)))
    }
}

impl Encoder<Message> for QuizCodec {
    type Error = CodecError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = msg.to_string();
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
