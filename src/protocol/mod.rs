//! Wire protocol shared by the server and its clients.

mod codec;
mod messages;

pub use codec::{CodecError, MAX_LINE_LENGTH, QuizCodec};
pub use messages::{Message, ParseError, Verdict};

/// Default server host when no config is available.
pub const DEFAULT_HOST: &str = "localhost";

/// Default server port when no config is available.
pub const DEFAULT_PORT: u16 = 1234;
