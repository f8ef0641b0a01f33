//! Socket loop for one connected client.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::models::QuizBank;
use crate::protocol::{CodecError, Message, QuizCodec};

use super::state::{Phase, SessionState};

#[derive(Debug, Error)]
enum SessionError {
    #[error("client disconnected after {answered} answers")]
    Disconnected { answered: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Drive one client through the quiz, then close the connection.
///
/// `quit_signal` is cancelled when the client quits mid-quiz; it is `None`
/// when the server keeps accepting regardless.
#[instrument(name = "session", skip_all, fields(id = %Uuid::new_v4(), peer = %peer))]
pub(super) async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    bank: Arc<QuizBank>,
    quit_signal: Option<CancellationToken>,
) {
    info!("client connected");

    match serve(stream, bank).await {
        Ok(state) if state.phase() == Phase::Aborted => {
            info!(answered = state.answered(), "client quit");
            if let Some(signal) = quit_signal {
                info!("stopping listener after client quit");
                signal.cancel();
            }
        }
        Ok(state) => {
            info!(score = state.score(), answered = state.answered(), "quiz completed");
        }
        Err(e @ SessionError::Disconnected { .. }) => {
            info!("{e}");
        }
        Err(e) => {
            warn!(error = %e, "connection error");
        }
    }
}

async fn serve(stream: TcpStream, bank: Arc<QuizBank>) -> Result<SessionState, SessionError> {
    let mut framed = Framed::new(stream, QuizCodec::new());

    let (mut state, opening) = SessionState::start(bank);
    send_all(&mut framed, opening).await?;

    while !state.phase().is_finished() {
        let Some(incoming) = framed.next().await else {
            return Err(SessionError::Disconnected {
                answered: state.answered(),
            });
        };
        let incoming = incoming?;

        match &incoming {
            Ok(msg) => debug!(%msg, "received"),
            Err(e) => debug!(error = %e, "malformed message"),
        }

        let replies = state.handle(incoming);
        send_all(&mut framed, replies).await?;
    }

    framed.close().await?;
    Ok(state)
}

async fn send_all(
    framed: &mut Framed<TcpStream, QuizCodec>,
    replies: Vec<Message>,
) -> Result<(), CodecError> {
    for msg in replies {
        framed.feed(msg).await?;
    }
    framed.flush().await
}
