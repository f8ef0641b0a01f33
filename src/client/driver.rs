//! Protocol driver shared by every client front-end.

use std::future::Future;
use std::io;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info};

use crate::QuizError;
use crate::config::Endpoint;
use crate::protocol::{QuizCodec, Verdict};

use super::session::{ClientEvent, ClientSession};

/// What a client front-end has to provide.
pub trait Frontend {
    fn question(&mut self, number: usize, text: &str) -> io::Result<()>;

    fn result(&mut self, number: usize, verdict: Verdict) -> io::Result<()>;

    fn score(&mut self, total: usize) -> io::Result<()>;

    /// Shown as `ERROR: <message>`; the quiz goes on.
    fn error(&mut self, message: &str) -> io::Result<()>;

    fn disconnected(&mut self, reason: &str) -> io::Result<()>;

    /// Wait for the player's answer to the question last shown.
    /// `None` means the player gave up.
    fn answer(&mut self) -> impl Future<Output = io::Result<Option<String>>> + Send;
}

/// How a client run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished { score: usize },
    GaveUp,
    Disconnected,
}

pub async fn connect(endpoint: &Endpoint) -> Result<TcpStream, QuizError> {
    TcpStream::connect((endpoint.host.as_str(), endpoint.port))
        .await
        .map_err(|source| QuizError::Connect {
            endpoint: endpoint.to_string(),
            source,
        })
}

/// Play one quiz over `stream`, routing everything through `frontend`.
///
/// After `SCORE` the driver sends `QUIT` and closes without waiting for the
/// server.
pub async fn drive<S, F>(stream: S, frontend: &mut F) -> Result<Outcome, QuizError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: Frontend,
{
    let mut framed = Framed::new(stream, QuizCodec::new());
    let mut session = ClientSession::new();
    session.connected();

    loop {
        let incoming = match framed.next().await {
            Some(Ok(incoming)) => incoming,
            Some(Err(e)) => {
                frontend.disconnected(&format!("Connection lost: {e}"))?;
                return Err(e.into());
            }
            None => {
                frontend.disconnected("Connection closed by server")?;
                return Ok(Outcome::Disconnected);
            }
        };

        match session.handle(incoming) {
            ClientEvent::Question { number, text } => {
                frontend.question(number, &text)?;

                let Some(answer) = frontend.answer().await? else {
                    info!(question = number, "giving up");
                    framed.send(session.quit()).await?;
                    framed.close().await?;
                    return Ok(Outcome::GaveUp);
                };

                if let Some(msg) = session.submit(answer) {
                    framed.send(msg).await?;
                }
            }
            ClientEvent::Result { number, verdict } => {
                frontend.result(number, verdict)?;
            }
            ClientEvent::Score { total } => {
                frontend.score(total)?;

                // The server has already closed its side; nothing comes back.
                if let Err(e) = framed.send(session.quit()).await {
                    debug!(error = %e, "QUIT after score not delivered");
                }
                return Ok(Outcome::Finished { score: total });
            }
            ClientEvent::Error { message } => {
                frontend.error(&message)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<Option<String>>,
        shown: Vec<String>,
    }

    impl Frontend for Scripted {
        fn question(&mut self, number: usize, text: &str) -> io::Result<()> {
            self.shown.push(format!("Q{number} {text}"));
            Ok(())
        }

        fn result(&mut self, number: usize, verdict: Verdict) -> io::Result<()> {
            self.shown.push(format!("R{number} {verdict}"));
            Ok(())
        }

        fn score(&mut self, total: usize) -> io::Result<()> {
            self.shown.push(format!("S {total}"));
            Ok(())
        }

        fn error(&mut self, message: &str) -> io::Result<()> {
            self.shown.push(format!("E {message}"));
            Ok(())
        }

        fn disconnected(&mut self, reason: &str) -> io::Result<()> {
            self.shown.push(format!("D {reason}"));
            Ok(())
        }

        async fn answer(&mut self) -> io::Result<Option<String>> {
            Ok(self.answers.pop_front().flatten())
        }
    }

    #[tokio::test]
    async fn test_drive_answers_then_quits_after_score() {
        let (client, server) = tokio::io::duplex(1024);
        let (server_read, mut server_write) = tokio::io::split(server);

        let peer = tokio::spawn(async move {
            let mut lines = BufReader::new(server_read).lines();
            server_write.write_all(b"QUESTION#1#2+2\n").await.unwrap();
            let answer = lines.next_line().await.unwrap().unwrap();
            server_write
                .write_all(b"RESULT#1#CORRECT\nERROR#just so you know\nSCORE#1\n")
                .await
                .unwrap();
            let quit = lines.next_line().await.unwrap().unwrap();
            (answer, quit)
        });

        let mut frontend = Scripted {
            answers: VecDeque::from([Some("4".to_string())]),
            ..Default::default()
        };
        let outcome = drive(client, &mut frontend).await.unwrap();

        assert_eq!(outcome, Outcome::Finished { score: 1 });
        assert_eq!(
            frontend.shown,
            ["Q1 2+2", "R1 CORRECT", "E just so you know", "S 1"]
        );

        let (answer, quit) = peer.await.unwrap();
        assert_eq!(answer, "ANSWER#1#4");
        assert_eq!(quit, "QUIT");
    }

    #[tokio::test]
    async fn test_drive_gives_up_with_quit() {
        let (client, server) = tokio::io::duplex(1024);
        let (server_read, mut server_write) = tokio::io::split(server);

        let peer = tokio::spawn(async move {
            server_write.write_all(b"QUESTION#1#2+2\n").await.unwrap();
            let mut lines = BufReader::new(server_read).lines();
            lines.next_line().await.unwrap()
        });

        let mut frontend = Scripted {
            answers: VecDeque::from([None]),
            ..Default::default()
        };
        let outcome = drive(client, &mut frontend).await.unwrap();

        assert_eq!(outcome, Outcome::GaveUp);
        assert_eq!(peer.await.unwrap().as_deref(), Some("QUIT"));
    }

    #[tokio::test]
    async fn test_drive_reports_early_close() {
        let (client, server) = tokio::io::duplex(1024);
        drop(server);

        let mut frontend = Scripted::default();
        let outcome = drive(client, &mut frontend).await.unwrap();

        assert_eq!(outcome, Outcome::Disconnected);
        assert_eq!(frontend.shown, ["D Connection closed by server"]);
    }
}
