//! TCP server implementation.

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::QuizError;
use crate::config::ServerConfig;
use crate::data::load_quiz_bank;
use crate::models::QuizBank;

use super::session::handle_connection;

/// A bound quiz server that has not started accepting yet.
pub struct QuizServer {
    listener: TcpListener,
    bank: Arc<QuizBank>,
    shutdown_on_quit: bool,
    shutdown: CancellationToken,
    sessions: TaskTracker,
}

impl QuizServer {
    /// Bind the configured host and port.
    pub async fn bind(config: ServerConfig, bank: QuizBank) -> Result<Self, QuizError> {
        let endpoint = config.endpoint;
        let listener = TcpListener::bind((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(|source| QuizError::Bind {
                endpoint: endpoint.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            bank: Arc::new(bank),
            shutdown_on_quit: config.shutdown_on_quit,
            shutdown: CancellationToken::new(),
            sessions: TaskTracker::new(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Token that stops the accept loop when cancelled. Sessions already
    /// running are not affected.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Accept clients until shut down, then wait for running sessions.
    pub async fn run(self) {
        let Self {
            listener,
            bank,
            shutdown_on_quit,
            shutdown,
            sessions,
        } = self;

        match listener.local_addr() {
            Ok(addr) => info!(%addr, questions = bank.len(), "quiz server listening"),
            Err(e) => warn!(error = %e, "quiz server listening on unknown address"),
        }

        let quit_signal = shutdown_on_quit.then(|| shutdown.clone());

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        sessions.spawn(handle_connection(
                            stream,
                            peer,
                            Arc::clone(&bank),
                            quit_signal.clone(),
                        ));
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                    }
                },
            }
        }

        drop(listener);
        sessions.close();
        info!(in_flight = sessions.len(), "listener closed, waiting for running sessions");
        sessions.wait().await;
        info!("server stopped");
    }
}

/// Load the quiz bank and serve it until a client quits.
pub async fn run<P: AsRef<Path>>(config: ServerConfig, quiz_path: P) -> Result<(), QuizError> {
    let quiz_path = quiz_path.as_ref();
    let bank = match load_quiz_bank(quiz_path) {
        Ok(bank) => {
            info!(path = %quiz_path.display(), questions = bank.len(), "quiz loaded");
            bank
        }
        Err(e) => {
            warn!(error = %e, "starting with an empty quiz");
            QuizBank::default()
        }
    };

    let server = QuizServer::bind(config, bank).await?;
    let shutdown = server.shutdown_token();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, stopping listener");
            shutdown.cancel();
        }
    });

    server.run().await;
    Ok(())
}
