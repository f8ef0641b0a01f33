//! Full-screen terminal client.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;

use crate::QuizError;
use crate::config::Endpoint;
use crate::protocol::Verdict;
use crate::terminal::TerminalGuard;

use super::driver::{Frontend, Outcome, connect, drive};
use super::state::{ClientApp, KeyAction, UiEvent};
use super::ui;

/// How long to let the driver say goodbye after the screen closes.
const DRIVER_GRACE: Duration = Duration::from_millis(500);

/// Bridges the protocol driver task and the terminal loop.
pub struct TuiFrontend {
    events: mpsc::UnboundedSender<UiEvent>,
    answers: mpsc::UnboundedReceiver<Option<String>>,
}

impl TuiFrontend {
    fn show(&self, event: UiEvent) -> io::Result<()> {
        self.events
            .send(event)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
    }
}

impl Frontend for TuiFrontend {
    fn question(&mut self, number: usize, text: &str) -> io::Result<()> {
        self.show(UiEvent::Question {
            number,
            text: text.to_string(),
        })
    }

    fn result(&mut self, number: usize, verdict: Verdict) -> io::Result<()> {
        self.show(UiEvent::Result { number, verdict })
    }

    fn score(&mut self, total: usize) -> io::Result<()> {
        self.show(UiEvent::Score { total })
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        self.show(UiEvent::Error(message.to_string()))
    }

    fn disconnected(&mut self, reason: &str) -> io::Result<()> {
        self.show(UiEvent::Disconnected(reason.to_string()))
    }

    async fn answer(&mut self) -> io::Result<Option<String>> {
        // A closed channel means the terminal loop is gone; give up.
        Ok(self.answers.recv().await.flatten())
    }
}

/// Run the terminal client against `endpoint`.
pub async fn run(endpoint: &Endpoint) -> Result<Option<Outcome>, QuizError> {
    let stream = connect(endpoint).await?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (answer_tx, answer_rx) = mpsc::unbounded_channel();
    let mut frontend = TuiFrontend {
        events: event_tx,
        answers: answer_rx,
    };

    let mut driver = tokio::spawn(async move { drive(stream, &mut frontend).await });

    let app = ClientApp::new(endpoint.to_string());
    run_tui(app, event_rx, answer_tx)?;

    // The answer channel is closed now, so a driver waiting for input gives
    // up and sends QUIT. One still waiting on the server is abandoned.
    match tokio::time::timeout(DRIVER_GRACE, &mut driver).await {
        Ok(Ok(outcome)) => outcome.map(Some),
        Ok(Err(e)) => Err(io::Error::other(e).into()),
        Err(_) => {
            driver.abort();
            Ok(None)
        }
    }
}

fn run_tui(
    mut app: ClientApp,
    mut events: mpsc::UnboundedReceiver<UiEvent>,
    answers: mpsc::UnboundedSender<Option<String>>,
) -> io::Result<()> {
    let mut terminal = TerminalGuard::enter()?;

    while !app.should_quit {
        while let Ok(event) = events.try_recv() {
            app.apply(event);
        }

        terminal.draw(|frame| ui::render(frame, &app))?;

        // Poll so driver events keep flowing while no key is pressed.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match app.on_key(key.code) {
                    KeyAction::Submit(answer) => {
                        let _ = answers.send(Some(answer));
                    }
                    KeyAction::GiveUp => {
                        let _ = answers.send(None);
                    }
                    KeyAction::Exit | KeyAction::None => {}
                }
            }
        }
    }

    Ok(())
}
