//! Terminal client state management.

use crossterm::event::KeyCode;

use crate::protocol::Verdict;

/// Something the protocol driver wants the screen to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Question { number: usize, text: String },
    Result { number: usize, verdict: Verdict },
    Score { total: usize },
    Error(String),
    Disconnected(String),
}

/// Current screen of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Connected, no question received yet.
    Waiting,

    /// Answering questions.
    Quiz {
        number: usize,
        text: String,
        /// Answer already sent, waiting for the server.
        submitted: bool,
    },

    /// Final score received.
    Finished { score: usize },

    /// Connection ended before a score arrived.
    Disconnected { message: String },
}

/// What a key press asks the terminal loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Submit(String),
    GiveUp,
    Exit,
}

/// Client application state.
pub struct ClientApp {
    pub screen: Screen,
    /// Text typed into the answer field.
    pub input: String,
    /// Graded answers, oldest first.
    pub results: Vec<(usize, Verdict)>,
    /// Last error or hint, cleared on the next key press.
    pub notice: Option<String>,
    pub server_addr: String,
    pub should_quit: bool,
}

impl ClientApp {
    pub fn new(server_addr: String) -> Self {
        Self {
            screen: Screen::Waiting,
            input: String::new(),
            results: Vec::new(),
            notice: None,
            server_addr,
            should_quit: false,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, verdict)| *verdict == Verdict::Correct)
            .count()
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Question { number, text } => {
                self.screen = Screen::Quiz {
                    number,
                    text,
                    submitted: false,
                };
            }
            UiEvent::Result { number, verdict } => {
                self.results.push((number, verdict));
            }
            UiEvent::Score { total } => {
                self.screen = Screen::Finished { score: total };
            }
            UiEvent::Error(message) => {
                self.notice = Some(format!("ERROR: {message}"));
            }
            UiEvent::Disconnected(message) => {
                // A score screen stays up even if the socket drops afterwards.
                if !matches!(self.screen, Screen::Finished { .. }) {
                    self.screen = Screen::Disconnected { message };
                }
            }
        }
    }

    pub fn on_key(&mut self, key: KeyCode) -> KeyAction {
        match &mut self.screen {
            Screen::Waiting => match key {
                KeyCode::Esc => {
                    self.should_quit = true;
                    KeyAction::GiveUp
                }
                _ => KeyAction::None,
            },
            Screen::Quiz { submitted, .. } => match key {
                KeyCode::Char(c) => {
                    self.notice = None;
                    self.input.push(c);
                    KeyAction::None
                }
                KeyCode::Backspace => {
                    self.notice = None;
                    self.input.pop();
                    KeyAction::None
                }
                KeyCode::Enter => {
                    let answer = self.input.trim();
                    if answer.is_empty() {
                        self.notice = Some("Please enter an answer!".to_string());
                        KeyAction::None
                    } else if *submitted {
                        self.notice = Some("No active question!".to_string());
                        KeyAction::None
                    } else {
                        let answer = answer.to_string();
                        *submitted = true;
                        self.input.clear();
                        self.notice = None;
                        KeyAction::Submit(answer)
                    }
                }
                KeyCode::Esc => {
                    self.should_quit = true;
                    KeyAction::GiveUp
                }
                _ => KeyAction::None,
            },
            Screen::Finished { .. } | Screen::Disconnected { .. } => match key {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter => {
                    self.should_quit = true;
                    KeyAction::Exit
                }
                _ => KeyAction::None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(app: &mut ClientApp, text: &str) {
        for c in text.chars() {
            app.on_key(KeyCode::Char(c));
        }
    }

    fn app_with_question() -> ClientApp {
        let mut app = ClientApp::new("localhost:1234".to_string());
        app.apply(UiEvent::Question {
            number: 1,
            text: "2+2".to_string(),
        });
        app
    }

    #[test]
    fn test_submit_sends_trimmed_input_once() {
        let mut app = app_with_question();
        type_text(&mut app, " 4 ");
        assert_eq!(app.on_key(KeyCode::Enter), KeyAction::Submit("4".to_string()));
        assert!(app.input.is_empty());

        type_text(&mut app, "5");
        assert_eq!(app.on_key(KeyCode::Enter), KeyAction::None);
        assert_eq!(app.notice.as_deref(), Some("No active question!"));
    }

    #[test]
    fn test_empty_answer_is_rejected() {
        let mut app = app_with_question();
        type_text(&mut app, "   ");
        assert_eq!(app.on_key(KeyCode::Enter), KeyAction::None);
        assert_eq!(app.notice.as_deref(), Some("Please enter an answer!"));

        app.on_key(KeyCode::Backspace);
        assert_eq!(app.notice, None);
    }

    #[test]
    fn test_escape_gives_up() {
        let mut app = app_with_question();
        assert_eq!(app.on_key(KeyCode::Esc), KeyAction::GiveUp);
        assert!(app.should_quit);
    }

    #[test]
    fn test_events_update_screen() {
        let mut app = app_with_question();
        app.apply(UiEvent::Result {
            number: 1,
            verdict: Verdict::Correct,
        });
        app.apply(UiEvent::Error("Unexpected message.".to_string()));
        assert_eq!(app.notice.as_deref(), Some("ERROR: Unexpected message."));
        assert!(matches!(app.screen, Screen::Quiz { number: 1, .. }));

        app.apply(UiEvent::Score { total: 1 });
        app.apply(UiEvent::Disconnected("Connection closed by server".to_string()));
        assert_eq!(app.screen, Screen::Finished { score: 1 });
        assert_eq!(app.correct_count(), 1);

        assert_eq!(app.on_key(KeyCode::Char('q')), KeyAction::Exit);
    }
}
