mod loader;

pub use loader::{DEFAULT_QUIZ_PATH, LoadError, load_quiz_bank, parse_quiz_json, parse_quiz_text};
