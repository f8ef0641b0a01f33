//! Quiz bank loading.
//!
//! The plain-text format has one `<question>?<answer>` pair per line. Files
//! ending in `.json` are read as an array of `{ "question", "answer" }`
//! objects instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::{QuizBank, QuizItem};

pub const DEFAULT_QUIZ_PATH: &str = "quiz.txt";

/// Error type for quiz loading operations.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a quiz bank from `path`, picking the format from the file extension.
pub fn load_quiz_bank<P: AsRef<Path>>(path: P) -> Result<QuizBank, LoadError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_quiz_json(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        Ok(parse_quiz_text(&content))
    }
}

/// Parse the line-based `question?answer` format, skipping malformed lines.
pub fn parse_quiz_text(content: &str) -> QuizBank {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let item = parse_line(line);
            if item.is_none() && !line.trim().is_empty() {
                debug!(line = i + 1, "skipping malformed quiz line");
            }
            item
        })
        .collect::<Vec<_>>()
        .into()
}

/// Parse a JSON array of items, held to the same rules as text lines.
pub fn parse_quiz_json(content: &str) -> Result<QuizBank, serde_json::Error> {
    let items: Vec<QuizItem> = serde_json::from_str(content)?;
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let cleaned = clean_item(&item.question, &item.answer);
            if cleaned.is_none() {
                debug!(index = i, "skipping blank quiz item");
            }
            cleaned
        })
        .collect::<Vec<_>>()
        .into())
}

/// A line counts only if it splits into exactly two non-blank parts on `?`.
fn parse_line(line: &str) -> Option<QuizItem> {
    let mut parts = line.split('?');
    let question = parts.next()?;
    let answer = parts.next()?;

    if parts.next().is_some() {
        return None;
    }

    clean_item(question, answer)
}

fn clean_item(question: &str, answer: &str) -> Option<QuizItem> {
    let (question, answer) = (question.trim(), answer.trim());
    if question.is_empty() || answer.is_empty() {
        return None;
    }

    Some(QuizItem::new(question, answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("Capital of France ? Paris"),
            Some(QuizItem::new("Capital of France", "Paris"))
        );
        assert_eq!(parse_line("no question mark here"), None);
        assert_eq!(parse_line("a?b?c"), None);
        assert_eq!(parse_line("dangling?"), None);
        assert_eq!(parse_line("?orphan"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_parse_quiz_text_keeps_order_and_skips_bad_lines() {
        let bank = parse_quiz_text("2+2?4\nno question mark here\n\na?b?c\nCapital of France?Paris\n");
        let questions: Vec<_> = bank.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(questions, ["2+2", "Capital of France"]);
    }

    #[test]
    fn test_parse_quiz_json() {
        let bank = parse_quiz_json(r#"[{"question": "2+2", "answer": "4"}]"#).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(1), Some(&QuizItem::new("2+2", "4")));

        assert!(parse_quiz_json(r#"{"question": "2+2"}"#).is_err());
    }

    #[test]
    fn test_parse_quiz_json_trims_and_skips_blank_items() {
        let bank = parse_quiz_json(
            r#"[
                {"question": "  Capital of France ", "answer": " Paris "},
                {"question": "   ", "answer": "4"},
                {"question": "2+2", "answer": ""}
            ]"#,
        )
        .unwrap();

        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(1), Some(&QuizItem::new("Capital of France", "Paris")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_quiz_bank("definitely/not/here/quiz.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
