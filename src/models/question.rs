use serde::Deserialize;

/// A single question with the answer the server expects for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub answer: String,
}

impl QuizItem {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Whether `candidate` matches the expected answer, ignoring case and
    /// surrounding whitespace.
    pub fn accepts(&self, candidate: &str) -> bool {
        normalize(candidate) == normalize(&self.answer)
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
