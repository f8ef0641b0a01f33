use super::QuizItem;

/// The ordered, read-only set of questions a server instance asks.
///
/// Questions are numbered from 1 on the wire; [`QuizBank::get`] takes that
/// number directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizBank {
    items: Vec<QuizItem>,
}

impl QuizBank {
    pub fn new(items: Vec<QuizItem>) -> Self {
        Self { items }
    }

    /// Look up a question by its 1-based number.
    pub fn get(&self, number: usize) -> Option<&QuizItem> {
        number.checked_sub(1).and_then(|index| self.items.get(index))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuizItem> {
        self.items.iter()
    }
}

impl From<Vec<QuizItem>> for QuizBank {
    fn from(items: Vec<QuizItem>) -> Self {
        Self::new(items)
    }
}
