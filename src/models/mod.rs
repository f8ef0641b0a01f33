mod bank;
mod question;

pub use bank::QuizBank;
pub use question::QuizItem;
