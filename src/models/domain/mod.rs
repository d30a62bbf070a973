pub mod chat_message;
pub mod question;
pub mod settings;
pub use chat_message::{ChatMessage, ChatRole};
pub use question::{Question, QuestionKind};
pub use settings::{Difficulty, QuestionType, Settings};
