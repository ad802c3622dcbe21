// Learn with AI: assistant chat with PDF context, and generated quizzes.

pub mod chat;
pub mod quiz;

pub use chat::{ChatRole, ChatSession};
pub use quiz::Quiz;
