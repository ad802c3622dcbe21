#![allow(dead_code)]

use tracing::{info, warn};

use crate::api_client::RawQuizQuestion;
use crate::errors::AppError;
use crate::notice::Notice;
use crate::state::AppState;

pub const PASS_MARK: f64 = 75.0;

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl From<RawQuizQuestion> for QuizQuestion {
    /// A missing answer defaults to the first option.
    fn from(raw: RawQuizQuestion) -> Self {
        let correct_answer = raw
            .correct_answer
            .filter(|a| !a.trim().is_empty())
            .or_else(|| raw.options.first().cloned())
            .unwrap_or_default();
        Self {
            question: raw.question,
            options: raw.options,
            correct_answer,
        }
    }
}

impl QuizQuestion {
    /// Accepts the option text itself or an option letter ("b"). Text
    /// matches first, so an option literally named "A" is never shadowed.
    pub fn resolve(&self, input: &str) -> String {
        let input = input.trim();
        if let Some(option) = self.options.iter().find(|o| o.trim() == input) {
            return option.clone();
        }
        let mut chars = input.chars();
        if let (Some(letter), None) = (chars.next(), chars.next()) {
            if letter.is_ascii_alphabetic() {
                let index = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
                if let Some(option) = self.options.get(index) {
                    return option.clone();
                }
            }
        }
        input.to_string()
    }
}

/// Label shown before an option: a letter for the first 26, then its number.
pub fn option_label(index: usize) -> String {
    match u32::try_from(index) {
        Ok(offset) if offset < 26 => char::from_u32('A' as u32 + offset)
            .map(String::from)
            .unwrap_or_else(|| (index + 1).to_string()),
        _ => (index + 1).to_string(),
    }
}

/// A generated multiple-choice self-assessment, answered in order.
#[derive(Debug, Clone)]
pub struct Quiz {
    pub topic: String,
    questions: Vec<QuizQuestion>,
    answers: Vec<String>,
}

impl Quiz {
    pub fn new(topic: impl Into<String>, questions: Vec<QuizQuestion>) -> Self {
        Self {
            topic: topic.into(),
            questions,
            answers: Vec::new(),
        }
    }

    pub async fn generate(app: &AppState, topic: &str) -> Result<Quiz, AppError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::Validation("Enter a topic for the quiz".to_string()));
        }

        info!("Generating quiz on {topic}");
        match app.api.generate_quiz(topic).await {
            Ok(raw) => {
                let questions: Vec<QuizQuestion> = raw.into_iter().map(QuizQuestion::from).collect();
                app.notifier.notify(Notice::success(
                    "Assessment Generated",
                    format!(
                        "Successfully created assessment with {} questions on {topic}",
                        questions.len()
                    ),
                ));
                Ok(Quiz::new(topic, questions))
            }
            Err(e) => {
                warn!("Quiz generation failed: {e}");
                app.notifier.notify(Notice::error(
                    "Error",
                    "Failed to generate assessment. Please try again.",
                ));
                Err(e.into())
            }
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// The next unanswered question.
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.answers.len())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= self.questions.len()
    }

    /// Records an answer to the current question; returns whether it was right.
    pub fn answer(&mut self, input: &str) -> Result<bool, AppError> {
        let question = self
            .current()
            .ok_or_else(|| AppError::Validation("All questions are already answered".to_string()))?;
        let answer = question.resolve(input);
        let correct = answer == question.correct_answer;
        self.answers.push(answer);
        Ok(correct)
    }

    pub fn correct_count(&self) -> usize {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| q.correct_answer == **a)
            .count()
    }

    /// Percentage of correct answers, once every question is answered.
    pub fn score(&self) -> Option<f64> {
        if !self.is_complete() || self.questions.is_empty() {
            return None;
        }
        Some(self.correct_count() as f64 / self.questions.len() as f64 * 100.0)
    }

    pub fn passed(&self) -> Option<bool> {
        self.score().map(|score| score >= PASS_MARK)
    }

    pub fn feedback(&self) -> Option<&'static str> {
        self.score().map(|score| {
            if score >= 80.0 {
                "Excellent work! You have a strong understanding of these topics."
            } else if score >= 60.0 {
                "Good job! You have a solid foundation but might benefit from more practice."
            } else {
                "You might need more study in these areas. Consider reviewing the topics again."
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;
    use serde_json::json;

    fn question(options: &[&str], correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: "?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct.to_string(),
        }
    }

    #[test]
    fn test_three_of_four_passes_at_75() {
        let mut quiz = Quiz::new(
            "Rust",
            vec![
                question(&["a", "b"], "a"),
                question(&["a", "b"], "b"),
                question(&["a", "b"], "a"),
                question(&["a", "b"], "b"),
            ],
        );
        assert!(quiz.answer("a").unwrap());
        assert!(quiz.answer("B").unwrap());
        assert!(quiz.answer("a").unwrap());
        assert_eq!(quiz.score(), None);
        assert!(!quiz.answer("a").unwrap());

        assert_eq!(quiz.score(), Some(75.0));
        assert_eq!(quiz.passed(), Some(true));
        assert!(quiz.feedback().unwrap().starts_with("Good job"));
        assert!(quiz.answer("a").is_err());
    }

    #[test]
    fn test_missing_answer_defaults_to_first_option() {
        let raw: RawQuizQuestion =
            serde_json::from_value(json!({"question": "Pick", "options": ["x", "y"]})).unwrap();
        assert_eq!(QuizQuestion::from(raw).correct_answer, "x");
    }

    #[test]
    fn test_resolve_letters_and_text() {
        let q = question(&["Ownership", "Borrowing"], "Borrowing");
        assert_eq!(q.resolve("b"), "Borrowing");
        assert_eq!(q.resolve(" Ownership "), "Ownership");
        assert_eq!(q.resolve("z"), "z");
    }

    #[test]
    fn test_option_text_wins_over_letter() {
        let q = question(&["B", "A"], "A");
        assert_eq!(q.resolve("A"), "A");
        assert_eq!(q.resolve("b"), "A");
    }

    #[test]
    fn test_option_labels_switch_to_numbers_past_z() {
        assert_eq!(option_label(0), "A");
        assert_eq!(option_label(25), "Z");
        assert_eq!(option_label(26), "27");
        assert_eq!(option_label(300), "301");
    }

    #[tokio::test]
    async fn test_generate_notifies_and_converts() {
        let dir = tempfile::tempdir().unwrap();
        let (app, api, notifier) = test_support::state(&dir);
        api.set_quiz(json!([
            {"question": "Q1", "options": ["A1", "B1"], "correctAnswer": "B1"}
        ]));
        let quiz = Quiz::generate(&app, " Rust ").await.unwrap();
        assert_eq!(quiz.topic, "Rust");
        assert_eq!(quiz.questions()[0].correct_answer, "B1");
        assert_eq!(api.quiz_topics.lock().unwrap()[0], "Rust");
        assert_eq!(notifier.notices()[0].title, "Assessment Generated");
    }

    #[tokio::test]
    async fn test_missing_questions_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _, notifier) = test_support::state(&dir);
        assert!(Quiz::generate(&app, "Rust").await.is_err());
        assert_eq!(notifier.errors().len(), 1);
        assert!(matches!(
            Quiz::generate(&app, "  ").await,
            Err(AppError::Validation(_))
        ));
    }
}
