#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api_client::{ChatRequest, ChatTurn, FileContext, UploadFile};
use crate::errors::AppError;
use crate::notice::Notice;
use crate::state::AppState;

const ANONYMOUS_USER: &str = "anonymous";
const TOPICS: [&str; 6] = [
    "Learning paths for specific skills or careers",
    "Recommendations for topics to study",
    "Career guidance and advice",
    "Explanations of complex topics",
    "Resources for further learning",
    "Upload PDFs to chat about their content",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A PDF whose extracted text travels with every chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub size: usize,
    pub content_type: String,
    pub content: String,
}

/// One conversation with the learning assistant. Lives only as long as
/// its owner; nothing here is persisted.
pub struct ChatSession {
    app: AppState,
    user_id: String,
    user_name: Option<String>,
    messages: Vec<ChatMessage>,
    files: Vec<UploadedFile>,
}

impl ChatSession {
    pub fn new(app: AppState) -> Self {
        let session = app.session.snapshot();
        let greeting = format!("{}\n\n{}", greeting(session.user_name.as_deref()), topic_list());
        Self {
            user_id: session.user_id.unwrap_or_else(|| ANONYMOUS_USER.to_string()),
            user_name: session.user_name,
            messages: vec![ChatMessage::new(ChatRole::Assistant, greeting)],
            files: Vec::new(),
            app,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub async fn upload_pdf(&mut self, file: UploadFile) -> Result<&UploadedFile, AppError> {
        if !file.looks_like_pdf() {
            self.app.notifier.notify(Notice::error(
                "Invalid file type",
                "Only PDF files are supported",
            ));
            return Err(AppError::Validation(format!(
                "'{}' is not a PDF",
                file.file_name
            )));
        }

        info!("Uploading {} for chat context", file.file_name);
        let upload = match self.app.api.upload_pdf(&file).await {
            Ok(upload) => upload,
            Err(e) => {
                warn!("PDF upload failed: {e}");
                self.app.notifier.notify(Notice::error(
                    "Upload Error",
                    "Failed to upload PDF. Please try again.",
                ));
                return Err(e.into());
            }
        };

        self.messages.push(ChatMessage::new(
            ChatRole::Assistant,
            format!(
                "I've processed \"{}\". You can now ask me questions about its content!",
                file.file_name
            ),
        ));
        let uploaded = UploadedFile {
            id: upload
                .file_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            size: file.size(),
            content_type: file.content_type,
            name: file.file_name,
            content: upload.text,
        };
        self.files.push(uploaded);
        Ok(&self.files[self.files.len() - 1])
    }

    pub fn delete_file(&mut self, file_id: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != file_id);
        let removed = self.files.len() != before;
        if removed {
            self.app.notifier.notify(Notice::info(
                "File Removed",
                "The file has been removed from the conversation.",
            ));
        }
        removed
    }

    /// Sends a message with the conversation so far and any uploaded file
    /// text. On failure the user's message stays in the transcript.
    pub async fn send(&mut self, input: &str) -> Result<&ChatMessage, AppError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }

        let request = ChatRequest {
            message: text.to_string(),
            history: self
                .messages
                .iter()
                .map(|m| ChatTurn {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            files: self
                .files
                .iter()
                .map(|f| FileContext {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    content: f.content.clone(),
                })
                .collect(),
            user_id: self.user_id.clone(),
        };
        self.messages.push(ChatMessage::new(ChatRole::User, text));

        let reply = match self.app.api.chat(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat request failed: {e}");
                self.app.notifier.notify(Notice::error(
                    "Error",
                    "Failed to send message. Please try again.",
                ));
                return Err(e.into());
            }
        };

        let mut message = ChatMessage::new(ChatRole::Assistant, reply.message.clone());
        if let Some(timestamp) = reply.timestamp() {
            message.timestamp = timestamp;
        }
        self.messages.push(message);
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Starts over with a fresh greeting and no files.
    pub fn reset(&mut self) {
        self.messages = vec![ChatMessage::new(
            ChatRole::Assistant,
            greeting(self.user_name.as_deref()),
        )];
        self.files.clear();
    }
}

fn greeting(name: Option<&str>) -> String {
    format!(
        "Hi {}! I'm your AI learning assistant. How can I help you today?",
        name.unwrap_or("there")
    )
}

fn topic_list() -> String {
    let topics: Vec<String> = TOPICS.iter().map(|t| format!("• {t}")).collect();
    format!("You can ask me about:\n{}", topics.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;

    #[test]
    fn test_starts_with_greeting() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _, _) = test_support::state(&dir);
        app.session.set_user_name("Sam").unwrap();
        let chat = ChatSession::new(app);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, ChatRole::Assistant);
        assert!(chat.messages()[0].content.starts_with("Hi Sam!"));
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_locally() {
        let dir = tempfile::tempdir().unwrap();
        let (app, api, _) = test_support::state(&dir);
        let mut chat = ChatSession::new(app);
        assert!(matches!(chat.send("   ").await, Err(AppError::Validation(_))));
        assert!(api.chat_requests.lock().unwrap().is_empty());
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_send_includes_history_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let (app, api, _) = test_support::state(&dir);
        api.set_chat_reply("Start with statistics.");
        api.set_pdf_file_id(Some("f-1"));
        let mut chat = ChatSession::new(app);

        chat.upload_pdf(UploadFile::new("notes.pdf", b"%PDF-1.5 ...".to_vec()))
            .await
            .unwrap();
        let reply = chat.send("  What first?  ").await.unwrap();
        assert_eq!(reply.content, "Start with statistics.");

        let requests = api.chat_requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.message, "What first?");
        assert_eq!(request.user_id, "anonymous");
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.files[0].id, "f-1");
        assert_eq!(request.files[0].content, "text of notes.pdf");
        assert_eq!(chat.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_send_keeps_user_message() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _, notifier) = test_support::state(&dir);
        let mut chat = ChatSession::new(app);
        assert!(chat.send("hello").await.is_err());
        let last = chat.messages().last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.content, "hello");
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (app, api, notifier) = test_support::state(&dir);
        let mut chat = ChatSession::new(app);
        let result = chat
            .upload_pdf(UploadFile::new("notes.txt", b"plain".to_vec()))
            .await;
        assert!(result.is_err());
        assert!(api.uploads.lock().unwrap().is_empty());
        assert_eq!(notifier.errors()[0].title, "Invalid file type");
    }

    #[tokio::test]
    async fn test_generated_file_id_delete_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _, _) = test_support::state(&dir);
        let mut chat = ChatSession::new(app);
        let id = chat
            .upload_pdf(UploadFile::new("a.pdf", b"%PDF".to_vec()))
            .await
            .unwrap()
            .id
            .clone();
        assert!(!id.is_empty());
        chat.upload_pdf(UploadFile::new("b.pdf", b"%PDF".to_vec()))
            .await
            .unwrap();

        assert!(chat.delete_file(&id));
        assert!(!chat.delete_file(&id));
        assert_eq!(chat.files().len(), 1);

        chat.reset();
        assert!(chat.files().is_empty());
        assert_eq!(chat.messages().len(), 1);
    }
}
