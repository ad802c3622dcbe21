use thiserror::Error;

use crate::api_client::ApiError;

/// Application-level error type.
/// Every variant maps to a short, safe message shown to the user as a notice.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable code for logs and machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Api(ApiError::Http(_)) => "NETWORK_ERROR",
            AppError::Api(ApiError::Status { .. }) => "BACKEND_ERROR",
            AppError::Api(_) => "MALFORMED_RESPONSE",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text suitable for a user-facing notice. Transport and internal
    /// details stay out of it; the caller that handles the error logs it.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Api(ApiError::Http(_)) => {
                "Could not reach the career service. Check that it is running.".to_string()
            }
            AppError::Api(ApiError::Status { status, message }) => {
                if message.is_empty() {
                    format!("The career service rejected the request ({status}).")
                } else {
                    message.clone()
                }
            }
            AppError::Api(_) => "The career service returned data we could not read.".to_string(),
            AppError::Session(_) => "Your local session could not be loaded or saved.".to_string(),
            AppError::Io(e) => format!("File error: {e}"),
            AppError::Internal(_) => "An unexpected error occurred.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_prefers_backend_message() {
        let err = AppError::Api(ApiError::Status {
            status: 400,
            message: "No file part".to_string(),
        });
        assert_eq!(err.code(), "BACKEND_ERROR");
        assert_eq!(err.user_message(), "No file part");
    }

    #[test]
    fn test_status_error_without_message_mentions_status() {
        let err = AppError::Api(ApiError::Status {
            status: 502,
            message: String::new(),
        });
        assert!(err.user_message().contains("502"));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = AppError::Validation("Target role is required".to_string());
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.user_message(), "Target role is required");
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_user_message_does_not_log() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        let errors = [
            AppError::Api(ApiError::MissingField("questions")),
            AppError::Session("disk full".to_string()),
            AppError::Internal(anyhow::anyhow!("boom")),
        ];
        let messages: Vec<String> = tracing::subscriber::with_default(subscriber, || {
            errors.iter().map(AppError::user_message).collect()
        });

        assert_eq!(messages[2], "An unexpected error occurred.");
        assert!(!messages[1].contains("disk full"));
        assert!(captured.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_field_is_malformed_response() {
        let err = AppError::Api(ApiError::MissingField("assessment_id"));
        assert_eq!(err.code(), "MALFORMED_RESPONSE");
    }
}
