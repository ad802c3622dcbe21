/// Career API client. Every call to the career backend goes through the
/// `CareerApi` trait; `ApiClient` is the HTTP implementation.
///
/// Response bodies are decoded into domain types here, so callers never
/// see raw backend JSON except the assessment payload they forward to
/// `save-assessment` unchanged.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Assessment, AssessmentDetail};

#[cfg(test)]
pub mod mock;
pub mod wire;

pub use wire::{
    AssessSkillsRequest, ChatReply, ChatRequest, ChatTurn, FileContext, HealthStatus, PdfUpload,
    RawQuizQuestion, ResumeAnalysis, SaveAssessmentRequest, SavedAssessment, UpdateProgressRequest,
    UploadFile,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response is missing '{0}'")]
    MissingField(&'static str),

    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

#[async_trait]
pub trait CareerApi: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    /// Runs the skill analysis. The payload is returned as-is so it can be
    /// normalized for display and forwarded verbatim when saving.
    async fn assess_skills(&self, request: &AssessSkillsRequest) -> Result<Value, ApiError>;

    async fn upload_resume(&self, file: &UploadFile) -> Result<ResumeAnalysis, ApiError>;

    async fn save_assessment(
        &self,
        request: &SaveAssessmentRequest,
    ) -> Result<SavedAssessment, ApiError>;

    async fn get_assessment(&self, assessment_id: &str) -> Result<AssessmentDetail, ApiError>;

    async fn get_assessments(&self, user_id: &str) -> Result<Vec<Assessment>, ApiError>;

    async fn update_progress(&self, request: &UpdateProgressRequest) -> Result<(), ApiError>;

    async fn delete_assessment(&self, assessment_id: &str) -> Result<(), ApiError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    async fn upload_pdf(&self, file: &UploadFile) -> Result<PdfUpload, ApiError>;

    async fn generate_quiz(&self, topic: &str) -> Result<Vec<RawQuizQuestion>, ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        debug!("GET {url}");
        read_json(self.client.get(url).send().await?).await
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!("POST {url}");
        read_json(self.client.post(url).json(body).send().await?).await
    }

    async fn post_multipart<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: multipart::Form,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        debug!("POST {url} (multipart)");
        read_json(self.client.post(url).multipart(form).send().await?).await
    }
}

#[async_trait]
impl CareerApi for ApiClient {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json(&["health"]).await
    }

    async fn assess_skills(&self, request: &AssessSkillsRequest) -> Result<Value, ApiError> {
        self.post_json(&["assess-skills"], request).await
    }

    async fn upload_resume(&self, file: &UploadFile) -> Result<ResumeAnalysis, ApiError> {
        let form = multipart::Form::new().part("file", file_part(file)?);
        let response: wire::UploadResumeResponse =
            self.post_multipart(&["upload-resume"], form).await?;
        response.analysis.ok_or(ApiError::MissingField("analysis"))
    }

    async fn save_assessment(
        &self,
        request: &SaveAssessmentRequest,
    ) -> Result<SavedAssessment, ApiError> {
        let response: wire::RawSaveAssessmentResponse =
            self.post_json(&["save-assessment"], request).await?;
        let assessment_id = response
            .assessment_id
            .ok_or(ApiError::MissingField("assessment_id"))?;
        Ok(SavedAssessment {
            user_id: response.user_id,
            assessment_id,
        })
    }

    async fn get_assessment(&self, assessment_id: &str) -> Result<AssessmentDetail, ApiError> {
        let response: wire::GetAssessmentResponse =
            self.get_json(&["get-assessment", assessment_id]).await?;
        response
            .into_domain()
            .ok_or(ApiError::MissingField("assessment"))
    }

    async fn get_assessments(&self, user_id: &str) -> Result<Vec<Assessment>, ApiError> {
        let response: wire::GetAssessmentsResponse =
            self.get_json(&["get-assessments", user_id]).await?;
        Ok(response
            .assessments
            .unwrap_or_default()
            .into_iter()
            .map(wire::RawAssessment::into_domain)
            .collect())
    }

    async fn update_progress(&self, request: &UpdateProgressRequest) -> Result<(), ApiError> {
        let url = self.endpoint(&["update-progress"])?;
        debug!("POST {url}");
        expect_success(self.client.post(url).json(request).send().await?).await
    }

    async fn delete_assessment(&self, assessment_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["delete-assessment", assessment_id])?;
        debug!("DELETE {url}");
        expect_success(self.client.delete(url).send().await?).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.post_json(&["learn-with-ai", "chat"], request).await
    }

    async fn upload_pdf(&self, file: &UploadFile) -> Result<PdfUpload, ApiError> {
        let form = multipart::Form::new().part("file", file_part(file)?);
        self.post_multipart(&["learn-with-ai", "upload-pdf"], form)
            .await
    }

    async fn generate_quiz(&self, topic: &str) -> Result<Vec<RawQuizQuestion>, ApiError> {
        let form = multipart::Form::new().text("topic", topic.to_string());
        let response: wire::QuizResponse = self.post_multipart(&["generate-assessment"], form).await?;
        response.questions.ok_or(ApiError::MissingField("questions"))
    }
}

fn file_part(file: &UploadFile) -> Result<multipart::Part, ApiError> {
    Ok(multipart::Part::bytes(file.bytes.to_vec())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)?)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!("Career API returned {status}: {body}");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

async fn expect_success(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    warn!("Career API returned {status}: {body}");
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Pulls a human-readable message out of an error body, falling back to
/// the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "detail", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
