//! Request and response bodies as the backend sends and expects them.
//! Responses are converted to domain types before leaving `api_client`.
#![allow(dead_code)]

use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::{self, AnalysisOutcome};
use crate::models::lenient::{de_id, de_opt_id, de_text, parse_timestamp};
use crate::models::{Assessment, AssessmentDetail, MilestoneStatus, ProgressItem};

// ────────────────────────────────────────────────────────────────────────────
// Assessment requests
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /assess-skills`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessSkillsRequest {
    pub current_role: String,
    pub experience: String,
    pub technical_skills: String,
    pub soft_skills: String,
    pub target_role: String,
    pub job_description: String,
    pub timeframe: String,
    pub interests: String,
    pub learning_style: String,
    pub time_commitment: String,
    pub budget: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_analysis: Option<ResumeAnalysis>,
}

/// Skills (and any scores) extracted from an uploaded résumé. Unknown
/// fields are kept so the whole analysis can be sent back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResumeResponse {
    pub analysis: Option<ResumeAnalysis>,
}

/// Body of `POST /save-assessment`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveAssessmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub target_role: String,
    pub current_role: String,
    pub experience: String,
    pub timeframe: String,
    pub assessment_results: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSaveAssessmentResponse {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub assessment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAssessment {
    pub user_id: Option<String>,
    pub assessment_id: String,
}

/// Body of `POST /update-progress`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateProgressRequest {
    pub progress_id: String,
    pub status: MilestoneStatus,
    pub notes: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Assessment responses
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct RawAssessment {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub target_role: String,
    #[serde(default, deserialize_with = "de_text")]
    pub current_role: String,
    #[serde(default, deserialize_with = "de_text")]
    pub experience: String,
    #[serde(default, deserialize_with = "de_text")]
    pub timeframe: String,
    #[serde(default, deserialize_with = "de_text")]
    pub created_at: String,
    #[serde(default)]
    pub assessment_data: Value,
    #[serde(default)]
    pub assessment_results: Value,
}

impl RawAssessment {
    /// `assessment_data` wins when a row carries both payload keys.
    pub fn into_domain(self) -> Assessment {
        let payload = if self.assessment_data.is_null() {
            &self.assessment_results
        } else {
            &self.assessment_data
        };
        Assessment {
            analysis: analysis::normalize(payload),
            created_at: parse_timestamp(&self.created_at),
            id: self.id,
            user_id: self.user_id,
            target_role: self.target_role,
            current_role: self.current_role,
            experience: self.experience,
            timeframe: self.timeframe,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetAssessmentResponse {
    pub assessment: Option<RawAssessment>,
    #[serde(default)]
    pub progress: Option<Vec<ProgressItem>>,
    #[serde(default)]
    pub overall_progress: Option<f64>,
    #[serde(default)]
    pub skill_gaps: Option<Value>,
    #[serde(default)]
    pub learning_path: Option<Value>,
}

impl GetAssessmentResponse {
    /// Builds the detail view. Top-level `skill_gaps`/`learning_path`
    /// fill in for an analysis that lacks them.
    pub fn into_domain(self) -> Option<AssessmentDetail> {
        let mut assessment = self.assessment?.into_domain();

        if let AnalysisOutcome::Ready(analysis) = &mut assessment.analysis {
            if analysis.skill_gaps.is_empty() {
                if let Some(gaps) = &self.skill_gaps {
                    analysis.skill_gaps = analysis::normalize::skill_gaps(gaps);
                }
            }
            if analysis.learning_path.is_empty() {
                if let Some(path) = self.learning_path.as_ref().filter(|p| p.is_array()) {
                    if let AnalysisOutcome::Ready(from_top) =
                        analysis::normalize(&serde_json::json!({ "learning_path": path }))
                    {
                        analysis.learning_path = from_top.learning_path;
                    }
                }
            }
        }

        Some(AssessmentDetail {
            assessment,
            progress: self.progress.unwrap_or_default(),
            reported_progress: self.overall_progress,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetAssessmentsResponse {
    #[serde(default)]
    pub assessments: Option<Vec<RawAssessment>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Learn-with-AI bodies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileContext {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Body of `POST /learn-with-ai/chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
    pub files: Vec<FileContext>,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default, deserialize_with = "de_text")]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ChatReply {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PdfUpload {
    #[serde(default, rename = "fileId", deserialize_with = "de_opt_id")]
    pub file_id: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawQuizQuestion {
    #[serde(default, deserialize_with = "de_text")]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, alias = "correctAnswer", alias = "correct_answer")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizResponse {
    #[serde(default)]
    pub questions: Option<Vec<RawQuizQuestion>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    #[serde(default, deserialize_with = "de_text")]
    pub status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// File uploads
// ────────────────────────────────────────────────────────────────────────────

/// An in-memory file ready to be sent as a multipart `file` field.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        Self {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn looks_like_pdf(&self) -> bool {
        self.content_type == "application/pdf" || self.bytes.starts_with(b"%PDF")
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
