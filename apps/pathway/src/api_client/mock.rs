use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    ApiError, AssessSkillsRequest, CareerApi, ChatReply, ChatRequest, HealthStatus, PdfUpload,
    RawQuizQuestion, ResumeAnalysis, SaveAssessmentRequest, SavedAssessment,
    UpdateProgressRequest, UploadFile,
};
use crate::models::{Assessment, AssessmentDetail};

/// In-memory `CareerApi` for tests. Responses are preset; every call that
/// changes backend state is recorded. An unset response fails with a 500.
pub struct MockCareerApi {
    assess_response: Mutex<Option<Value>>,
    resume_analysis: Mutex<Option<ResumeAnalysis>>,
    saved: Mutex<Option<SavedAssessment>>,
    details: Mutex<HashMap<String, AssessmentDetail>>,
    assessments: Mutex<Option<Vec<Assessment>>>,
    fail_updates: Mutex<bool>,
    fail_deletes: Mutex<bool>,
    chat_reply: Mutex<Option<String>>,
    pdf_file_id: Mutex<Option<String>>,
    quiz: Mutex<Option<Vec<RawQuizQuestion>>>,
    /// assess-skills bodies
    pub assess_requests: Mutex<Vec<AssessSkillsRequest>>,
    /// save-assessment bodies
    pub save_requests: Mutex<Vec<SaveAssessmentRequest>>,
    /// update-progress bodies, including failed ones
    pub progress_updates: Mutex<Vec<UpdateProgressRequest>>,
    /// deleted assessment ids
    pub deleted: Mutex<Vec<String>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    /// uploaded file names, résumés and PDFs alike
    pub uploads: Mutex<Vec<String>>,
    pub quiz_topics: Mutex<Vec<String>>,
}

impl Default for MockCareerApi {
    fn default() -> Self {
        Self {
            assess_response: Mutex::new(None),
            resume_analysis: Mutex::new(None),
            saved: Mutex::new(None),
            details: Mutex::new(HashMap::new()),
            assessments: Mutex::new(Some(Vec::new())),
            fail_updates: Mutex::new(false),
            fail_deletes: Mutex::new(false),
            chat_reply: Mutex::new(None),
            pdf_file_id: Mutex::new(None),
            quiz: Mutex::new(None),
            assess_requests: Mutex::new(Vec::new()),
            save_requests: Mutex::new(Vec::new()),
            progress_updates: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            chat_requests: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            quiz_topics: Mutex::new(Vec::new()),
        }
    }
}

impl MockCareerApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_assess_response(&self, value: Value) {
        *self.assess_response.lock().unwrap() = Some(value);
    }

    pub fn set_resume_analysis(&self, analysis: ResumeAnalysis) {
        *self.resume_analysis.lock().unwrap() = Some(analysis);
    }

    pub fn set_saved(&self, assessment_id: &str, user_id: &str) {
        *self.saved.lock().unwrap() = Some(SavedAssessment {
            user_id: Some(user_id.to_string()),
            assessment_id: assessment_id.to_string(),
        });
    }

    pub fn insert_detail(&self, detail: AssessmentDetail) {
        self.details
            .lock()
            .unwrap()
            .insert(detail.assessment.id.clone(), detail);
    }

    /// `None` makes `get_assessments` fail.
    pub fn set_assessments(&self, assessments: Option<Vec<Assessment>>) {
        *self.assessments.lock().unwrap() = assessments;
    }

    pub fn fail_updates(&self, fail: bool) {
        *self.fail_updates.lock().unwrap() = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        *self.fail_deletes.lock().unwrap() = fail;
    }

    pub fn set_chat_reply(&self, message: &str) {
        *self.chat_reply.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_pdf_file_id(&self, file_id: Option<&str>) {
        *self.pdf_file_id.lock().unwrap() = file_id.map(str::to_string);
    }

    pub fn set_quiz(&self, questions: Value) {
        *self.quiz.lock().unwrap() = Some(serde_json::from_value(questions).unwrap());
    }
}

fn backend_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl CareerApi for MockCareerApi {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }

    async fn assess_skills(&self, request: &AssessSkillsRequest) -> Result<Value, ApiError> {
        self.assess_requests.lock().unwrap().push(request.clone());
        self.assess_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| backend_error("assessment failed"))
    }

    async fn upload_resume(&self, file: &UploadFile) -> Result<ResumeAnalysis, ApiError> {
        self.uploads.lock().unwrap().push(file.file_name.clone());
        self.resume_analysis
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| backend_error("could not parse resume"))
    }

    async fn save_assessment(
        &self,
        request: &SaveAssessmentRequest,
    ) -> Result<SavedAssessment, ApiError> {
        self.save_requests.lock().unwrap().push(request.clone());
        self.saved
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| backend_error("database unavailable"))
    }

    async fn get_assessment(&self, assessment_id: &str) -> Result<AssessmentDetail, ApiError> {
        self.details
            .lock()
            .unwrap()
            .get(assessment_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Assessment not found".to_string(),
            })
    }

    async fn get_assessments(&self, _user_id: &str) -> Result<Vec<Assessment>, ApiError> {
        self.assessments
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| backend_error("list failed"))
    }

    async fn update_progress(&self, request: &UpdateProgressRequest) -> Result<(), ApiError> {
        self.progress_updates.lock().unwrap().push(request.clone());
        if *self.fail_updates.lock().unwrap() {
            return Err(backend_error("update failed"));
        }
        Ok(())
    }

    async fn delete_assessment(&self, assessment_id: &str) -> Result<(), ApiError> {
        if *self.fail_deletes.lock().unwrap() {
            return Err(backend_error("delete failed"));
        }
        self.deleted.lock().unwrap().push(assessment_id.to_string());
        self.details.lock().unwrap().remove(assessment_id);
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        let message = self
            .chat_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| backend_error("model unavailable"))?;
        Ok(serde_json::from_value(json!({
            "message": message,
            "timestamp": "2024-05-01T12:00:00Z"
        }))?)
    }

    async fn upload_pdf(&self, file: &UploadFile) -> Result<PdfUpload, ApiError> {
        self.uploads.lock().unwrap().push(file.file_name.clone());
        Ok(PdfUpload {
            file_id: self.pdf_file_id.lock().unwrap().clone(),
            text: format!("text of {}", file.file_name),
        })
    }

    async fn generate_quiz(&self, topic: &str) -> Result<Vec<RawQuizQuestion>, ApiError> {
        self.quiz_topics.lock().unwrap().push(topic.to_string());
        self.quiz
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::MissingField("questions"))
    }
}
