//! Three-step assessment wizard: background, goals, preferences, then
//! submit (analyze and save). A résumé upload can pre-fill the skill fields
//! at any step.
#![allow(dead_code)]

pub mod form;
pub mod skills;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::analysis::{self, AnalysisOutcome};
use crate::api_client::{ResumeAnalysis, SaveAssessmentRequest, UploadFile};
use crate::errors::AppError;
use crate::notice::Notice;
use crate::state::AppState;

pub use form::AssessmentForm;

#[derive(Debug, Clone)]
pub struct Completion {
    pub assessment_id: String,
    pub analysis: AnalysisOutcome,
}

#[derive(Debug, Clone)]
pub enum WizardStep {
    /// Current role and experience.
    Step1,
    /// Target role and timeframe.
    Step2,
    /// Learning style, time commitment and budget.
    Step3,
    Submitting,
    Completed(Completion),
    Error(String),
}

impl WizardStep {
    pub fn number(&self) -> Option<u8> {
        match self {
            WizardStep::Step1 => Some(1),
            WizardStep::Step2 => Some(2),
            WizardStep::Step3 => Some(3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum ResumeState {
    #[default]
    Idle,
    Uploading,
    Analyzed(ResumeAnalysis),
    Failed(String),
}

pub struct Wizard {
    app: AppState,
    step: WizardStep,
    form: AssessmentForm,
    resume: ResumeState,
}

impl Wizard {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            step: WizardStep::Step1,
            form: AssessmentForm::default(),
            resume: ResumeState::Idle,
        }
    }

    pub fn with_form(app: AppState, form: AssessmentForm) -> Self {
        Self {
            form,
            ..Self::new(app)
        }
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn form(&self) -> &AssessmentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AssessmentForm {
        &mut self.form
    }

    pub fn resume(&self) -> &ResumeState {
        &self.resume
    }

    /// Advances one step after validating the current one. On failure the
    /// step is unchanged.
    pub fn next(&mut self) -> Result<(), AppError> {
        let next = match self.step {
            WizardStep::Step1 => {
                self.form.validate_background()?;
                WizardStep::Step2
            }
            WizardStep::Step2 => {
                self.form.validate_goals()?;
                WizardStep::Step3
            }
            _ => {
                return Err(AppError::Validation(
                    "No further step; submit the assessment instead".to_string(),
                ))
            }
        };
        self.step = next;
        Ok(())
    }

    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::Step2 => WizardStep::Step1,
            WizardStep::Step3 => WizardStep::Step2,
            WizardStep::Error(_) => WizardStep::Step3,
            _ => return,
        };
    }

    pub fn reset(&mut self) {
        self.step = WizardStep::Step1;
        self.form = AssessmentForm::default();
        self.resume = ResumeState::Idle;
    }

    /// Uploads a résumé and merges the skills found into the form.
    pub async fn upload_resume(&mut self, file: UploadFile) -> Result<(), AppError> {
        if let Err(e) = skills::validate_resume(&file) {
            return Err(self.resume_failed(e));
        }

        info!("Uploading résumé {} ({} bytes)", file.file_name, file.size());
        self.resume = ResumeState::Uploading;
        let analysis = match self.app.api.upload_resume(&file).await {
            Ok(analysis) => analysis,
            Err(e) => return Err(self.resume_failed(e.into())),
        };

        let (technical, soft) = skills::partition_skills(&analysis.skills);
        self.form.technical_skills = skills::merge_skills(&self.form.technical_skills, &technical);
        self.form.soft_skills = skills::merge_skills(&self.form.soft_skills, &soft);

        self.app.notifier.notify(Notice::success(
            "Resume Analyzed",
            format!(
                "Found {} technical and {} soft skills",
                technical.len(),
                soft.len()
            ),
        ));
        self.resume = ResumeState::Analyzed(analysis);
        Ok(())
    }

    fn resume_failed(&mut self, err: AppError) -> AppError {
        warn!("Résumé upload failed: {err}");
        let message = err.user_message();
        self.app
            .notifier
            .notify(Notice::error("Upload Failed", message.clone()));
        self.resume = ResumeState::Failed(message);
        err
    }

    /// Analyzes and saves the assessment. Allowed from step 3, or from the
    /// error state as a retry.
    pub async fn submit(&mut self) -> Result<Completion, AppError> {
        if !matches!(self.step, WizardStep::Step3 | WizardStep::Error(_)) {
            return Err(AppError::Validation(
                "Complete all three steps before submitting".to_string(),
            ));
        }
        self.form.validate_all()?;

        self.step = WizardStep::Submitting;
        info!(
            "Submitting assessment: {} -> {}",
            self.form.current_role, self.form.target_role
        );

        match self.analyze_and_save().await {
            Ok(completion) => {
                info!("Assessment {} saved", completion.assessment_id);
                self.app.notifier.notify(Notice::success(
                    "Assessment Complete",
                    "Your skills assessment has been analyzed and saved",
                ));
                self.step = WizardStep::Completed(completion.clone());
                Ok(completion)
            }
            Err(e) => {
                let message = e.user_message();
                self.app
                    .notifier
                    .notify(Notice::error("Assessment Failed", message.clone()));
                self.step = WizardStep::Error(message);
                Err(e)
            }
        }
    }

    async fn analyze_and_save(&self) -> Result<Completion, AppError> {
        let resume_analysis = match &self.resume {
            ResumeState::Analyzed(analysis) => Some(analysis.clone()),
            _ => None,
        };
        let request = self.form.to_request(resume_analysis);
        let raw = self.app.api.assess_skills(&request).await?;

        let session = self.app.session.snapshot();
        let save = SaveAssessmentRequest {
            user_id: session.user_id,
            user_name: session.user_name,
            target_role: request.target_role.clone(),
            current_role: request.current_role.clone(),
            experience: request.experience.clone(),
            timeframe: request.timeframe.clone(),
            assessment_results: assessment_results(&raw),
        };
        let saved = self.app.api.save_assessment(&save).await?;
        self.app
            .session
            .record_saved_assessment(saved.user_id.as_deref(), &saved.assessment_id)?;

        Ok(Completion {
            assessment_id: saved.assessment_id,
            analysis: analysis::normalize(&raw),
        })
    }
}

/// The stored payload always has an `analysis` key.
fn assessment_results(raw: &Value) -> Value {
    if raw.get("analysis").is_some() {
        raw.clone()
    } else {
        json!({ "analysis": raw })
    }
}
