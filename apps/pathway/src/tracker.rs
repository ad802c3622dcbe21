//! Dashboard and progress tracker: the user's saved assessments and the
//! milestone progress of the one being viewed.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::api_client::UpdateProgressRequest;
use crate::errors::AppError;
use crate::models::{Assessment, AssessmentDetail, MilestoneStatus};
use crate::notice::Notice;
use crate::progress::{self, ProgressSummary};
use crate::state::AppState;

/// One dashboard card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentSummary {
    pub id: String,
    pub title: String,
    pub current_role: String,
    pub target_role: String,
    pub timeframe: String,
    pub created_at: Option<DateTime<Utc>>,
    pub analysis_failed: bool,
}

impl From<&Assessment> for AssessmentSummary {
    fn from(assessment: &Assessment) -> Self {
        let analysis = assessment.analysis.analysis();
        Self {
            id: assessment.id.clone(),
            title: analysis
                .map(|a| a.summary.title.clone())
                .unwrap_or_else(|| "Analysis unavailable".to_string()),
            current_role: assessment.current_role.clone(),
            target_role: assessment.target_role.clone(),
            timeframe: assessment.timeframe.clone(),
            created_at: assessment.created_at,
            analysis_failed: analysis.is_none(),
        }
    }
}

pub struct Tracker {
    app: AppState,
    assessments: Vec<AssessmentSummary>,
    detail: Option<AssessmentDetail>,
    summary: ProgressSummary,
}

impl Tracker {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            assessments: Vec::new(),
            detail: None,
            summary: ProgressSummary::default(),
        }
    }

    pub fn assessments(&self) -> &[AssessmentSummary] {
        &self.assessments
    }

    pub fn detail(&self) -> Option<&AssessmentDetail> {
        self.detail.as_ref()
    }

    pub fn progress_summary(&self) -> ProgressSummary {
        self.summary
    }

    pub fn overall_progress(&self) -> u8 {
        self.detail
            .as_ref()
            .map(|d| progress::overall_progress(&d.progress))
            .unwrap_or(0)
    }

    /// Loads the dashboard list for `user_id`, or for the session user.
    /// Never fails: any error leaves an empty list and an error notice.
    pub async fn list_assessments(&mut self, user_id: Option<&str>) -> &[AssessmentSummary] {
        let user_id = match user_id
            .map(str::to_string)
            .or_else(|| self.app.session.user_id())
        {
            Some(id) => id,
            None => {
                info!("No user in session; nothing to list");
                self.assessments.clear();
                return &self.assessments;
            }
        };

        match self.app.api.get_assessments(&user_id).await {
            Ok(list) => {
                info!("Loaded {} assessments for user {user_id}", list.len());
                self.assessments = list.iter().map(AssessmentSummary::from).collect();
            }
            Err(e) => {
                warn!("Listing assessments failed: {e}");
                let err = AppError::from(e);
                self.app
                    .notifier
                    .notify(Notice::error("Error", err.user_message()));
                self.assessments.clear();
            }
        }
        &self.assessments
    }

    pub async fn view_progress(
        &mut self,
        assessment_id: &str,
    ) -> Result<&AssessmentDetail, AppError> {
        let detail = match self.app.api.get_assessment(assessment_id).await {
            Ok(detail) => detail,
            Err(e) => {
                let err = AppError::from(e);
                self.app
                    .notifier
                    .notify(Notice::error("Error", err.user_message()));
                return Err(err);
            }
        };
        self.summary = progress::summarize(&detail.progress);
        info!(
            "Assessment {assessment_id}: {} milestones, {}% complete",
            self.summary.total, self.summary.percent
        );
        Ok(self.detail.insert(detail))
    }

    /// Changes a milestone's status locally first, then on the backend. If
    /// the backend call fails the previous item is put back unchanged.
    pub async fn set_milestone_status(
        &mut self,
        progress_id: &str,
        status: MilestoneStatus,
        notes: &str,
    ) -> Result<(), AppError> {
        let detail = self
            .detail
            .as_mut()
            .ok_or_else(|| {
                AppError::Validation("Open an assessment before updating progress".to_string())
            })?;
        let index = detail
            .progress
            .iter()
            .position(|p| p.id == progress_id)
            .ok_or_else(|| AppError::NotFound(format!("Milestone {progress_id} not found")))?;

        let previous = detail.progress[index].clone();
        detail.progress[index].apply_status(status, notes, Utc::now());
        self.summary = progress::summarize(&detail.progress);

        let request = UpdateProgressRequest {
            progress_id: progress_id.to_string(),
            status,
            notes: notes.to_string(),
        };
        match self.app.api.update_progress(&request).await {
            Ok(()) => {
                info!("Milestone {progress_id} set to {status}");
                self.app.notifier.notify(Notice::success(
                    "Progress Updated",
                    format!("Milestone marked as {}", status.label()),
                ));
                Ok(())
            }
            Err(e) => {
                warn!("Rolling back milestone {progress_id}: {e}");
                detail.progress[index] = previous;
                self.summary = progress::summarize(&detail.progress);
                let err = AppError::from(e);
                self.app
                    .notifier
                    .notify(Notice::error("Update Failed", err.user_message()));
                Err(err)
            }
        }
    }

    /// Deletes an assessment. Requires explicit confirmation; there is no undo.
    pub async fn delete_assessment(
        &mut self,
        assessment_id: &str,
        confirmed: bool,
    ) -> Result<(), AppError> {
        if !confirmed {
            return Err(AppError::Validation(
                "Deleting an assessment cannot be undone; confirmation is required".to_string(),
            ));
        }

        if let Err(e) = self.app.api.delete_assessment(assessment_id).await {
            let err = AppError::from(e);
            self.app
                .notifier
                .notify(Notice::error("Delete Failed", err.user_message()));
            return Err(err);
        }

        info!("Deleted assessment {assessment_id}");
        self.assessments.retain(|a| a.id != assessment_id);
        if self
            .detail
            .as_ref()
            .is_some_and(|d| d.assessment.id == assessment_id)
        {
            self.detail = None;
            self.summary = ProgressSummary::default();
        }
        self.app.session.forget_assessment(assessment_id)?;
        self.app.notifier.notify(Notice::success(
            "Assessment Deleted",
            "The assessment has been removed",
        ));
        Ok(())
    }
}
