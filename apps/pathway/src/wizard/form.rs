use serde::Deserialize;

use crate::api_client::{AssessSkillsRequest, ResumeAnalysis};
use crate::errors::AppError;

pub const EXPERIENCE_CHOICES: [&str; 5] = ["0-1", "1-3", "3-5", "5-10", "10+"];
pub const TIMEFRAME_CHOICES: [&str; 4] = ["6m", "1y", "2y", "5y"];
pub const LEARNING_STYLE_CHOICES: [&str; 4] = ["visual", "reading", "interactive", "audio_video"];
pub const COMMITMENT_CHOICES: [&str; 4] = ["1-3", "4-7", "8-15", "16+"];
pub const BUDGET_CHOICES: [&str; 4] = ["free", "low", "medium", "high"];

/// Wizard answers. Skill fields are comma-separated free text, as typed.
/// Accepts snake_case or camelCase keys when loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssessmentForm {
    #[serde(alias = "currentRole")]
    pub current_role: String,
    pub experience: String,
    #[serde(alias = "technicalSkills")]
    pub technical_skills: String,
    #[serde(alias = "softSkills")]
    pub soft_skills: String,
    #[serde(alias = "targetRole")]
    pub target_role: String,
    #[serde(alias = "jobDescription")]
    pub job_description: String,
    pub timeframe: String,
    pub interests: String,
    #[serde(alias = "learningStyle")]
    pub learning_style: String,
    #[serde(alias = "timeCommitment")]
    pub time_commitment: String,
    pub budget: String,
}

impl AssessmentForm {
    /// Step 1: where the user is now.
    pub fn validate_background(&self) -> Result<(), AppError> {
        required("Current role", &self.current_role)?;
        choice("Experience", &self.experience, &EXPERIENCE_CHOICES)
    }

    /// Step 2: where the user wants to go.
    pub fn validate_goals(&self) -> Result<(), AppError> {
        required("Target role", &self.target_role)?;
        choice("Timeframe", &self.timeframe, &TIMEFRAME_CHOICES)
    }

    /// Step 3: how the user learns.
    pub fn validate_preferences(&self) -> Result<(), AppError> {
        choice("Learning style", &self.learning_style, &LEARNING_STYLE_CHOICES)?;
        choice("Time commitment", &self.time_commitment, &COMMITMENT_CHOICES)?;
        choice("Budget", &self.budget, &BUDGET_CHOICES)
    }

    pub fn validate_all(&self) -> Result<(), AppError> {
        self.validate_background()?;
        self.validate_goals()?;
        self.validate_preferences()
    }

    pub fn to_request(&self, resume_analysis: Option<ResumeAnalysis>) -> AssessSkillsRequest {
        AssessSkillsRequest {
            current_role: self.current_role.trim().to_string(),
            experience: self.experience.clone(),
            technical_skills: self.technical_skills.trim().to_string(),
            soft_skills: self.soft_skills.trim().to_string(),
            target_role: self.target_role.trim().to_string(),
            job_description: self.job_description.trim().to_string(),
            timeframe: self.timeframe.clone(),
            interests: self.interests.trim().to_string(),
            learning_style: self.learning_style.clone(),
            time_commitment: self.time_commitment.clone(),
            budget: self.budget.clone(),
            resume_analysis,
        }
    }
}

fn required(label: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{label} is required")));
    }
    Ok(())
}

fn choice(label: &str, value: &str, allowed: &[&str]) -> Result<(), AppError> {
    required(label, value)?;
    if !allowed.contains(&value) {
        return Err(AppError::Validation(format!(
            "{label} must be one of {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn complete_form() -> AssessmentForm {
    AssessmentForm {
        current_role: "Data Analyst".to_string(),
        experience: "1-3".to_string(),
        technical_skills: "SQL, Excel".to_string(),
        target_role: "Data Scientist".to_string(),
        timeframe: "1y".to_string(),
        learning_style: "interactive".to_string(),
        time_commitment: "8-15".to_string(),
        budget: "low".to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_form_is_valid() {
        assert!(complete_form().validate_all().is_ok());
    }

    #[test]
    fn test_blank_current_role_fails_background() {
        let form = AssessmentForm {
            current_role: "   ".to_string(),
            ..complete_form()
        };
        let err = form.validate_background().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Current role is required");
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let form = AssessmentForm {
            timeframe: "3y".to_string(),
            ..complete_form()
        };
        assert!(form.validate_goals().is_err());
        assert!(form.validate_background().is_ok());
    }

    #[test]
    fn test_form_accepts_camel_case_json() {
        let form: AssessmentForm = serde_json::from_value(serde_json::json!({
            "currentRole": "Dev",
            "experience": "3-5",
            "learningStyle": "visual"
        }))
        .unwrap();
        assert_eq!(form.current_role, "Dev");
        assert_eq!(form.learning_style, "visual");
        assert!(form.target_role.is_empty());
    }

    #[test]
    fn test_request_trims_free_text() {
        let form = AssessmentForm {
            target_role: " ML Engineer ".to_string(),
            ..complete_form()
        };
        let request = form.to_request(None);
        assert_eq!(request.target_role, "ML Engineer");
        assert_eq!(request.time_commitment, "8-15");
    }
}
