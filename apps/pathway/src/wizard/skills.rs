//! Résumé side channel helpers: upload checks and the soft/technical split.

use crate::api_client::UploadFile;
use crate::errors::AppError;

pub const ALLOWED_RESUME_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];
pub const MAX_RESUME_BYTES: usize = 16 * 1024 * 1024;

/// Skills counted as soft. Anything else a résumé yields is technical.
pub const SOFT_SKILL_KEYWORDS: [&str; 17] = [
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "creativity",
    "management",
    "agile",
    "scrum",
    "collaboration",
    "adaptability",
    "mentoring",
    "presentation",
    "time management",
    "critical thinking",
    "negotiation",
    "conflict resolution",
    "emotional intelligence",
];

pub fn validate_resume(file: &UploadFile) -> Result<(), AppError> {
    let allowed = file
        .extension()
        .is_some_and(|ext| ALLOWED_RESUME_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
        return Err(AppError::Validation(format!(
            "'{}' is not a supported résumé format (use PDF, DOCX or TXT)",
            file.file_name
        )));
    }
    if file.size() == 0 {
        return Err(AppError::Validation(format!("'{}' is empty", file.file_name)));
    }
    if file.size() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(format!(
            "'{}' is larger than the 16 MB upload limit",
            file.file_name
        )));
    }
    Ok(())
}

pub fn is_soft_skill(skill: &str) -> bool {
    let skill = skill.trim().to_lowercase();
    SOFT_SKILL_KEYWORDS.contains(&skill.as_str())
}

/// Splits skills into `(technical, soft)`, keeping input order.
pub fn partition_skills(skills: &[String]) -> (Vec<String>, Vec<String>) {
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .partition(|s| !is_soft_skill(s))
}

/// Appends `additions` to a comma-separated skill field, skipping any
/// skill already present regardless of case.
pub fn merge_skills(existing: &str, additions: &[String]) -> String {
    let mut merged: Vec<String> = split_skills(existing);
    for skill in additions {
        let skill = skill.trim();
        if skill.is_empty() {
            continue;
        }
        if !merged.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            merged.push(skill.to_string());
        }
    }
    merged.join(", ")
}

pub fn split_skills(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
