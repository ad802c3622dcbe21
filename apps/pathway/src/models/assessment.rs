use chrono::{DateTime, Utc};

use crate::analysis::AnalysisOutcome;
use crate::models::progress::ProgressItem;

/// A saved assessment with its analysis already normalized.
/// Immutable on the client except for deletion.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub id: String,
    pub user_id: Option<String>,
    pub target_role: String,
    pub current_role: String,
    pub experience: String,
    pub timeframe: String,
    pub created_at: Option<DateTime<Utc>>,
    pub analysis: AnalysisOutcome,
}

impl Assessment {
    pub fn created_label(&self) -> String {
        self.created_at
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown date".to_string())
    }
}

/// An assessment together with its milestone progress records.
#[derive(Debug, Clone)]
pub struct AssessmentDetail {
    pub assessment: Assessment,
    pub progress: Vec<ProgressItem>,
    /// Percentage reported by the backend, if any. Informational only;
    /// the client always recomputes from `progress`.
    pub reported_progress: Option<f64>,
}
