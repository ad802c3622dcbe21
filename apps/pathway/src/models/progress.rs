use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::lenient::{de_id, de_opt_timestamp, de_text};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::NotStarted => "not_started",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Completed => "completed",
        }
    }

    /// Human label, e.g. "in progress".
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "not_started" => Ok(MilestoneStatus::NotStarted),
            "in_progress" => Ok(MilestoneStatus::InProgress),
            "completed" | "complete" | "done" => Ok(MilestoneStatus::Completed),
            other => Err(format!(
                "unknown status '{other}' (expected not_started, in_progress or completed)"
            )),
        }
    }
}

/// Unknown or missing statuses read as not started.
fn de_status<'de, D>(deserializer: D) -> Result<MilestoneStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

/// A tracked milestone on a saved assessment. Created by the backend;
/// the client only ever changes `status` (and with it `notes` and
/// `completed_at`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProgressRecord")]
pub struct ProgressItem {
    pub id: String,
    pub assessment_id: String,
    pub milestone_id: String,
    pub description: String,
    pub target_date: Option<String>,
    pub status: MilestoneStatus,
    pub notes: String,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A progress row as stored by the backend. Older rows name the milestone
/// under `milestone`; some carry both keys, and `milestone_id` wins.
#[derive(Deserialize)]
struct ProgressRecord {
    #[serde(deserialize_with = "de_id")]
    id: String,
    #[serde(default, deserialize_with = "de_id")]
    assessment_id: String,
    #[serde(default, deserialize_with = "de_text")]
    milestone_id: String,
    #[serde(default, deserialize_with = "de_text")]
    milestone: String,
    #[serde(default, deserialize_with = "de_text")]
    description: String,
    #[serde(default)]
    target_date: Option<String>,
    #[serde(default, deserialize_with = "de_status")]
    status: MilestoneStatus,
    #[serde(default, deserialize_with = "de_text")]
    notes: String,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    completed_at: Option<DateTime<Utc>>,
}

impl From<ProgressRecord> for ProgressItem {
    fn from(record: ProgressRecord) -> Self {
        let milestone_id = if record.milestone_id.is_empty() {
            record.milestone
        } else {
            record.milestone_id
        };
        Self {
            id: record.id,
            assessment_id: record.assessment_id,
            milestone_id,
            description: record.description,
            target_date: record.target_date,
            status: record.status,
            notes: record.notes,
            completed_at: record.completed_at,
        }
    }
}

impl ProgressItem {
    /// Applies a status change the way the backend records it:
    /// `completed_at` is stamped on completion and cleared otherwise.
    pub fn apply_status(&mut self, status: MilestoneStatus, notes: &str, now: DateTime<Utc>) {
        self.status = status;
        self.notes = notes.to_string();
        self.completed_at = match status {
            MilestoneStatus::Completed => Some(now),
            _ => None,
        };
    }

    /// Display name: the description when present, else the milestone id.
    pub fn title(&self) -> &str {
        if self.description.is_empty() {
            &self.milestone_id
        } else {
            &self.description
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(status: MilestoneStatus) -> ProgressItem {
        ProgressItem {
            id: "p1".to_string(),
            assessment_id: "a1".to_string(),
            milestone_id: "learn_sql".to_string(),
            description: "Learn SQL".to_string(),
            target_date: Some("Month 3".to_string()),
            status,
            notes: String::new(),
            completed_at: None,
        }
    }

    #[test]
    fn test_completed_then_in_progress_clears_completed_at() {
        let mut it = item(MilestoneStatus::NotStarted);
        let now = Utc::now();
        it.apply_status(MilestoneStatus::Completed, "", now);
        assert_eq!(it.completed_at, Some(now));

        it.apply_status(MilestoneStatus::InProgress, "back at it", now);
        assert_eq!(it.status, MilestoneStatus::InProgress);
        assert!(it.completed_at.is_none());
        assert_eq!(it.notes, "back at it");
    }

    #[test]
    fn test_status_parsing_is_forgiving() {
        assert_eq!(
            "In Progress".parse::<MilestoneStatus>().unwrap(),
            MilestoneStatus::InProgress
        );
        assert_eq!(
            "not-started".parse::<MilestoneStatus>().unwrap(),
            MilestoneStatus::NotStarted
        );
        assert!("paused".parse::<MilestoneStatus>().is_err());
    }

    #[test]
    fn test_progress_item_deserializes_loose_backend_record() {
        let raw = json!({
            "id": 7,
            "assessment_id": 3,
            "milestone": "Build a portfolio",
            "status": "mystery",
            "notes": null,
            "completed_at": "2024-05-01 12:00:00"
        });
        let it: ProgressItem = serde_json::from_value(raw).unwrap();
        assert_eq!(it.id, "7");
        assert_eq!(it.assessment_id, "3");
        assert_eq!(it.milestone_id, "Build a portfolio");
        assert_eq!(it.status, MilestoneStatus::NotStarted);
        assert_eq!(it.notes, "");
        assert!(it.completed_at.is_some());
    }

    #[test]
    fn test_record_with_both_milestone_keys_prefers_milestone_id() {
        let raw = json!({
            "id": 1,
            "milestone_id": "learn_sql",
            "milestone": "Learn SQL",
            "status": "completed"
        });
        let it: ProgressItem = serde_json::from_value(raw).unwrap();
        assert_eq!(it.milestone_id, "learn_sql");
        assert_eq!(it.status, MilestoneStatus::Completed);

        let blank_id = json!({"id": 2, "milestone_id": null, "milestone": "Learn SQL"});
        let it: ProgressItem = serde_json::from_value(blank_id).unwrap();
        assert_eq!(it.milestone_id, "Learn SQL");
    }

    #[test]
    fn test_title_falls_back_to_milestone_id() {
        let mut it = item(MilestoneStatus::NotStarted);
        assert_eq!(it.title(), "Learn SQL");
        it.description.clear();
        assert_eq!(it.title(), "learn_sql");
    }
}
