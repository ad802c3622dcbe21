//! Aggregate milestone progress. This is the only place the formula lives:
//! completed milestones count fully, in-progress ones count half.

use serde::Serialize;

use crate::models::{MilestoneStatus, ProgressItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub percent: u8,
}

/// `round((completed + 0.5 * in_progress) / total * 100)`; 0 for no milestones.
pub fn overall_progress(items: &[ProgressItem]) -> u8 {
    summarize(items).percent
}

pub fn summarize(items: &[ProgressItem]) -> ProgressSummary {
    let mut summary = ProgressSummary {
        total: items.len(),
        ..Default::default()
    };
    for item in items {
        match item.status {
            MilestoneStatus::Completed => summary.completed += 1,
            MilestoneStatus::InProgress => summary.in_progress += 1,
            MilestoneStatus::NotStarted => summary.not_started += 1,
        }
    }
    if summary.total > 0 {
        let weighted = summary.completed as f64 + 0.5 * summary.in_progress as f64;
        summary.percent = (weighted / summary.total as f64 * 100.0).round() as u8;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(statuses: &[MilestoneStatus]) -> Vec<ProgressItem> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| ProgressItem {
                id: i.to_string(),
                assessment_id: "a".to_string(),
                milestone_id: format!("m{i}"),
                description: String::new(),
                target_date: None,
                status: *status,
                notes: String::new(),
                completed_at: None,
            })
            .collect()
    }

    #[test]
    fn test_two_completed_one_in_progress_of_four_is_63() {
        use MilestoneStatus::*;
        let list = items(&[Completed, Completed, InProgress, NotStarted]);
        assert_eq!(overall_progress(&list), 63);
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        use MilestoneStatus::*;
        let list = items(&[Completed, InProgress, InProgress]);
        let first = overall_progress(&list);
        assert_eq!(first, overall_progress(&list));
        assert_eq!(first, 67);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(overall_progress(&[]), 0);
    }

    #[test]
    fn test_summary_counts() {
        use MilestoneStatus::*;
        let summary = summarize(&items(&[Completed, NotStarted, NotStarted, InProgress]));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.not_started, 2);
        assert_eq!(summary.percent, 38);
    }

    #[test]
    fn test_all_completed_is_100() {
        use MilestoneStatus::*;
        assert_eq!(overall_progress(&items(&[Completed, Completed])), 100);
    }
}
