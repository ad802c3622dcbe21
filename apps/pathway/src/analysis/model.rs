#![allow(dead_code)]

use serde::Serialize;

/// Canonical, fully defaulted analysis. Produced only by
/// [`crate::analysis::normalize`]; render code never re-derives defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    pub summary: Summary,
    pub required_skills: Vec<RequiredSkill>,
    pub skill_gaps: Vec<SkillGap>,
    pub learning_path: Vec<LearningPathPhase>,
    pub milestones: Vec<MilestonePlan>,
    pub resources: Vec<Resource>,
    pub risks: Vec<Risk>,
    /// Radar-style category scores (`Technical Skills: 70`).
    pub skill_scores: Vec<SkillScore>,
    pub recommendations: Vec<String>,
    pub estimated_months: Option<u32>,
}

impl Analysis {
    /// Share of the target already reached across all gaps:
    /// `Σcurrent / (Σcurrent + Σgap)`, rounded. 0 when there are no gaps.
    pub fn skill_readiness(&self) -> u8 {
        let current: u32 = self.skill_gaps.iter().map(|g| g.current_score as u32).sum();
        let gap: u32 = self.skill_gaps.iter().map(|g| g.gap() as u32).sum();
        if current + gap == 0 {
            return 0;
        }
        ((current as f64 / (current + gap) as f64) * 100.0).round() as u8
    }
}

/// Outcome of normalizing a payload: either an analysis or the error the
/// analysis service reported instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Ready(Analysis),
    Failed {
        error: String,
        raw_response: Option<String>,
    },
}

impl AnalysisOutcome {
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            AnalysisOutcome::Ready(a) => Some(a),
            AnalysisOutcome::Failed { .. } => None,
        }
    }
}

pub const DEFAULT_SUMMARY_TITLE: &str = "Career Path Analysis";
pub const DEFAULT_SUMMARY_OVERVIEW: &str =
    "Analysis of your career path based on your skills and goals.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub title: String,
    pub overview: String,
    pub key_findings: Vec<String>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            title: DEFAULT_SUMMARY_TITLE.to_string(),
            overview: DEFAULT_SUMMARY_OVERVIEW.to_string(),
            key_findings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "" | "medium" => Priority::Medium,
            "high" | "critical" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Other(s) => s,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Priority::High => "#ff4d4f",
            Priority::Medium => "#faad14",
            Priority::Low => "#52c41a",
            Priority::Other(_) => "#1890ff",
        }
    }
}

/// Score-based skill gap. Scores are percentages in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub current_score: u8,
    pub target_score: u8,
    pub priority: Priority,
    /// Free-text description some payloads carry in their `gap` field.
    pub note: Option<String>,
}

impl SkillGap {
    /// Always derived from the scores; a supplied numeric `gap` is ignored.
    pub fn gap(&self) -> u8 {
        self.target_score.saturating_sub(self.current_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiredSkill {
    pub skill: String,
    pub importance: Priority,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningPathPhase {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub skills: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestonePlan {
    pub milestone: String,
    pub description: String,
    pub target_date: String,
    pub dependencies: Vec<String>,
}

impl MilestonePlan {
    /// Identifier the backend derives for the matching progress record.
    pub fn slug(&self) -> String {
        slugify(&self.milestone)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub title: String,
    pub kind: String,
    pub url: Option<String>,
    pub description: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub cost: Option<String>,
    pub interactive: bool,
}

impl Resource {
    pub fn cost_label(&self) -> &'static str {
        match self.cost.as_deref() {
            Some("free") => "Free",
            Some("low") => "Low Cost",
            Some("medium") => "Medium Cost",
            Some(_) => "High Cost",
            None => "Unknown Cost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Risk {
    pub risk: String,
    pub impact: String,
    pub probability: String,
    pub mitigation: String,
}

pub const DEFAULT_SCORE_COLOR: &str = "#3182CE";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillScore {
    pub name: String,
    pub value: u8,
    pub color: String,
}

/// Lowercases and joins whitespace-separated words with `_`.
pub fn slugify(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(skill: &str, current: u8, target: u8) -> SkillGap {
        SkillGap {
            skill: skill.to_string(),
            current_score: current,
            target_score: target,
            priority: Priority::High,
            note: None,
        }
    }

    #[test]
    fn test_gap_is_target_minus_current() {
        assert_eq!(gap("SQL", 40, 90).gap(), 50);
        assert_eq!(gap("Rust", 95, 80).gap(), 0);
    }

    #[test]
    fn test_skill_readiness() {
        let analysis = Analysis {
            skill_gaps: vec![gap("SQL", 40, 90), gap("Python", 60, 80)],
            ..Default::default()
        };
        // current = 100, gap = 50 + 20 = 70 → 100 / 170 = 58.8%
        assert_eq!(analysis.skill_readiness(), 59);
        assert_eq!(Analysis::default().skill_readiness(), 0);
    }

    #[test]
    fn test_priority_colors_with_fallback() {
        assert_eq!(Priority::parse("HIGH").color(), "#ff4d4f");
        assert_eq!(Priority::parse("").color(), "#faad14");
        assert_eq!(Priority::parse("low").color(), "#52c41a");
        let other = Priority::parse("urgent-ish");
        assert_eq!(other.as_str(), "urgent-ish");
        assert_eq!(other.color(), "#1890ff");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Build a  Portfolio"), "build_a_portfolio");
    }
}
