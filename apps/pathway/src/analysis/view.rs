//! Plain-text rendering of an analysis, one tab at a time.

use std::str::FromStr;

use crate::analysis::model::{Analysis, AnalysisOutcome, MilestonePlan, Resource};
use crate::models::{MilestoneStatus, ProgressItem};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Skills,
    LearningPath,
    Milestones,
    Resources,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Skills,
        Tab::LearningPath,
        Tab::Milestones,
        Tab::Resources,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Skills => "Skills Analysis",
            Tab::LearningPath => "Learning Path",
            Tab::Milestones => "Milestones",
            Tab::Resources => "Resources",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "overview" => Ok(Tab::Overview),
            "skills" | "skill_gaps" => Ok(Tab::Skills),
            "path" | "learning_path" => Ok(Tab::LearningPath),
            "milestones" => Ok(Tab::Milestones),
            "resources" => Ok(Tab::Resources),
            other => Err(format!("unknown tab '{other}'")),
        }
    }
}

/// Renders every tab, or the error card when the analysis failed.
pub fn render_outcome(outcome: &AnalysisOutcome, progress: &[ProgressItem]) -> String {
    match outcome {
        AnalysisOutcome::Ready(analysis) => Tab::ALL
            .iter()
            .map(|tab| render(analysis, *tab, progress))
            .collect::<Vec<_>>()
            .join("\n\n"),
        AnalysisOutcome::Failed {
            error,
            raw_response,
        } => {
            let mut lines = vec!["== Analysis Error ==".to_string(), error.clone()];
            if let Some(raw) = raw_response {
                lines.push(String::new());
                lines.push("Raw Response:".to_string());
                lines.push(raw.clone());
            }
            lines.join("\n")
        }
    }
}

/// Renders a single tab. `progress` lets the milestone tab show tracked
/// status; pass an empty slice for a fresh analysis.
pub fn render(analysis: &Analysis, tab: Tab, progress: &[ProgressItem]) -> String {
    let mut lines = vec![format!("== {} ==", tab.title())];
    match tab {
        Tab::Overview => overview(analysis, &mut lines),
        Tab::Skills => skills(analysis, &mut lines),
        Tab::LearningPath => learning_path(analysis, &mut lines),
        Tab::Milestones => milestones(analysis, progress, &mut lines),
        Tab::Resources => resources(analysis, &mut lines),
    }
    lines.join("\n")
}

fn overview(analysis: &Analysis, lines: &mut Vec<String>) {
    lines.push(analysis.summary.title.clone());
    lines.push(analysis.summary.overview.clone());

    if !analysis.summary.key_findings.is_empty() {
        lines.push(String::new());
        lines.push("Key Findings:".to_string());
        lines.extend(analysis.summary.key_findings.iter().map(|f| format!("  • {f}")));
    }

    if !analysis.skill_scores.is_empty() {
        lines.push(String::new());
        lines.push("Skill Distribution:".to_string());
        for score in &analysis.skill_scores {
            lines.push(format!("  {:<18} {} {:>3}%", score.name, bar(score.value), score.value));
        }
    }

    if !analysis.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        lines.extend(analysis.recommendations.iter().map(|r| format!("  • {r}")));
    }

    if let Some(months) = analysis.estimated_months {
        lines.push(format!("Estimated time to target role: {months} months"));
    }

    lines.push(String::new());
    lines.push("Risk Assessment:".to_string());
    if analysis.risks.is_empty() {
        lines.push("  (none identified)".to_string());
    }
    for risk in &analysis.risks {
        lines.push(format!("  ! {}", risk.risk));
        if !risk.mitigation.is_empty() {
            lines.push(format!("    Mitigation: {}", risk.mitigation));
        }
    }
}

fn skills(analysis: &Analysis, lines: &mut Vec<String>) {
    if !analysis.required_skills.is_empty() {
        let names: Vec<&str> = analysis
            .required_skills
            .iter()
            .map(|s| s.skill.as_str())
            .collect();
        lines.push(format!("Required Skills: {}", names.join(", ")));
        lines.push(String::new());
    }

    if analysis.skill_gaps.is_empty() {
        lines.push("No skill gaps identified.".to_string());
        return;
    }

    lines.push(format!("Overall readiness: {}%", analysis.skill_readiness()));
    for gap in &analysis.skill_gaps {
        lines.push(String::new());
        lines.push(format!(
            "{} [priority: {} {}]",
            gap.skill,
            gap.priority.as_str(),
            gap.priority.color()
        ));
        if let Some(note) = &gap.note {
            lines.push(format!("  {note}"));
        }
        lines.push(format!("  Current {} {:>3}%", bar(gap.current_score), gap.current_score));
        lines.push(format!("  Target  {} {:>3}%", bar(gap.target_score), gap.target_score));
        lines.push(format!("  Gap     {:>3}%", gap.gap()));
    }
}

fn learning_path(analysis: &Analysis, lines: &mut Vec<String>) {
    if analysis.learning_path.is_empty() {
        lines.push("No learning path available.".to_string());
        return;
    }
    for (index, phase) in analysis.learning_path.iter().enumerate() {
        let duration = if phase.duration.is_empty() {
            String::new()
        } else {
            format!(" ({})", phase.duration)
        };
        lines.push(format!("{}. {}{duration}", index + 1, phase.title));
        if !phase.description.is_empty() {
            lines.push(format!("   {}", phase.description));
        }
        if !phase.skills.is_empty() {
            lines.push(format!("   Skills: {}", phase.skills.join(", ")));
        }
        if !phase.resources.is_empty() {
            lines.push(format!("   Resources: {}", phase.resources.join(", ")));
        }
    }
}

fn milestones(analysis: &Analysis, progress: &[ProgressItem], lines: &mut Vec<String>) {
    if analysis.milestones.is_empty() {
        lines.push("No milestones defined.".to_string());
        return;
    }
    for plan in &analysis.milestones {
        let status = match_progress(plan, progress)
            .map(|p| p.status)
            .unwrap_or_default();
        let target = if plan.target_date.is_empty() {
            String::new()
        } else {
            format!(" (target: {})", plan.target_date)
        };
        lines.push(format!("{} {}{target}", status_icon(status), plan.milestone));
        if !plan.description.is_empty() && plan.description != plan.milestone {
            lines.push(format!("    {}", plan.description));
        }
    }
}

fn resources(analysis: &Analysis, lines: &mut Vec<String>) {
    if analysis.resources.is_empty() {
        lines.push("No resources recommended.".to_string());
        return;
    }
    for resource in &analysis.resources {
        lines.push(resource_line(resource));
        if !resource.description.is_empty() {
            lines.push(format!("    {}", resource.description));
        }
        if let Some(url) = &resource.url {
            lines.push(format!("    {url}"));
        }
    }
}

fn resource_line(resource: &Resource) -> String {
    let mut tags = vec![resource.kind.clone()];
    if resource.cost.is_some() {
        tags.push(resource.cost_label().to_string());
    }
    if !resource.difficulty.is_empty() {
        tags.push(resource.difficulty.clone());
    }
    if !resource.estimated_time.is_empty() {
        tags.push(resource.estimated_time.clone());
    }
    tags.push(if resource.interactive { "interactive" } else { "self-paced" }.to_string());
    format!("- {} [{}]", resource.title, tags.join(" · "))
}

/// Finds the progress record for a planned milestone by slug or text.
/// Records written by older clients only had their first space replaced
/// ("ship_a project"), so that key is accepted too.
pub fn match_progress<'a>(
    plan: &MilestonePlan,
    progress: &'a [ProgressItem],
) -> Option<&'a ProgressItem> {
    let slug = plan.slug();
    let first_space_key = plan.milestone.to_lowercase().replacen(' ', "_", 1);
    progress.iter().find(|p| {
        p.milestone_id == slug
            || p.milestone_id == first_space_key
            || p.milestone_id.eq_ignore_ascii_case(&plan.milestone)
            || p.description.eq_ignore_ascii_case(&plan.milestone)
    })
}

pub fn status_icon(status: MilestoneStatus) -> &'static str {
    match status {
        MilestoneStatus::Completed => "[x]",
        MilestoneStatus::InProgress => "[~]",
        MilestoneStatus::NotStarted => "[ ]",
    }
}

/// Horizontal bar for a 0–100 value.
pub fn bar(value: u8) -> String {
    let filled = (value.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalize;
    use serde_json::json;

    fn analysis(value: serde_json::Value) -> Analysis {
        normalize(&value).analysis().cloned().unwrap()
    }

    #[test]
    fn test_every_tab_renders_for_empty_analysis() {
        let empty = Analysis::default();
        for tab in Tab::ALL {
            let text = render(&empty, tab, &[]);
            assert!(text.starts_with(&format!("== {} ==", tab.title())));
        }
    }

    #[test]
    fn test_skills_tab_shows_computed_gap() {
        let a = analysis(json!({
            "skill_gaps": [{"skill": "SQL", "current_score": 40, "target_score": 90, "priority": "high", "gap": 10}]
        }));
        let text = render(&a, Tab::Skills, &[]);
        assert!(text.contains("SQL [priority: high #ff4d4f]"));
        assert!(text.contains("Gap      50%"));
    }

    #[test]
    fn test_milestones_tab_uses_progress_status() {
        let a = analysis(json!({
            "milestones": [
                {"milestone": "Learn SQL", "target_date": "Month 2"},
                {"milestone": "Ship a project"}
            ]
        }));
        let progress: Vec<ProgressItem> = serde_json::from_value(json!([
            {"id": "1", "milestone_id": "learn_sql", "status": "completed"},
            {"id": "2", "milestone_id": "ship_a_project", "status": "in_progress"}
        ]))
        .unwrap();
        let text = render(&a, Tab::Milestones, &progress);
        assert!(text.contains("[x] Learn SQL (target: Month 2)"));
        assert!(text.contains("[~] Ship a project"));
    }

    #[test]
    fn test_first_space_only_keys_still_match() {
        let a = analysis(json!({
            "milestones": [{"milestone": "Ship a project"}, {"milestone": "Learn SQL"}]
        }));
        let progress: Vec<ProgressItem> = serde_json::from_value(json!([
            {"id": "1", "milestone_id": "ship_a project", "status": "completed"}
        ]))
        .unwrap();
        let plans = &a.milestones;
        assert_eq!(match_progress(&plans[0], &progress).map(|p| p.id.as_str()), Some("1"));
        assert!(match_progress(&plans[1], &progress).is_none());
        let text = render(&a, Tab::Milestones, &progress);
        assert!(text.contains("[x] Ship a project"));
    }

    #[test]
    fn test_failed_outcome_renders_error_card() {
        let outcome = normalize(&json!({"error": "quota exceeded", "raw_response": "{..."}));
        let text = render_outcome(&outcome, &[]);
        assert!(text.contains("Analysis Error"));
        assert!(text.contains("quota exceeded"));
        assert!(text.contains("Raw Response:"));
    }

    #[test]
    fn test_tab_parsing() {
        assert_eq!("learning-path".parse::<Tab>().unwrap(), Tab::LearningPath);
        assert_eq!("Skills".parse::<Tab>().unwrap(), Tab::Skills);
        assert!("vr".parse::<Tab>().is_err());
    }

    #[test]
    fn test_bar_bounds() {
        assert_eq!(bar(0), format!("[{}]", ".".repeat(20)));
        assert_eq!(bar(100), format!("[{}]", "#".repeat(20)));
        assert_eq!(bar(50).matches('#').count(), 10);
    }
}
