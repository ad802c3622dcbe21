//! Boundary parser for analysis payloads.
//!
//! The analysis service returns loosely shaped JSON that changed over time:
//! skill gaps are score based (`current_score`/`target_score`) or level based
//! (`current_level`/`target_level`), phases use `phase` or `title`, resources
//! use `resource` or `title`, and older responses carry `skillScores` and
//! `skillGaps.highPriority` instead. Everything is folded into the canonical
//! [`Analysis`] here, once. This function never fails: missing or mistyped
//! fields take their documented defaults.

use serde_json::Value;

use crate::analysis::model::{
    Analysis, AnalysisOutcome, LearningPathPhase, MilestonePlan, Priority, RequiredSkill,
    Resource, Risk, SkillGap, SkillScore, Summary, DEFAULT_SCORE_COLOR,
};

const UNKNOWN_SKILL: &str = "Unknown Skill";
const DEFAULT_CURRENT_SCORE: u8 = 0;
const DEFAULT_TARGET_SCORE: u8 = 100;

/// Normalizes a raw payload (an analysis object, an `{ analysis: .. }`
/// wrapper, an error object, or a JSON-encoded string of any of these).
pub fn normalize(value: &Value) -> AnalysisOutcome {
    match value {
        Value::Null => AnalysisOutcome::Failed {
            error: "No analysis data available".to_string(),
            raw_response: None,
        },
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed) if !parsed.is_string() => normalize(&parsed),
            _ => AnalysisOutcome::Failed {
                error: "Analysis payload is not valid JSON".to_string(),
                raw_response: Some(raw.clone()),
            },
        },
        Value::Object(map) => {
            if let Some(error) = map.get("error").filter(|e| !e.is_null()) {
                return AnalysisOutcome::Failed {
                    error: text_of(error).unwrap_or_else(|| error.to_string()),
                    raw_response: text(value, &["raw_response"]),
                };
            }
            match map.get("analysis") {
                Some(inner) if inner.is_object() || inner.is_string() => normalize(inner),
                _ => AnalysisOutcome::Ready(parse_analysis(value)),
            }
        }
        _ => AnalysisOutcome::Ready(Analysis::default()),
    }
}

fn parse_analysis(obj: &Value) -> Analysis {
    let skill_gaps = first_present(obj, &["skill_gaps", "skillGaps"])
        .map(skill_gaps)
        .unwrap_or_default();

    let mut recommendations = Vec::new();
    for key in [
        "recommendations",
        "gapRecommendations",
        "improvementAreas",
        "timelineRecommendations",
    ] {
        recommendations.extend(obj.get(key).map(string_list).unwrap_or_default());
    }

    Analysis {
        summary: summary(obj.get("summary")),
        required_skills: items(obj, &["required_skills", "requiredSkills"])
            .iter()
            .map(required_skill)
            .collect(),
        skill_gaps,
        learning_path: items(obj, &["learning_path", "learningPath"])
            .iter()
            .map(phase)
            .collect(),
        milestones: items(obj, &["milestones"]).iter().map(milestone).collect(),
        resources: items(obj, &["resources"]).iter().map(resource).collect(),
        risks: items(obj, &["risk_assessment", "risks"])
            .iter()
            .map(risk)
            .collect(),
        skill_scores: items(obj, &["skill_scores", "skillScores"])
            .iter()
            .filter_map(skill_score)
            .collect(),
        recommendations,
        estimated_months: first_present(obj, &["estimated_months", "estimatedMonths"])
            .and_then(number)
            .filter(|n| *n >= 0.0)
            .map(|n| n.round() as u32),
    }
}

fn summary(value: Option<&Value>) -> Summary {
    let mut summary = Summary::default();
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => summary.overview = s.clone(),
        Some(obj @ Value::Object(_)) => {
            if let Some(title) = text(obj, &["title"]) {
                summary.title = title;
            }
            if let Some(overview) = text(obj, &["overview", "description"]) {
                summary.overview = overview;
            }
            summary.key_findings = obj.get("key_findings").map(string_list).unwrap_or_default();
        }
        _ => {}
    }
    summary
}

fn required_skill(value: &Value) -> RequiredSkill {
    RequiredSkill {
        skill: text(value, &["skill", "name"])
            .or_else(|| text_of(value))
            .unwrap_or_else(|| UNKNOWN_SKILL.to_string()),
        importance: Priority::parse(&text(value, &["importance", "priority"]).unwrap_or_default()),
        description: text(value, &["description"]).unwrap_or_default(),
    }
}

/// Accepts an array of gap records/strings, or the legacy
/// `{ highPriority: [..], mediumPriority: [..], lowPriority: [..] }` grouping.
pub(crate) fn skill_gaps(value: &Value) -> Vec<SkillGap> {
    match value {
        Value::Array(entries) => entries.iter().map(skill_gap).collect(),
        Value::Object(groups) => [
            ("highPriority", Priority::High),
            ("high_priority", Priority::High),
            ("mediumPriority", Priority::Medium),
            ("medium_priority", Priority::Medium),
            ("lowPriority", Priority::Low),
            ("low_priority", Priority::Low),
        ]
        .into_iter()
        .flat_map(|(key, priority)| {
            groups
                .get(key)
                .map(string_list)
                .unwrap_or_default()
                .into_iter()
                .map(move |skill| SkillGap {
                    skill,
                    current_score: DEFAULT_CURRENT_SCORE,
                    target_score: DEFAULT_TARGET_SCORE,
                    priority: priority.clone(),
                    note: None,
                })
        })
        .collect(),
        _ => Vec::new(),
    }
}

fn skill_gap(value: &Value) -> SkillGap {
    if let Some(skill) = value.as_str() {
        return SkillGap {
            skill: non_empty(skill).unwrap_or_else(|| UNKNOWN_SKILL.to_string()),
            current_score: DEFAULT_CURRENT_SCORE,
            target_score: DEFAULT_TARGET_SCORE,
            priority: Priority::Medium,
            note: None,
        };
    }

    let current_score = value
        .get("current_score")
        .and_then(score)
        .or_else(|| value.get("current_level").and_then(level_score))
        .unwrap_or(DEFAULT_CURRENT_SCORE);
    let target_score = value
        .get("target_score")
        .and_then(score)
        .or_else(|| value.get("target_level").and_then(level_score))
        .unwrap_or(DEFAULT_TARGET_SCORE);

    // `gap` is sometimes a number (ignored: always recomputed) and sometimes prose.
    let note = value
        .get("gap")
        .and_then(Value::as_str)
        .filter(|s| number_str(s).is_none())
        .and_then(non_empty)
        .or_else(|| text(value, &["description"]));

    SkillGap {
        skill: text(value, &["skill", "name"]).unwrap_or_else(|| UNKNOWN_SKILL.to_string()),
        current_score,
        target_score,
        priority: Priority::parse(&text(value, &["priority"]).unwrap_or_default()),
        note,
    }
}

fn phase(value: &Value) -> LearningPathPhase {
    let title = text(value, &["title", "phase", "name"])
        .or_else(|| text_of(value))
        .map(|t| {
            if t.chars().all(|c| c.is_ascii_digit()) {
                format!("Phase {t}")
            } else {
                t
            }
        })
        .unwrap_or_else(|| "Untitled phase".to_string());

    let duration = match value.get("duration") {
        Some(Value::Number(n)) => format!("{n} months"),
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    };

    LearningPathPhase {
        title,
        description: text(value, &["description"]).unwrap_or_default(),
        duration,
        skills: first_present(value, &["skills", "skills_to_develop"])
            .map(string_list)
            .unwrap_or_default(),
        resources: value.get("resources").map(string_list).unwrap_or_default(),
    }
}

fn milestone(value: &Value) -> MilestonePlan {
    MilestonePlan {
        milestone: text(value, &["milestone", "title", "name"])
            .or_else(|| text_of(value))
            .unwrap_or_else(|| "Untitled milestone".to_string()),
        description: text(value, &["description"]).unwrap_or_default(),
        target_date: text(value, &["target_date", "date"]).unwrap_or_default(),
        dependencies: value.get("dependencies").map(string_list).unwrap_or_default(),
    }
}

fn resource(value: &Value) -> Resource {
    Resource {
        title: text(value, &["title", "resource", "name"])
            .or_else(|| text_of(value))
            .unwrap_or_else(|| "Untitled resource".to_string()),
        kind: text(value, &["type"])
            .map(|t| t.to_lowercase())
            .unwrap_or_else(|| "other".to_string()),
        url: text(value, &["url", "link"]),
        description: text(value, &["description"]).unwrap_or_default(),
        difficulty: text(value, &["difficulty"]).unwrap_or_default(),
        estimated_time: text(value, &["estimated_time", "duration"]).unwrap_or_default(),
        cost: text(value, &["cost"]).map(|c| c.to_lowercase()),
        interactive: value
            .get("interactive")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn risk(value: &Value) -> Risk {
    Risk {
        risk: text(value, &["risk", "title"])
            .or_else(|| text_of(value))
            .unwrap_or_else(|| "Unspecified risk".to_string()),
        impact: text(value, &["impact"]).unwrap_or_default(),
        probability: text(value, &["probability", "likelihood"]).unwrap_or_default(),
        mitigation: text(value, &["mitigation", "mitigation_strategy"]).unwrap_or_default(),
    }
}

fn skill_score(value: &Value) -> Option<SkillScore> {
    Some(SkillScore {
        name: text(value, &["name", "skill"])?,
        value: value.get("value").and_then(score).unwrap_or(0),
        color: text(value, &["color"]).unwrap_or_else(|| DEFAULT_SCORE_COLOR.to_string()),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Value helpers
// ────────────────────────────────────────────────────────────────────────────

fn first_present<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn items<'a>(obj: &'a Value, keys: &[&str]) -> &'a [Value] {
    first_present(obj, keys)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First non-empty textual field among `keys`.
fn text(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(text_of)
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Strings, `{title|skill|resource|name}` objects, or a comma-separated string.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|e| text_of(e).or_else(|| text(e, &["title", "skill", "resource", "name"])))
            .collect(),
        Value::String(s) => s.split(',').filter_map(non_empty).collect(),
        _ => Vec::new(),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => number_str(s),
        _ => None,
    }
}

fn number_str(s: &str) -> Option<f64> {
    s.trim().trim_end_matches('%').trim().parse::<f64>().ok()
}

/// Percentage score, clamped to `0..=100`.
fn score(value: &Value) -> Option<u8> {
    number(value)
        .filter(|n| n.is_finite())
        .map(|n| n.clamp(0.0, 100.0).round() as u8)
}

/// Level-based proficiency mapped onto the percentage scale. Named levels
/// use quarter steps; 0–5 ratings scale by 20; larger numbers are already
/// percentages.
fn level_score(value: &Value) -> Option<u8> {
    if let Some(n) = number(value).filter(|n| n.is_finite()) {
        return Some(if (0.0..=5.0).contains(&n) {
            (n * 20.0).round() as u8
        } else {
            n.clamp(0.0, 100.0).round() as u8
        });
    }
    let level = value.as_str()?.trim().to_lowercase();
    match level.as_str() {
        "none" | "no experience" => Some(0),
        "beginner" | "basic" | "novice" => Some(25),
        "intermediate" => Some(50),
        "advanced" => Some(75),
        "expert" | "master" => Some(100),
        _ => None,
    }
}
