//! Built-in career roadmaps. Saving one stores it as an ordinary
//! assessment, so it shows up on the dashboard with tracked milestones.

use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use tracing::info;

use crate::api_client::{SaveAssessmentRequest, SavedAssessment};
use crate::errors::AppError;
use crate::notice::Notice;
use crate::session::SessionData;
use crate::state::AppState;

const DEFAULT_PHASE_DURATION: &str = "3 months";
const DAYS_PER_MONTH: i64 = 30;

pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub highlights: &'static [&'static str],
}

pub struct Roadmap {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub phases: &'static [Phase],
}

pub struct Phase {
    pub title: &'static str,
    pub skills: &'static [&'static str],
    pub milestones: &'static [&'static str],
    pub resources: &'static [RoadmapResource],
}

pub struct RoadmapResource {
    pub title: &'static str,
    pub kind: &'static str,
}

impl Phase {
    /// The parenthesised part of the title, e.g. "3-6 months".
    pub fn duration(&self) -> &'static str {
        self.title
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(inner, _)| inner.trim())
            .filter(|inner| !inner.is_empty())
            .unwrap_or(DEFAULT_PHASE_DURATION)
    }
}

/// Everything listed on the roadmaps page. Only some entries have a
/// detailed roadmap behind them.
pub const CATALOG: [CatalogEntry; 6] = [
    CatalogEntry {
        id: "data-science",
        title: "Data Science & Analytics",
        description: "A comprehensive roadmap for becoming a proficient data scientist",
        highlights: &["Python", "Statistical Analysis", "Machine Learning", "Data Visualization"],
    },
    CatalogEntry {
        id: "software-eng",
        title: "Software Engineering",
        description: "A guided pathway to becoming a well-rounded software engineer",
        highlights: &["JavaScript", "Cloud Services", "System Design", "DevOps"],
    },
    CatalogEntry {
        id: "ux-design",
        title: "UX/UI Design",
        description: "A structured path for becoming a skilled UX/UI designer",
        highlights: &["User Research", "Wireframing", "Prototyping", "Visual Design"],
    },
    CatalogEntry {
        id: "web-dev",
        title: "Web Development",
        description: "Master full-stack web development from frontend to backend",
        highlights: &["HTML/CSS", "JavaScript", "React", "Node.js"],
    },
    CatalogEntry {
        id: "cyber-security",
        title: "Cyber Security",
        description: "Protect systems and networks from digital attacks",
        highlights: &["Network Security", "Ethical Hacking", "Cryptography", "Security Analysis"],
    },
    CatalogEntry {
        id: "cloud-computing",
        title: "Cloud Computing",
        description: "Build and manage applications in the cloud",
        highlights: &["AWS/Azure/GCP", "Containers", "Serverless", "Microservices"],
    },
];

static ROADMAPS: [Roadmap; 3] = [
    Roadmap {
        id: "data-science",
        title: "Data Science & Analytics",
        description: "A comprehensive roadmap for becoming a proficient data scientist",
        phases: &[
            Phase {
                title: "Foundations (3-6 months)",
                skills: &[
                    "Python Programming",
                    "Statistics Fundamentals",
                    "Data Manipulation (Pandas)",
                    "Data Visualization (Matplotlib/Seaborn)",
                ],
                milestones: &[
                    "Master Python basics and data structures",
                    "Learn descriptive and inferential statistics",
                    "Build your first data analysis project",
                    "Create compelling data visualizations",
                ],
                resources: &[
                    RoadmapResource { title: "Python for Data Science Handbook", kind: "Book" },
                    RoadmapResource { title: "Statistics and Probability in Data Science", kind: "Course" },
                    RoadmapResource { title: "Data Cleaning and Analysis with Pandas", kind: "Tutorial" },
                ],
            },
            Phase {
                title: "Core Skills (4-8 months)",
                skills: &[
                    "Machine Learning Algorithms",
                    "SQL & Databases",
                    "Feature Engineering",
                    "Model Evaluation",
                ],
                milestones: &[
                    "Implement supervised learning algorithms",
                    "Master database querying and data extraction",
                    "Build end-to-end machine learning projects",
                    "Learn model validation techniques",
                ],
                resources: &[
                    RoadmapResource { title: "Machine Learning Specialization", kind: "Course" },
                    RoadmapResource { title: "Hands-On Machine Learning", kind: "Book" },
                    RoadmapResource { title: "SQL for Data Scientists", kind: "Tutorial" },
                ],
            },
            Phase {
                title: "Advanced Skills (6-12 months)",
                skills: &["Deep Learning", "Big Data Technologies", "MLOps", "Advanced Statistics"],
                milestones: &[
                    "Build neural network models",
                    "Deploy ML models to production",
                    "Work with distributed computing frameworks",
                    "Implement A/B testing frameworks",
                ],
                resources: &[
                    RoadmapResource { title: "Deep Learning Specialization", kind: "Course" },
                    RoadmapResource { title: "MLOps: Machine Learning Operations", kind: "Tutorial" },
                    RoadmapResource { title: "Designing Data-Intensive Applications", kind: "Book" },
                ],
            },
            Phase {
                title: "Specialization (Ongoing)",
                skills: &[
                    "Natural Language Processing",
                    "Computer Vision",
                    "Time Series Analysis",
                    "Reinforcement Learning",
                ],
                milestones: &[
                    "Choose a specialization area",
                    "Contribute to open-source projects",
                    "Build a comprehensive portfolio",
                    "Network with other professionals",
                ],
                resources: &[
                    RoadmapResource { title: "NLP with Transformers", kind: "Book" },
                    RoadmapResource { title: "Computer Vision with Deep Learning", kind: "Course" },
                    RoadmapResource { title: "Time Series Forecasting in Python", kind: "Tutorial" },
                ],
            },
        ],
    },
    Roadmap {
        id: "software-eng",
        title: "Software Engineering",
        description: "A guided pathway to becoming a well-rounded software engineer",
        phases: &[
            Phase {
                title: "Programming Fundamentals (3-6 months)",
                skills: &[
                    "Core Programming Concepts",
                    "Data Structures",
                    "Algorithms",
                    "Version Control (Git)",
                ],
                milestones: &[
                    "Master a programming language (JavaScript/Python/Java)",
                    "Implement common data structures",
                    "Solve algorithmic problems",
                    "Learn Git basics and collaboration workflows",
                ],
                resources: &[
                    RoadmapResource { title: "The Complete Developer Course", kind: "Course" },
                    RoadmapResource { title: "Grokking Algorithms", kind: "Book" },
                    RoadmapResource { title: "Git & GitHub Crash Course", kind: "Tutorial" },
                ],
            },
            Phase {
                title: "Web Development (4-8 months)",
                skills: &["HTML/CSS", "JavaScript", "Frontend Frameworks", "Backend Development"],
                milestones: &[
                    "Build responsive web layouts",
                    "Create interactive UIs with JavaScript",
                    "Develop applications with React/Vue/Angular",
                    "Implement RESTful APIs",
                ],
                resources: &[
                    RoadmapResource { title: "The Web Developer Bootcamp", kind: "Course" },
                    RoadmapResource { title: "React - The Complete Guide", kind: "Course" },
                    RoadmapResource { title: "Node.js and Express Fundamentals", kind: "Tutorial" },
                ],
            },
            Phase {
                title: "Software Architecture (6-10 months)",
                skills: &["Design Patterns", "System Design", "Databases", "Cloud Services"],
                milestones: &[
                    "Implement common design patterns",
                    "Design scalable architectures",
                    "Master SQL and NoSQL databases",
                    "Deploy applications to cloud platforms",
                ],
                resources: &[
                    RoadmapResource { title: "Clean Architecture", kind: "Book" },
                    RoadmapResource { title: "System Design Interview", kind: "Book" },
                    RoadmapResource { title: "AWS Certified Developer", kind: "Course" },
                ],
            },
            Phase {
                title: "Advanced Engineering (Ongoing)",
                skills: &["DevOps", "Testing Strategies", "Security", "Performance Optimization"],
                milestones: &[
                    "Implement CI/CD pipelines",
                    "Master automated testing strategies",
                    "Secure your applications",
                    "Optimize for performance and scale",
                ],
                resources: &[
                    RoadmapResource { title: "DevOps Engineering on AWS", kind: "Course" },
                    RoadmapResource { title: "Web Application Security", kind: "Tutorial" },
                    RoadmapResource { title: "High Performance Browser Networking", kind: "Book" },
                ],
            },
        ],
    },
    Roadmap {
        id: "ux-design",
        title: "UX/UI Design",
        description: "A structured path for becoming a skilled UX/UI designer",
        phases: &[
            Phase {
                title: "Design Fundamentals (2-4 months)",
                skills: &["Design Principles", "Color Theory", "Typography", "Layout & Composition"],
                milestones: &[
                    "Understand core design principles",
                    "Create effective color schemes",
                    "Master typography fundamentals",
                    "Design balanced layouts",
                ],
                resources: &[
                    RoadmapResource { title: "Design Fundamentals Course", kind: "Course" },
                    RoadmapResource { title: "The Elements of Graphic Design", kind: "Book" },
                    RoadmapResource { title: "Typography Fundamentals", kind: "Tutorial" },
                ],
            },
            Phase {
                title: "UX Principles (3-6 months)",
                skills: &[
                    "User Research",
                    "Information Architecture",
                    "Wireframing",
                    "Usability Testing",
                ],
                milestones: &[
                    "Conduct user interviews and surveys",
                    "Create user personas and journey maps",
                    "Design site maps and user flows",
                    "Perform usability testing sessions",
                ],
                resources: &[
                    RoadmapResource { title: "Don't Make Me Think", kind: "Book" },
                    RoadmapResource { title: "UX Research Fundamentals", kind: "Course" },
                    RoadmapResource { title: "Wireframing & Prototyping", kind: "Tutorial" },
                ],
            },
            Phase {
                title: "UI Design (4-8 months)",
                skills: &["Visual Design", "Interface Design", "Design Systems", "Prototyping"],
                milestones: &[
                    "Design appealing interfaces",
                    "Create interactive prototypes",
                    "Build a comprehensive design system",
                    "Develop a cohesive design language",
                ],
                resources: &[
                    RoadmapResource { title: "UI Design Bootcamp", kind: "Course" },
                    RoadmapResource { title: "Design Systems Handbook", kind: "Book" },
                    RoadmapResource { title: "Figma Master Course", kind: "Tutorial" },
                ],
            },
            Phase {
                title: "Professional Practice (Ongoing)",
                skills: &[
                    "Design Portfolio",
                    "Collaboration Skills",
                    "Design Strategy",
                    "Accessibility",
                ],
                milestones: &[
                    "Build a professional portfolio",
                    "Collaborate effectively with developers",
                    "Align design with business goals",
                    "Implement accessible design practices",
                ],
                resources: &[
                    RoadmapResource { title: "Building a Design Portfolio", kind: "Course" },
                    RoadmapResource { title: "Designing for Accessibility", kind: "Tutorial" },
                    RoadmapResource { title: "Design Leadership", kind: "Book" },
                ],
            },
        ],
    },
];

/// Detailed roadmap by id; `None` for unknown ids and for catalog entries
/// without a detailed roadmap.
pub fn roadmap(id: &str) -> Option<&'static Roadmap> {
    ROADMAPS.iter().find(|r| r.id == id)
}

/// Builds the save-assessment body for a roadmap. Milestone target dates
/// are spaced a month apart, three months per phase, starting at `today`.
pub fn to_save_request(
    roadmap: &Roadmap,
    session: &SessionData,
    today: NaiveDate,
) -> SaveAssessmentRequest {
    let phases = roadmap.phases;
    let skills = || phases.iter().flat_map(|p| p.skills.iter());

    let required_skills: Vec<Value> = skills()
        .map(|skill| {
            json!({
                "skill": skill,
                "importance": "high",
                "description": format!("Required for {}", roadmap.title),
            })
        })
        .collect();

    let skill_gaps: Vec<Value> = skills()
        .map(|skill| {
            json!({
                "skill": skill,
                "current_score": 10,
                "target_score": 90,
                "gap": format!("Need to develop {skill}"),
                "priority": "high",
            })
        })
        .collect();

    let learning_path: Vec<Value> = phases
        .iter()
        .enumerate()
        .map(|(index, phase)| {
            json!({
                "phase": (index + 1).to_string(),
                "title": phase.title,
                "description": format!("Phase {}: {}", index + 1, phase.title),
                "duration": phase.duration(),
                "skills_to_develop": phase.skills,
                "resources": phase.resources.iter().map(|r| r.title).collect::<Vec<_>>(),
            })
        })
        .collect();

    let mut milestones = Vec::new();
    for (phase_index, phase) in phases.iter().enumerate() {
        for (index, milestone) in phase.milestones.iter().enumerate() {
            let offset = (phase_index * 3 + index) as i64 * DAYS_PER_MONTH;
            let target = today + Duration::days(offset);
            milestones.push(json!({
                "milestone": milestone,
                "description": format!("Phase {}: {milestone}", phase_index + 1),
                "target_date": target.format("%Y-%m-%d").to_string(),
                "dependencies": [],
            }));
        }
    }

    let resources: Vec<Value> = phases
        .iter()
        .flat_map(|p| p.resources.iter())
        .map(|resource| {
            let kind = resource.kind.to_lowercase();
            json!({
                "title": resource.title,
                "type": kind,
                "url": format!("https://example.com/{}", url_slug(resource.title)),
                "description": format!("A {kind} on {}", resource.title),
                "difficulty": "intermediate",
                "estimated_time": "4 weeks",
            })
        })
        .collect();

    let key_findings = [
        format!("Identified {} key skills for the role", skill_gaps.len()),
        format!("Created a {}-phase learning path", phases.len()),
        format!("Set {} key milestones", milestones.len()),
        format!("Recommended {} learning resources", resources.len()),
    ];

    let analysis = json!({
        "required_skills": required_skills,
        "skill_gaps": skill_gaps,
        "learning_path": learning_path,
        "milestones": milestones,
        "resources": resources,
        "risk_assessment": [
            {
                "risk": "Time management",
                "impact": "high",
                "probability": "medium",
                "mitigation": "Create a consistent study schedule and track progress weekly",
            },
            {
                "risk": "Skill retention",
                "impact": "medium",
                "probability": "medium",
                "mitigation": "Practice regularly and build projects to apply what you learn",
            }
        ],
        "summary": {
            "title": format!("Career Path Analysis for {}", roadmap.title),
            "overview": roadmap.description,
            "key_findings": key_findings,
        },
    });

    SaveAssessmentRequest {
        user_id: session.user_id.clone(),
        user_name: session.user_name.clone(),
        target_role: roadmap.title.to_string(),
        current_role: "Current Role".to_string(),
        experience: "1-3".to_string(),
        timeframe: "1y".to_string(),
        assessment_results: json!({ "analysis": analysis }),
    }
}

/// Saves a roadmap as an assessment and records it in the session.
pub async fn save(app: &AppState, roadmap: &Roadmap) -> Result<SavedAssessment, AppError> {
    let request = to_save_request(roadmap, &app.session.snapshot(), Utc::now().date_naive());
    info!("Saving roadmap {} as an assessment", roadmap.id);

    let result = async {
        let saved = app.api.save_assessment(&request).await?;
        app.session
            .record_saved_assessment(saved.user_id.as_deref(), &saved.assessment_id)?;
        Ok::<_, AppError>(saved)
    }
    .await;

    match result {
        Ok(saved) => {
            app.notifier.notify(Notice::success(
                "Roadmap saved successfully",
                "You can view your learning path in the dashboard.",
            ));
            Ok(saved)
        }
        Err(e) => {
            app.notifier.notify(Notice::error(
                "Failed to save roadmap",
                e.user_message(),
            ));
            Err(e)
        }
    }
}

/// Plain-text view of a roadmap.
pub fn render(roadmap: &Roadmap) -> String {
    let mut lines = vec![
        format!("== {} ==", roadmap.title),
        roadmap.description.to_string(),
    ];
    for (index, phase) in roadmap.phases.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("Phase {}: {}", index + 1, phase.title));
        lines.push(format!("  Skills: {}", phase.skills.join(", ")));
        lines.push("  Milestones:".to_string());
        lines.extend(phase.milestones.iter().map(|m| format!("    - {m}")));
        lines.push("  Resources:".to_string());
        lines.extend(
            phase
                .resources
                .iter()
                .map(|r| format!("    - {} ({})", r.title, r.kind)),
        );
    }
    lines.join("\n")
}

fn url_slug(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;
    use crate::state::test_support;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_lookup() {
        assert_eq!(roadmap("ux-design").unwrap().title, "UX/UI Design");
        assert!(roadmap("web-dev").is_none());
        assert!(roadmap("nope").is_none());
        assert!(CATALOG.iter().any(|entry| entry.id == "web-dev"));
    }

    #[test]
    fn test_phase_duration_from_title() {
        let data_science = roadmap("data-science").unwrap();
        assert_eq!(data_science.phases[0].duration(), "3-6 months");
        assert_eq!(data_science.phases[3].duration(), "Ongoing");
        let untimed = Phase {
            title: "Warmup",
            skills: &[],
            milestones: &[],
            resources: &[],
        };
        assert_eq!(untimed.duration(), "3 months");
    }

    #[test]
    fn test_save_request_has_one_gap_per_phase_skill() {
        let roadmap = roadmap("software-eng").unwrap();
        let request = to_save_request(roadmap, &SessionData::default(), today());
        let analysis = &request.assessment_results["analysis"];
        let expected: usize = roadmap.phases.iter().map(|p| p.skills.len()).sum();
        assert_eq!(analysis["skill_gaps"].as_array().unwrap().len(), expected);
        assert_eq!(analysis["skill_gaps"][0]["current_score"], 10);
        assert_eq!(request.target_role, "Software Engineering");
        assert_eq!(request.user_id, None);
    }

    #[test]
    fn test_milestone_dates_are_spaced_by_phase() {
        let request = to_save_request(roadmap("data-science").unwrap(), &SessionData::default(), today());
        let milestones = &request.assessment_results["analysis"]["milestones"];
        assert_eq!(milestones[0]["target_date"], "2024-01-01");
        // phase 2, third milestone: (1 * 3 + 2) * 30 days
        assert_eq!(milestones[6]["target_date"], "2024-05-30");
    }

    #[test]
    fn test_save_request_normalizes_cleanly() {
        let request = to_save_request(roadmap("ux-design").unwrap(), &SessionData::default(), today());
        let outcome = analysis::normalize(&request.assessment_results);
        let analysis = outcome.analysis().unwrap();
        assert_eq!(analysis.summary.title, "Career Path Analysis for UX/UI Design");
        assert_eq!(analysis.summary.key_findings[0], "Identified 16 key skills for the role");
        assert_eq!(analysis.skill_gaps[0].gap(), 80);
        assert_eq!(analysis.learning_path.len(), 4);
        assert_eq!(analysis.risks.len(), 2);
        assert_eq!(
            analysis.resources[0].url.as_deref(),
            Some("https://example.com/design-fundamentals-course")
        );
    }

    #[tokio::test]
    async fn test_save_records_session() {
        let dir = tempfile::tempdir().unwrap();
        let (app, api, notifier) = test_support::state(&dir);
        api.set_saved("77", "u-9");
        let saved = save(&app, roadmap("data-science").unwrap()).await.unwrap();
        assert_eq!(saved.assessment_id, "77");
        assert_eq!(app.session.latest_assessment_id().as_deref(), Some("77"));
        assert_eq!(notifier.notices()[0].title, "Roadmap saved successfully");
    }

    #[tokio::test]
    async fn test_failed_save_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _, notifier) = test_support::state(&dir);
        assert!(save(&app, roadmap("ux-design").unwrap()).await.is_err());
        assert_eq!(notifier.errors()[0].title, "Failed to save roadmap");
        assert_eq!(app.session.latest_assessment_id(), None);
    }
}
