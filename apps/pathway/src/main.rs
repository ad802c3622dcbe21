mod analysis;
mod api_client;
mod config;
mod errors;
mod learn;
mod models;
mod notice;
mod progress;
mod roadmaps;
mod session;
mod state;
mod tracker;
mod wizard;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::view::{self, Tab};
use crate::api_client::{ApiClient, UploadFile};
use crate::config::Config;
use crate::errors::AppError;
use crate::learn::{ChatSession, Quiz};
use crate::models::MilestoneStatus;
use crate::notice::ConsoleNotifier;
use crate::session::SessionStore;
use crate::state::AppState;
use crate::tracker::Tracker;
use crate::wizard::{AssessmentForm, Wizard};

#[derive(Parser)]
#[command(name = "pathway", version, about = "Career skills assessment and learning tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the career API is reachable
    Health,
    /// Run a skills assessment and save it
    Assess {
        /// Wizard answers as inline JSON or a path to a JSON file
        #[arg(long)]
        form: String,
        /// Résumé (pdf, docx or txt) to pre-fill skills from
        #[arg(long)]
        resume: Option<PathBuf>,
    },
    /// Show the analysis of a saved assessment (latest by default)
    Results {
        assessment_id: Option<String>,
        /// overview, skills, learning-path, milestones or resources
        #[arg(long)]
        tab: Option<Tab>,
    },
    /// List your saved assessments
    Dashboard,
    /// Show milestone progress for an assessment (latest by default)
    Progress { assessment_id: Option<String> },
    /// Set a milestone's status
    Milestone {
        assessment_id: String,
        progress_id: String,
        /// not_started, in_progress or completed
        status: MilestoneStatus,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Delete an assessment permanently
    Delete {
        assessment_id: String,
        /// Confirm the deletion; there is no undo
        #[arg(long)]
        yes: bool,
    },
    /// List the built-in career roadmaps
    Roadmaps,
    /// Show a built-in roadmap, optionally saving it as an assessment
    Roadmap {
        id: String,
        #[arg(long)]
        save: bool,
    },
    /// Ask the learning assistant a question
    Chat {
        message: String,
        /// PDF files to include as context
        #[arg(long = "pdf")]
        pdfs: Vec<PathBuf>,
    },
    /// Generate a self-assessment quiz, optionally answering it
    Quiz {
        topic: String,
        /// Answers in order, as option letters or text (A,C,B)
        #[arg(long, value_delimiter = ',')]
        answers: Vec<String>,
    },
    /// Show or change the local session
    Session {
        #[arg(long)]
        clear: bool,
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("pathway v{} using {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let api = ApiClient::new(&config.api_url, config.http_timeout)?;
    let state = AppState {
        api: Arc::new(api),
        session: Arc::new(SessionStore::open(config.session_path())),
        notifier: Arc::new(ConsoleNotifier),
        config,
    };

    if let Err(e) = run(cli.command, &state).await {
        error!(code = e.code(), "{e}");
        eprintln!("error: {}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, state: &AppState) -> Result<(), AppError> {
    match command {
        Commands::Health => {
            let health = state.api.health().await?;
            println!("{}: {}", state.config.api_url, health.status);
        }
        Commands::Assess { form, resume } => assess(state, &form, resume.as_deref()).await?,
        Commands::Results { assessment_id, tab } => {
            let id = assessment_or_latest(state, assessment_id)?;
            let mut tracker = Tracker::new(state.clone());
            let detail = tracker.view_progress(&id).await?;
            let assessment = &detail.assessment;
            println!(
                "Assessment {} ({}): {} -> {}\n",
                assessment.id,
                assessment.created_label(),
                assessment.current_role,
                assessment.target_role
            );
            let text = match (tab, assessment.analysis.analysis()) {
                (Some(tab), Some(analysis)) => view::render(analysis, tab, &detail.progress),
                _ => view::render_outcome(&assessment.analysis, &detail.progress),
            };
            println!("{text}");
        }
        Commands::Dashboard => {
            let mut tracker = Tracker::new(state.clone());
            let list = tracker.list_assessments(None).await;
            if list.is_empty() {
                println!("No saved assessments. Run `pathway assess` or save a roadmap to start.");
            }
            for item in list {
                let created = item
                    .created_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                println!(
                    "{:<8} {created}  {} -> {}  [{}]",
                    item.id, item.current_role, item.target_role, item.title
                );
            }
        }
        Commands::Progress { assessment_id } => {
            let id = assessment_or_latest(state, assessment_id)?;
            let mut tracker = Tracker::new(state.clone());
            tracker.view_progress(&id).await?;
            print_progress(&tracker);
        }
        Commands::Milestone {
            assessment_id,
            progress_id,
            status,
            notes,
        } => {
            let mut tracker = Tracker::new(state.clone());
            tracker.view_progress(&assessment_id).await?;
            tracker
                .set_milestone_status(&progress_id, status, &notes)
                .await?;
            print_progress(&tracker);
        }
        Commands::Delete { assessment_id, yes } => {
            let mut tracker = Tracker::new(state.clone());
            tracker.delete_assessment(&assessment_id, yes).await?;
            println!("Deleted assessment {assessment_id}");
        }
        Commands::Roadmaps => {
            for entry in roadmaps::CATALOG.iter() {
                let marker = if roadmaps::roadmap(entry.id).is_some() { "*" } else { " " };
                println!("{marker} {:<16} {}", entry.id, entry.title);
                println!("    {}", entry.description);
                println!("    {}", entry.highlights.join(", "));
            }
            println!("\n* detailed roadmap available");
        }
        Commands::Roadmap { id, save } => {
            let roadmap = roadmaps::roadmap(&id)
                .ok_or_else(|| AppError::NotFound(format!("No detailed roadmap for '{id}'")))?;
            println!("{}", roadmaps::render(roadmap));
            if save {
                let saved = roadmaps::save(state, roadmap).await?;
                println!("\nSaved as assessment {}", saved.assessment_id);
            }
        }
        Commands::Chat { message, pdfs } => {
            let mut chat = ChatSession::new(state.clone());
            for path in &pdfs {
                let file = UploadFile::from_path(path).await?;
                chat.upload_pdf(file).await?;
            }
            let reply = chat.send(&message).await?;
            println!("{}", reply.content);
        }
        Commands::Quiz { topic, answers } => run_quiz(state, &topic, &answers).await?,
        Commands::Session { clear, name } => {
            if clear {
                state.session.clear()?;
            }
            if let Some(name) = name {
                state.session.set_user_name(&name)?;
            }
            let data = state.session.snapshot();
            let json = serde_json::to_string_pretty(&data).map_err(anyhow::Error::from)?;
            println!("{json}\n({})", state.session.path().display());
        }
    }
    Ok(())
}

async fn assess(state: &AppState, form: &str, resume: Option<&Path>) -> Result<(), AppError> {
    let raw = if form.trim_start().starts_with('{') {
        form.to_string()
    } else {
        tokio::fs::read_to_string(form).await?
    };
    let form: AssessmentForm = serde_json::from_str(&raw)
        .map_err(|e| AppError::Validation(format!("Invalid assessment form: {e}")))?;

    let mut wizard = Wizard::with_form(state.clone(), form);
    wizard.next()?;
    wizard.next()?;
    if let Some(path) = resume {
        let file = UploadFile::from_path(path).await?;
        wizard.upload_resume(file).await?;
    }
    let completion = wizard.submit().await?;
    println!("Saved assessment {}\n", completion.assessment_id);
    println!("{}", view::render_outcome(&completion.analysis, &[]));
    Ok(())
}

async fn run_quiz(state: &AppState, topic: &str, answers: &[String]) -> Result<(), AppError> {
    let mut quiz = Quiz::generate(state, topic).await?;
    if answers.is_empty() {
        for (number, question) in quiz.questions().iter().enumerate() {
            println!("{}. {}", number + 1, question.question);
            for (index, option) in question.options.iter().enumerate() {
                println!("   {}) {option}", learn::quiz::option_label(index));
            }
        }
        return Ok(());
    }

    for answer in answers {
        if quiz.is_complete() {
            break;
        }
        let correct = quiz.answer(answer)?;
        let given = quiz.answers().last().map(String::as_str).unwrap_or_default();
        println!("{} {given}", if correct { "✓" } else { "✗" });
    }
    match (quiz.score(), quiz.passed(), quiz.feedback()) {
        (Some(score), Some(passed), Some(feedback)) => {
            println!(
                "\nScore: {score:.1}% ({} of {} correct), {}",
                quiz.correct_count(),
                quiz.questions().len(),
                if passed { "passed" } else { "not passed" }
            );
            println!("{feedback}");
        }
        _ => println!(
            "\nAnswered {} of {} questions",
            quiz.answers().len(),
            quiz.questions().len()
        ),
    }
    Ok(())
}

fn assessment_or_latest(state: &AppState, id: Option<String>) -> Result<String, AppError> {
    id.or_else(|| state.session.latest_assessment_id())
        .ok_or_else(|| {
            AppError::Validation(
                "No assessment id given and none saved in this session".to_string(),
            )
        })
}

fn print_progress(tracker: &Tracker) {
    let Some(detail) = tracker.detail() else {
        return;
    };
    let summary = tracker.progress_summary();
    println!(
        "{} -> {}",
        detail.assessment.current_role, detail.assessment.target_role
    );
    println!(
        "Overall {} {}% ({} completed, {} in progress, {} not started)\n",
        view::bar(tracker.overall_progress()),
        tracker.overall_progress(),
        summary.completed,
        summary.in_progress,
        summary.not_started
    );
    for item in &detail.progress {
        let target = item
            .target_date
            .as_deref()
            .map(|d| format!(" (target: {d})"))
            .unwrap_or_default();
        println!(
            "{} [{}] {}{target}",
            view::status_icon(item.status),
            item.id,
            item.title()
        );
        if !item.notes.is_empty() {
            println!("      notes: {}", item.notes);
        }
    }
}
