//! Study Planner - command-line host
//!
//! A thin front end over the `study_planner` library: it loads the snapshot
//! files, forwards one intent to the planning store and prints the result.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use study_planner::formatting;
use study_planner::{
    FileStorage, PlannerConfig, PlanningStore, Priority, SortBy, SubjectDraft, SystemClock,
};

/// Study Planner - subjects, tasks, events and focus sessions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the planner snapshots (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Commit snapshots to the git repository containing the data directory
    #[arg(long)]
    sync_git: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show stats, due-today, overdue and the timeline
    Summary {
        /// Timeline order: dueDate or priority
        #[arg(long)]
        sort: Option<SortBy>,
    },
    /// List subjects
    Subjects,
    /// Add a subject
    AddSubject {
        name: String,
        #[arg(long, default_value = "bg-blue-500")]
        color: String,
    },
    /// Add a task to a subject
    AddTask {
        subject_id: u64,
        title: String,
        /// Due date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        due: Option<NaiveDate>,
        /// high, medium or low
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Toggle a task's completed flag
    Toggle { subject_id: u64, task_id: u64 },
    /// Record a finished focus session
    Focus { duration: u32 },
}

fn setup_logging(level: &str) {
    env_logger::Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config =
        PlannerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    setup_logging(&config.log_level);

    let data_dir = args.data_dir.unwrap_or(config.data_dir);
    let storage = FileStorage::new(&data_dir, args.sync_git || config.sync_git);
    let mut store = PlanningStore::load(storage, SystemClock::new());
    log::info!("using data directory {}", data_dir.display());

    match args.command.unwrap_or(Command::Summary { sort: None }) {
        Command::Summary { sort } => {
            let sort_by = sort.unwrap_or(config.sort_by);
            print!("{}", formatting::format_dashboard(&store, sort_by));
        }
        Command::Subjects => {
            print!("{}", formatting::format_subjects(store.subjects()));
        }
        Command::AddSubject { name, color } => {
            let id = store.add_subject(SubjectDraft::new(name, color))?;
            println!("Subject created with ID: {}", id);
        }
        Command::AddTask {
            subject_id,
            title,
            due,
            priority,
        } => {
            let id = store.add_task(subject_id, &title, due, priority)?;
            println!("Task created with ID: {}", id);
        }
        Command::Toggle {
            subject_id,
            task_id,
        } => {
            store.toggle_task_completed(subject_id, task_id)?;
            let completed = store
                .task(subject_id, task_id)
                .map(|t| t.completed)
                .unwrap_or_default();
            println!(
                "Task {} marked {}",
                task_id,
                if completed { "completed" } else { "pending" }
            );
        }
        Command::Focus { duration } => {
            let timestamp = store.add_focus_session(duration)?;
            println!("Focus session recorded at {}", timestamp);
        }
    }

    if store.persist_failures() > 0 {
        eprintln!(
            "Warning: {} snapshot write(s) failed; see log output",
            store.persist_failures()
        );
    }
    Ok(())
}
