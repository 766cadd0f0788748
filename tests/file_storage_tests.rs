//! File-backed snapshots and git versioning

mod common;

use common::date;
use git2::Repository;
use std::fs;
use study_planner::formatting;
use study_planner::{
    FileStorage, FixedClock, PlanningStore, Priority, SnapshotStore, SortBy, SubjectDraft,
};
use tempfile::TempDir;

// git リポジトリの初期化
fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (temp_dir, repo)
}

#[test]
fn test_store_survives_restart_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("planner");

    let task_id = {
        let storage = FileStorage::new(&data_dir, false);
        let mut store = PlanningStore::load(storage, FixedClock::new(date(2024, 3, 10)));
        let subject = store
            .add_subject(SubjectDraft::new("Economics", "bg-purple-500").with_id(3))
            .unwrap();
        store
            .add_task(subject, "Read paper", Some(date(2024, 3, 9)), Some(Priority::High))
            .unwrap()
    };

    let blob = fs::read_to_string(data_dir.join("studentPlannerData.json")).unwrap();
    assert!(blob.contains(r#""dueDate":"2024-03-09""#));

    let storage = FileStorage::new(&data_dir, false);
    let store = PlanningStore::load(storage, FixedClock::new(date(2024, 3, 10)));
    assert_eq!(store.subjects().len(), 3);
    assert_eq!(store.task(3, task_id).unwrap().title, "Read paper");
    assert_eq!(store.overdue_tasks().len(), 1);
}

#[test]
fn test_loads_snapshot_written_by_older_versions() {
    let temp_dir = TempDir::new().unwrap();
    // no `pinned` on tasks, no `expanded` on the subject
    fs::write(
        temp_dir.path().join("studentPlannerData.json"),
        r#"[{"id":1,"name":"Art","color":"bg-blue-500","tasks":[
            {"id":1712345678901,"title":"Sketch","dueDate":"2024-04-05","completed":false,"priority":"low"}
        ]}]"#,
    )
    .unwrap();

    let storage = FileStorage::new(temp_dir.path(), false);
    let store = PlanningStore::load(storage, FixedClock::new(date(2024, 4, 5)));

    let subject = store.subject(1).unwrap();
    assert!(subject.expanded);
    assert!(!subject.tasks[0].pinned);
    assert_eq!(store.due_today_tasks().len(), 1);
    assert!(store.events().is_empty());
}

#[test]
fn test_git_versioning_commits_each_write() {
    let (temp_dir, repo) = setup_test_repo();
    let storage = FileStorage::new(temp_dir.path(), true);
    let mut store = PlanningStore::load(storage, FixedClock::new(date(2024, 3, 10)));

    store.add_task(1, "Flashcards", None, None).unwrap();
    store.add_focus_session(25).unwrap();

    assert_eq!(store.persist_failures(), 0);
    let head = repo.head().unwrap();
    let commit = repo.find_commit(head.target().unwrap()).unwrap();
    assert_eq!(commit.message().unwrap(), "Update focusSessions");
    let parent = commit.parent(0).unwrap();
    assert_eq!(parent.message().unwrap(), "Update studentPlannerData");
}

#[test]
fn test_git_versioning_outside_repository_still_saves() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(temp_dir.path(), true);

    storage.save("studentPlannerEvents", "[]").unwrap();
    assert_eq!(
        storage.load("studentPlannerEvents").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn test_dashboard_lists_sections() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path(), false);
    let mut store = PlanningStore::load(storage, FixedClock::new(date(2024, 3, 10)));
    store
        .add_task(1, "Overdue essay", Some(date(2024, 3, 1)), None)
        .unwrap();
    store.add_task(2, "Today's quiz", None, None).unwrap();

    let out = formatting::format_dashboard(&store, SortBy::DueDate);
    assert!(out.contains("Pending: 2  Completed: 0  Total: 2  Overdue: 1"));
    assert!(out.contains("Due Today"));
    assert!(out.contains("Today's quiz"));
    let timeline = out.split("Timeline").nth(1).unwrap();
    let essay = timeline.find("Overdue essay").unwrap();
    let quiz = timeline.find("Today's quiz").unwrap();
    assert!(essay < quiz);
}
