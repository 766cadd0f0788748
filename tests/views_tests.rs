//! Derived views over planner state
mod common;

use common::{create_test_subject, create_test_task, date, store_on};
use study_planner::views::{
    due_today_tasks, events_on, flatten_tasks, overdue_tasks, pinned_tasks, sort_tasks, stats,
    tasks_due_on,
};
use study_planner::{EventDraft, Priority, SortBy, TaskStats};

#[test]
fn test_overdue_example() {
    let subjects = vec![create_test_subject(
        1,
        "Subject 1",
        vec![create_test_task(10, date(2024, 1, 1), Priority::High, false)],
    )];
    let today = date(2024, 1, 2);

    let overdue = overdue_tasks(&subjects, today);
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].task.id, 10);
    assert!(due_today_tasks(&subjects, today).is_empty());
    assert_eq!(
        stats(&subjects),
        TaskStats {
            total: 1,
            completed: 0,
            pending: 1,
        }
    );
}

#[test]
fn test_flatten_tags_subject_and_keeps_order() {
    let subjects = vec![
        create_test_subject(
            1,
            "Physics",
            vec![
                create_test_task(11, date(2024, 2, 1), Priority::Low, false),
                create_test_task(12, date(2024, 1, 1), Priority::High, false),
            ],
        ),
        create_test_subject(2, "Empty", Vec::new()),
        create_test_subject(
            3,
            "History",
            vec![create_test_task(31, date(2024, 1, 5), Priority::Medium, true)],
        ),
    ];

    let flat = flatten_tasks(&subjects);
    let ids: Vec<u64> = flat.iter().map(|t| t.task.id).collect();
    assert_eq!(ids, vec![11, 12, 31]);
    assert_eq!(flat[2].subject_id, 3);
    assert_eq!(flat[2].subject_name, "History");
    assert_eq!(flat[0].subject_color, "bg-blue-500");
}

#[test]
fn test_overdue_and_due_today_skip_completed_and_are_disjoint() {
    let today = date(2024, 5, 10);
    let subjects = vec![create_test_subject(
        1,
        "Maths",
        vec![
            create_test_task(1, date(2024, 5, 9), Priority::Medium, false),
            create_test_task(2, date(2024, 5, 9), Priority::Medium, true),
            create_test_task(3, today, Priority::Medium, false),
            create_test_task(4, today, Priority::Medium, true),
            create_test_task(5, date(2024, 5, 11), Priority::Medium, false),
        ],
    )];

    for day in [date(2024, 5, 8), date(2024, 5, 9), today, date(2024, 5, 11)] {
        let overdue = overdue_tasks(&subjects, day);
        let due_today = due_today_tasks(&subjects, day);
        assert!(
            overdue
                .iter()
                .all(|o| due_today.iter().all(|d| d.task.id != o.task.id)),
            "overdue and due-today overlap on {}",
            day
        );
    }

    let overdue: Vec<u64> = overdue_tasks(&subjects, today)
        .iter()
        .map(|t| t.task.id)
        .collect();
    let due_today: Vec<u64> = due_today_tasks(&subjects, today)
        .iter()
        .map(|t| t.task.id)
        .collect();
    assert_eq!(overdue, vec![1]);
    assert_eq!(due_today, vec![3]);

    // the calendar view shows completed tasks too
    assert_eq!(tasks_due_on(&subjects, today).len(), 2);
}

#[test]
fn test_sort_due_date_is_idempotent() {
    let subjects = vec![create_test_subject(
        1,
        "Maths",
        vec![
            create_test_task(1, date(2024, 3, 3), Priority::Low, false),
            create_test_task(2, date(2024, 3, 1), Priority::High, false),
            create_test_task(3, date(2024, 3, 3), Priority::High, false),
            create_test_task(4, date(2024, 3, 2), Priority::Medium, false),
        ],
    )];
    let flat = flatten_tasks(&subjects);

    let once = sort_tasks(&flat, SortBy::DueDate);
    let twice = sort_tasks(&once, SortBy::DueDate);
    assert_eq!(once, twice);

    let ids: Vec<u64> = once.iter().map(|t| t.task.id).collect();
    // ties keep their original order
    assert_eq!(ids, vec![2, 4, 1, 3]);
}

#[test]
fn test_sort_a_single_subjects_tasks_by_priority() {
    let tasks = vec![
        create_test_task(1, date(2024, 3, 1), Priority::Medium, false),
        create_test_task(2, date(2024, 3, 2), Priority::Low, false),
        create_test_task(3, date(2024, 3, 3), Priority::High, false),
    ];
    let ids: Vec<u64> = sort_tasks(&tasks, SortBy::Priority)
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn test_stats_balance_through_mutations() {
    let mut store = store_on(date(2024, 3, 10));
    let check = |s: TaskStats| assert_eq!(s.pending + s.completed, s.total);

    check(store.stats());
    let a = store.add_task(1, "A", None, None).unwrap();
    let b = store.add_task(2, "B", None, None).unwrap();
    check(store.stats());
    store.toggle_task_completed(1, a).unwrap();
    check(store.stats());
    assert_eq!(store.stats().completed, 1);
    store.delete_task(2, b).unwrap();
    check(store.stats());
    store.delete_subject(1).unwrap();
    check(store.stats());
    assert_eq!(store.stats(), TaskStats::default());
}

#[test]
fn test_store_views_follow_the_clock() {
    let mut store = store_on(date(2024, 3, 10));
    store
        .add_task(1, "Essay", Some(date(2024, 3, 11)), None)
        .unwrap();
    assert!(store.due_today_tasks().is_empty());

    store.clock().set_today(date(2024, 3, 11));
    assert_eq!(store.due_today_tasks().len(), 1);

    store.clock().set_today(date(2024, 3, 12));
    assert!(store.due_today_tasks().is_empty());
    assert_eq!(store.overdue_tasks().len(), 1);
}

#[test]
fn test_pinned_tasks_and_events_on() {
    let mut store = store_on(date(2024, 3, 10));
    let a = store.add_task(1, "Pinned", None, None).unwrap();
    store.add_task(2, "Loose", None, None).unwrap();
    store.toggle_task_pinned(1, a).unwrap();

    let pinned = pinned_tasks(store.subjects());
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].task.title, "Pinned");

    store
        .add_event(EventDraft::new("Exam", date(2024, 3, 20)))
        .unwrap();
    store
        .add_event(EventDraft::new("Club", date(2024, 3, 21)))
        .unwrap();
    let on_day = events_on(store.events(), date(2024, 3, 20));
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].title, "Exam");
}

#[test]
fn test_focus_summary_from_store() {
    let mut store = store_on(date(2024, 3, 10));
    store.add_focus_session(25).unwrap();
    store.clock().set_today(date(2024, 3, 11));
    store.add_focus_session(50).unwrap();

    let summary = store.focus_summary();
    assert_eq!(summary.sessions, 2);
    assert_eq!(summary.total_duration, 75);
    assert_eq!(summary.today_duration, 50);
}
