//! Plain-text rendering of planner views
//!
//! Used by the command-line host to print lists and the dashboard.

use crate::clock::Clock;
use crate::planner::{FlatTask, FocusSummary, SortBy, Subject, TaskStats};
use crate::storage::SnapshotStore;
use crate::store::PlanningStore;

/// Format one flattened task as a single line
pub fn format_task_line(task: &FlatTask) -> String {
    let mut flags = String::new();
    if task.task.pinned {
        flags.push_str(" [pinned]");
    }
    format!(
        "- [{}] {} (id: {}, due: {}, priority: {}, subject: {}/{}){}",
        if task.task.completed { "x" } else { " " },
        task.task.title,
        task.task.id,
        task.task.due_date,
        task.task.priority,
        task.subject_name,
        task.subject_color,
        flags
    )
}

/// Format tasks into a display string
pub fn format_tasks(tasks: &[FlatTask]) -> String {
    if tasks.is_empty() {
        return "No tasks found".to_string();
    }

    let mut result = format!("Found {} task(s):\n", tasks.len());
    for task in tasks {
        result.push_str(&format_task_line(task));
        result.push('\n');
    }
    result
}

pub fn format_stats(stats: &TaskStats) -> String {
    format!(
        "Pending: {}  Completed: {}  Total: {}",
        stats.pending, stats.completed, stats.total
    )
}

pub fn format_focus_summary(summary: &FocusSummary) -> String {
    format!(
        "Focus sessions: {}  Total: {}  Today: {}",
        summary.sessions, summary.total_duration, summary.today_duration
    )
}

/// List subjects with their task counts
pub fn format_subjects(subjects: &[Subject]) -> String {
    if subjects.is_empty() {
        return "No subjects found".to_string();
    }

    let mut result = String::new();
    for subject in subjects {
        let done = subject.tasks.iter().filter(|t| t.completed).count();
        result.push_str(&format!(
            "- [{}] {} ({}) {}/{} done\n",
            subject.id,
            subject.name,
            subject.color,
            done,
            subject.tasks.len()
        ));
    }
    result
}

/// Stats, due today, overdue, and the full timeline in `sort_by` order
pub fn format_dashboard<S: SnapshotStore, C: Clock>(
    store: &PlanningStore<S, C>,
    sort_by: SortBy,
) -> String {
    let overdue = store.overdue_tasks();
    let mut result = format!("Study Planner ({})\n", store.today());
    result.push_str(&format_stats(&store.stats()));
    result.push_str(&format!("  Overdue: {}\n", overdue.len()));
    result.push_str(&format_focus_summary(&store.focus_summary()));
    result.push('\n');

    let due_today = store.due_today_tasks();
    if !due_today.is_empty() {
        result.push_str("\nDue Today\n");
        result.push_str(&format_tasks(&due_today));
    }
    if !overdue.is_empty() {
        result.push_str("\nOverdue\n");
        result.push_str(&format_tasks(&overdue));
    }

    result.push_str("\nTimeline\n");
    result.push_str(&format_tasks(&store.sorted_tasks(sort_by)));
    result
}
