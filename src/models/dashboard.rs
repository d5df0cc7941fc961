use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::task::{Task, TaskStatus};

const RECENT_LIMIT: usize = 5;
const DUE_SOON_DAYS: i64 = 7;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

/// Aggregated view of one user's tasks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    pub by_status: StatusCounts,
    /// Open tasks whose due date has passed.
    pub overdue: usize,
    /// Open tasks due within the next seven days.
    pub due_soon: usize,
    /// Percentage of tasks in `done`, rounded down.
    pub completion_rate: u8,
    pub recent: Vec<Task>,
}

impl DashboardSummary {
    pub fn from_tasks(mut tasks: Vec<Task>, now: DateTime<Utc>) -> Self {
        let mut by_status = StatusCounts::default();
        let mut overdue = 0;
        let mut due_soon = 0;
        let horizon = now + Duration::days(DUE_SOON_DAYS);

        for task in &tasks {
            match task.status {
                TaskStatus::Todo => by_status.todo += 1,
                TaskStatus::InProgress => by_status.in_progress += 1,
                TaskStatus::Review => by_status.review += 1,
                TaskStatus::Done => by_status.done += 1,
            }
            if task.status == TaskStatus::Done {
                continue;
            }
            match task.due_date {
                Some(due) if due < now => overdue += 1,
                Some(due) if due <= horizon => due_soon += 1,
                _ => {}
            }
        }

        let total = tasks.len();
        let completion_rate = if total == 0 {
            0
        } else {
            (by_status.done * 100 / total) as u8
        };

        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks.truncate(RECENT_LIMIT);

        Self {
            total,
            by_status,
            overdue,
            due_soon,
            completion_rate,
            recent: tasks,
        }
    }
}
