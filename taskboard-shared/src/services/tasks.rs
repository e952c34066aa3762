//! Task lifecycle
//!
//! Create, read, update, delete, board and dashboard statistics for the
//! caller's own tasks. Every operation is scoped by the caller's account ID,
//! and a task owned by someone else is reported as [`TaskError::NotFound`],
//! exactly like a task that doesn't exist.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::OPAQUE_FAILURE;
use crate::auth::session::Identity;
use crate::models::task::{NewTask, Task, TaskChanges, TaskStatus};
use crate::store::{StoreError, TaskRepository};
use crate::validation::{today, TaskForm, ValidationErrors};

/// Task lifecycle failures
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Field-level input errors
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// Missing, or owned by another account
    #[error("Task not found")]
    NotFound,

    /// Persistence failure; the cause has already been logged
    #[error("{}", OPAQUE_FAILURE)]
    Storage,
}

/// Logs a storage failure and hides it behind [`TaskError::Storage`]
fn storage(operation: &'static str) -> impl FnOnce(StoreError) -> TaskError {
    move |err| {
        error!(operation, error = %err, "Task storage failure");
        TaskError::Storage
    }
}

/// Dashboard summary
///
/// The four counts are separate queries and may not agree with each other
/// under concurrent writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub in_progress: u64,

    /// round(100 * completed / total), 0 without tasks
    pub completion_rate: u8,
}

impl TaskStats {
    fn new(total: u64, completed: u64, pending: u64, in_progress: u64) -> Self {
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed.min(total) as f64 / total as f64) * 100.0).round() as u8
        };

        Self {
            total,
            completed,
            pending,
            in_progress,
            completion_rate,
        }
    }
}

/// One board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub label: &'static str,
    pub tasks: Vec<Task>,
}

/// Tasks grouped by status, columns in workflow order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

impl Board {
    fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut columns: Vec<BoardColumn> = TaskStatus::ALL
            .iter()
            .map(|&status| BoardColumn {
                status,
                label: status.label(),
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
                column.tasks.push(task);
            }
        }

        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.status == status)
    }
}

/// Owner-scoped task operations
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    today: fn() -> NaiveDate,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self {
            repo,
            today: today as fn() -> NaiveDate,
        }
    }

    /// Replaces the calendar used for due-date checks
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Validates and stores a new task owned by the caller
    ///
    /// Any `assignedTo` in the form is shape-checked, then ignored.
    pub async fn create(&self, identity: &Identity, form: TaskForm) -> Result<Task, TaskError> {
        let input = form.validate_on((self.today)())?;
        let changes = input.into_changes();

        let task = self
            .repo
            .insert(NewTask {
                title: changes.title,
                description: changes.description,
                status: changes.status,
                priority: changes.priority,
                due_date: changes.due_date,
                assigned_to: identity.account_id,
            })
            .await
            .map_err(storage("create"))?;

        info!(task_id = %task.id, account_id = %identity.account_id, "Task created");
        Ok(task)
    }

    /// Loads one of the caller's tasks
    pub async fn get(&self, identity: &Identity, id: Uuid) -> Result<Task, TaskError> {
        self.repo
            .find_owned(id, identity.account_id)
            .await
            .map_err(storage("get"))?
            .ok_or(TaskError::NotFound)
    }

    /// Replaces every mutable field of one of the caller's tasks
    ///
    /// Validation runs before the ownership lookup, so bad input is reported
    /// even for a task the caller can't see.
    pub async fn update(&self, identity: &Identity, id: Uuid, form: TaskForm) -> Result<Task, TaskError> {
        let input = form.validate_on((self.today)())?;

        let task = self
            .repo
            .update_owned(id, identity.account_id, input.into_changes())
            .await
            .map_err(storage("update"))?
            .ok_or(TaskError::NotFound)?;

        info!(task_id = %task.id, account_id = %identity.account_id, status = %task.status, "Task updated");
        Ok(task)
    }

    /// Board drag-and-drop: a full update with only `status` changed
    ///
    /// The stored fields are re-validated too, so a task whose due date has
    /// passed can't be moved until the date is fixed.
    pub async fn move_status(&self, identity: &Identity, id: Uuid, status: &str) -> Result<Task, TaskError> {
        let current = self.get(identity, id).await?;

        let form = TaskForm {
            status: Some(status.to_string()),
            ..TaskForm::from_changes(&TaskChanges::from_task(&current))
        };

        debug!(task_id = %id, from = %current.status, to = status, "Moving task");
        self.update(identity, id, form).await
    }

    /// Deletes one of the caller's tasks
    pub async fn delete(&self, identity: &Identity, id: Uuid) -> Result<(), TaskError> {
        let deleted = self
            .repo
            .delete_owned(id, identity.account_id)
            .await
            .map_err(storage("delete"))?;

        if !deleted {
            return Err(TaskError::NotFound);
        }

        info!(task_id = %id, account_id = %identity.account_id, "Task deleted");
        Ok(())
    }

    /// The caller's tasks, newest first
    pub async fn list(&self, identity: &Identity) -> Result<Vec<Task>, TaskError> {
        self.repo
            .list_by_owner(identity.account_id)
            .await
            .map_err(storage("list"))
    }

    /// The caller's `limit` newest tasks
    pub async fn recent(&self, identity: &Identity, limit: usize) -> Result<Vec<Task>, TaskError> {
        self.repo
            .recent_by_owner(identity.account_id, limit)
            .await
            .map_err(storage("recent"))
    }

    /// The caller's tasks grouped into status columns
    pub async fn board(&self, identity: &Identity) -> Result<Board, TaskError> {
        Ok(Board::from_tasks(self.list(identity).await?))
    }

    /// Dashboard counts, each an independent scoped query
    pub async fn stats(&self, identity: &Identity) -> Result<TaskStats, TaskError> {
        let owner = identity.account_id;

        let (total, completed, pending, in_progress) = tokio::try_join!(
            self.repo.count_by_owner(owner, None),
            self.repo.count_by_owner(owner, Some(TaskStatus::Completed)),
            self.repo.count_by_owner(owner, Some(TaskStatus::Pending)),
            self.repo.count_by_owner(owner, Some(TaskStatus::InProgress)),
        )
        .map_err(storage("stats"))?;

        Ok(TaskStats::new(total, completed, pending, in_progress))
    }

    /// Whether task storage is reachable
    pub async fn ping(&self) -> Result<(), TaskError> {
        self.repo.ping().await.map_err(storage("ping"))
    }
}
