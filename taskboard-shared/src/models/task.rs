/// Task model and database operations
///
/// Tasks are personal to-do items. Every task is owned by exactly one account
/// (`assigned_to`), and every query in this module is scoped by that owner.
///
/// # Status
///
/// ```text
/// pending ⇄ in-progress ⇄ completed
///    ⇅__________________________⇅
/// ```
///
/// Any status is reachable from any other in a single update. Nothing changes
/// status on its own.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in-progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(100) NOT NULL,
///     description VARCHAR(1000),
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     assigned_to UUID NOT NULL REFERENCES accounts(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{NewTask, Task, TaskPriority, TaskStatus};
/// use taskboard_shared::db::pool::{create_pool, PoolConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&PoolConfig::new("postgres://localhost/taskboard")).await?;
/// let owner = Uuid::new_v4();
///
/// let task = Task::create(&pool, NewTask {
///     title: "Write report".to_string(),
///     description: None,
///     status: TaskStatus::Pending,
///     priority: TaskPriority::Medium,
///     due_date: None,
///     assigned_to: owner,
/// }).await?;
///
/// let mine = Task::list_by_owner(&pool, owner).await?;
/// assert_eq!(mine[0].id, task.id);
/// # Ok(())
/// # }
/// ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// All statuses in board column order
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Converts status to its wire/database literal
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Human-readable column label
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownLiteral(other.to_string())),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Medium priority (default)
    #[default]
    Medium,

    /// High priority
    High,
}

impl TaskPriority {
    /// Converts priority to its wire/database literal
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(UnknownLiteral(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown status or priority literal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown literal: {0}")]
pub struct UnknownLiteral(pub String);

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Title (1-100 characters)
    pub title: String,

    /// Optional description (up to 1000 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date (calendar date, no time of day)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Owning account, immutable after creation
    pub assigned_to: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Uuid,
}

/// Full replacement of a task's mutable fields
///
/// `assigned_to` is deliberately absent: ownership never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

impl TaskChanges {
    /// Current mutable fields of a task, used as the base for partial edits
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
        }
    }
}

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, assigned_to, created_at, updated_at";

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist or the database operation fails
    pub async fn create(pool: &PgPool, data: NewTask) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO tasks (title, description, status, priority, due_date, assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.priority)
            .bind(data.due_date)
            .bind(data.assigned_to)
            .fetch_one(pool)
            .await
    }

    /// Finds a task by ID, only if it belongs to `owner`
    pub async fn find_owned(pool: &PgPool, id: Uuid, owner: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND assigned_to = $2");

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Replaces the mutable fields of a task owned by `owner`
    ///
    /// The ownership check and the write are one statement, so a task owned by
    /// someone else is indistinguishable from a missing one.
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task with that ID belongs to `owner`
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE tasks
            SET title = $3,
                description = $4,
                status = $5,
                priority = $6,
                due_date = $7,
                updated_at = clock_timestamp()
            WHERE id = $1 AND assigned_to = $2
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.status)
            .bind(changes.priority)
            .bind(changes.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a task owned by `owner`
    ///
    /// # Returns
    ///
    /// True if a task was deleted, false if none matched
    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND assigned_to = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all tasks of `owner`, newest first
    pub async fn list_by_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE assigned_to = $1 ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// The `limit` newest tasks of `owner`
    pub async fn recent_by_owner(pool: &PgPool, owner: Uuid, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE assigned_to = $1 ORDER BY created_at DESC, id DESC LIMIT $2"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(owner)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Counts tasks of `owner`, optionally restricted to one status
    pub async fn count_by_owner(
        pool: &PgPool,
        owner: Uuid,
        status: Option<TaskStatus>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE assigned_to = $1
              AND ($2::task_status IS NULL OR status = $2)
            "#,
        )
        .bind(owner)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
