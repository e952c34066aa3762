//! Storage ports for accounts and tasks
//!
//! Services depend on the [`AccountRepository`] and [`TaskRepository`]
//! traits only. Two adapters implement them:
//!
//! - [`postgres`]: `sqlx` over a shared `PgPool`
//! - [`memory`]: process-local maps, for tests and database-less local runs
//!
//! Every task operation takes the owner's ID and filters by it. A task that
//! exists but belongs to someone else is reported exactly like a missing one.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::account::{Account, NewAccount};
use crate::models::task::{NewTask, Task, TaskChanges, TaskStatus};

pub use memory::{InMemoryAccountRepository, InMemoryTaskRepository};
pub use postgres::{PgAccountRepository, PgTaskRepository};

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by repository implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An account with the same normalized email already exists
    #[error("email already registered")]
    DuplicateEmail,

    /// Database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Account persistence contract
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Stores a new account
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEmail`] when the normalized email is taken
    async fn create(&self, account: NewAccount) -> StoreResult<Account>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Returns None when the account doesn't exist
    async fn update_name(&self, id: Uuid, name: &str) -> StoreResult<Option<Account>>;

    /// Returns false when the account doesn't exist
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool>;
}

/// Owner-scoped task persistence contract
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task with server-assigned ID and timestamps
    async fn insert(&self, task: NewTask) -> StoreResult<Task>;

    /// The task, if it exists and belongs to `owner`
    async fn find_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>>;

    /// Replaces the mutable fields and bumps `updated_at`
    ///
    /// The ownership check and the write are a single step. Returns None when
    /// no task with that ID belongs to `owner`.
    async fn update_owned(&self, id: Uuid, owner: Uuid, changes: TaskChanges) -> StoreResult<Option<Task>>;

    /// Returns false when no task with that ID belongs to `owner`
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;

    /// All tasks of `owner`, newest first
    async fn list_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Task>>;

    /// The `limit` newest tasks of `owner`
    async fn recent_by_owner(&self, owner: Uuid, limit: usize) -> StoreResult<Vec<Task>>;

    /// Number of tasks of `owner`, optionally with one status only
    async fn count_by_owner(&self, owner: Uuid, status: Option<TaskStatus>) -> StoreResult<u64>;

    /// Checks the backing store is reachable
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
