//! PostgreSQL adapters
//!
//! Thin wrappers over the queries in [`crate::models`]; the only translation
//! done here is mapping the email unique constraint onto
//! [`StoreError::DuplicateEmail`].

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccountRepository, StoreError, StoreResult, TaskRepository};
use crate::db::pool::health_check;
use crate::models::account::{Account, NewAccount};
use crate::models::task::{NewTask, Task, TaskChanges, TaskStatus};

const EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// Accounts table
#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_duplicate_email(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation() && db.constraint() == Some(EMAIL_CONSTRAINT) =>
        {
            StoreError::DuplicateEmail
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        Account::create(&self.pool, account)
            .await
            .map_err(map_duplicate_email)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(Account::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(Account::find_by_email(&self.pool, email).await?)
    }

    async fn update_name(&self, id: Uuid, name: &str) -> StoreResult<Option<Account>> {
        Ok(Account::update_name(&self.pool, id, name).await?)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        Ok(Account::update_password_hash(&self.pool, id, password_hash).await?)
    }
}

/// Tasks table
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn insert(&self, task: NewTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, task).await?)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_owned(&self.pool, id, owner).await?)
    }

    async fn update_owned(&self, id: Uuid, owner: Uuid, changes: TaskChanges) -> StoreResult<Option<Task>> {
        Ok(Task::update_owned(&self.pool, id, owner, changes).await?)
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        Ok(Task::delete_owned(&self.pool, id, owner).await?)
    }

    async fn list_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_owner(&self.pool, owner).await?)
    }

    async fn recent_by_owner(&self, owner: Uuid, limit: usize) -> StoreResult<Vec<Task>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(Task::recent_by_owner(&self.pool, owner, limit).await?)
    }

    async fn count_by_owner(&self, owner: Uuid, status: Option<TaskStatus>) -> StoreResult<u64> {
        let count = Task::count_by_owner(&self.pool, owner, status).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
