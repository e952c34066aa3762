//! In-memory adapters
//!
//! Behave like the Postgres adapters: emails are unique after normalization,
//! lists come back newest first and `updated_at` strictly advances on every
//! update.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountRepository, StoreError, StoreResult, TaskRepository};
use crate::models::account::{normalize_email, Account, NewAccount};
use crate::models::task::{NewTask, Task, TaskChanges, TaskStatus};

/// Timestamp later than `previous`, even when the clock hasn't moved
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// In-memory account store
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        let email = normalize_email(&account.email);
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let record = Account {
            id: Uuid::new_v4(),
            name: account.name,
            email,
            password_hash: account.password_hash,
            image: account.image,
            role: account.role,
            provider: account.provider,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let email = normalize_email(email);
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn update_name(&self, id: Uuid, name: &str) -> StoreResult<Option<Account>> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.get_mut(&id).map(|account| {
            account.name = name.to_string();
            account.updated_at = next_timestamp(account.updated_at);
            account.clone()
        }))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&id) {
            Some(account) => {
                account.password_hash = Some(password_hash.to_string());
                account.updated_at = next_timestamp(account.updated_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug)]
struct StoredTask {
    /// Insertion order, breaks `created_at` ties
    seq: u64,
    task: Task,
}

#[derive(Debug, Default)]
struct TaskTable {
    next_seq: u64,
    rows: HashMap<Uuid, StoredTask>,
}

fn newest_first(table: &TaskTable, owner: Uuid, limit: usize) -> Vec<Task> {
    let mut rows: Vec<&StoredTask> = table
        .rows
        .values()
        .filter(|row| row.task.assigned_to == owner)
        .collect();
    rows.sort_by(|a, b| {
        b.task
            .created_at
            .cmp(&a.task.created_at)
            .then_with(|| b.seq.cmp(&a.seq))
    });

    rows.into_iter().take(limit).map(|row| row.task.clone()).collect()
}

/// In-memory task store
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    table: RwLock<TaskTable>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: NewTask) -> StoreResult<Task> {
        let mut table = self.table.write().await;

        let now = Utc::now();
        let record = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            assigned_to: task.assigned_to,
            created_at: now,
            updated_at: now,
        };

        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.insert(record.id, StoredTask { seq, task: record.clone() });
        Ok(record)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .get(&id)
            .filter(|row| row.task.assigned_to == owner)
            .map(|row| row.task.clone()))
    }

    async fn update_owned(&self, id: Uuid, owner: Uuid, changes: TaskChanges) -> StoreResult<Option<Task>> {
        let mut table = self.table.write().await;

        let Some(row) = table.rows.get_mut(&id).filter(|row| row.task.assigned_to == owner) else {
            return Ok(None);
        };

        let task = &mut row.task;
        task.title = changes.title;
        task.description = changes.description;
        task.status = changes.status;
        task.priority = changes.priority;
        task.due_date = changes.due_date;
        task.updated_at = next_timestamp(task.updated_at);
        Ok(Some(task.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut table = self.table.write().await;

        let owned = table
            .rows
            .get(&id)
            .is_some_and(|row| row.task.assigned_to == owner);
        if owned {
            table.rows.remove(&id);
        }
        Ok(owned)
    }

    async fn list_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Task>> {
        let table = self.table.read().await;
        Ok(newest_first(&table, owner, usize::MAX))
    }

    async fn recent_by_owner(&self, owner: Uuid, limit: usize) -> StoreResult<Vec<Task>> {
        let table = self.table.read().await;
        Ok(newest_first(&table, owner, limit))
    }

    async fn count_by_owner(&self, owner: Uuid, status: Option<TaskStatus>) -> StoreResult<u64> {
        let table = self.table.read().await;

        let count = table
            .rows
            .values()
            .filter(|row| row.task.assigned_to == owner)
            .filter(|row| status.map_or(true, |s| row.task.status == s))
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::{Provider, Role};
    use crate::models::task::TaskPriority;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: Some("hash".to_string()),
            image: None,
            role: Role::Student,
            provider: Provider::Credentials,
        }
    }

    fn new_task(owner: Uuid, title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            assigned_to: owner,
        }
    }

    #[tokio::test]
    async fn test_account_email_unique_case_insensitive() {
        let repo = InMemoryAccountRepository::new();
        repo.create(new_account("User@X.com")).await.unwrap();

        let err = repo.create(new_account("user@x.com ")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let found = repo.find_by_email("USER@x.COM").await.unwrap().unwrap();
        assert_eq!(found.email, "user@x.com");
    }

    #[tokio::test]
    async fn test_task_scoping() {
        let repo = InMemoryTaskRepository::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let task = repo.insert(new_task(owner, "mine")).await.unwrap();

        assert!(repo.find_owned(task.id, other).await.unwrap().is_none());
        assert!(!repo.delete_owned(task.id, other).await.unwrap());
        assert!(repo
            .update_owned(task.id, other, TaskChanges::from_task(&task))
            .await
            .unwrap()
            .is_none());

        assert!(repo.delete_owned(task.id, owner).await.unwrap());
        assert!(repo.find_owned(task.id, owner).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = InMemoryTaskRepository::new();
        let owner = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            repo.insert(new_task(owner, title)).await.unwrap();
        }
        repo.insert(new_task(Uuid::new_v4(), "foreign")).await.unwrap();

        let titles: Vec<_> = repo
            .list_by_owner(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_recent_is_limited_and_owner_scoped() {
        let repo = InMemoryTaskRepository::new();
        let owner = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            repo.insert(new_task(owner, title)).await.unwrap();
        }
        repo.insert(new_task(Uuid::new_v4(), "foreign")).await.unwrap();

        let titles: Vec<_> = repo
            .recent_by_owner(owner, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["third", "second"]);

        assert_eq!(repo.recent_by_owner(owner, 10).await.unwrap().len(), 3);
        assert!(repo.recent_by_owner(owner, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_advances_updated_at() {
        let repo = InMemoryTaskRepository::new();
        let owner = Uuid::new_v4();
        let task = repo.insert(new_task(owner, "t")).await.unwrap();

        let mut changes = TaskChanges::from_task(&task);
        changes.status = TaskStatus::Completed;
        let updated = repo.update_owned(task.id, owner, changes).await.unwrap().unwrap();

        assert!(updated.updated_at > task.updated_at);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let repo = InMemoryTaskRepository::new();
        let owner = Uuid::new_v4();
        let task = repo.insert(new_task(owner, "a")).await.unwrap();
        repo.insert(new_task(owner, "b")).await.unwrap();

        let mut changes = TaskChanges::from_task(&task);
        changes.status = TaskStatus::InProgress;
        repo.update_owned(task.id, owner, changes).await.unwrap();

        assert_eq!(repo.count_by_owner(owner, None).await.unwrap(), 2);
        assert_eq!(repo.count_by_owner(owner, Some(TaskStatus::Pending)).await.unwrap(), 1);
        assert_eq!(repo.count_by_owner(owner, Some(TaskStatus::InProgress)).await.unwrap(), 1);
        assert_eq!(repo.count_by_owner(owner, Some(TaskStatus::Completed)).await.unwrap(), 0);
    }
}
