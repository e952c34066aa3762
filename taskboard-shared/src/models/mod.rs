/// Database models for Taskboard
///
/// # Models
///
/// - `account`: User accounts, roles and enrollment origin
/// - `task`: Personal tasks owned by one account
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::account::{Account, NewAccount, Provider, Role};
/// use taskboard_shared::db::pool::{create_pool, PoolConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&PoolConfig::new("postgres://localhost/taskboard")).await?;
///
/// let account = Account::create(&pool, NewAccount {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: Some("$argon2id$...".to_string()),
///     image: None,
///     role: Role::Student,
///     provider: Provider::Credentials,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod task;
