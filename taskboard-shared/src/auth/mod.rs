/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Signed session tokens and the resolved caller [`session::Identity`]
/// - [`secret`]: Constant-time comparison of shared secrets
///
/// # Example
///
/// ```no_run
/// use chrono::Duration;
/// use taskboard_shared::auth::password::{hash_password, verify_password, HashCost};
/// use taskboard_shared::auth::session::{Identity, SessionKeys};
/// use taskboard_shared::models::account::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &HashCost::default())?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let keys = SessionKeys::new("secret-key-at-least-thirty-two-bytes", Duration::days(30));
/// let token = keys.issue(&Identity { account_id: Uuid::new_v4(), role: Role::Student })?;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod secret;
pub mod session;
