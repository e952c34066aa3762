/// Password hashing using Argon2id
///
/// Hashes are stored in PHC string format, so the parameters a hash was
/// produced with travel with it and verification never depends on the
/// current [`HashCost`].
///
/// # Parameters
///
/// - **Default**: 64 MiB memory, 3 passes, 4 lanes, 32-byte output
/// - **Low**: 8 MiB memory, 1 pass, 1 lane (test and development setups)
///
/// Hashing is CPU and memory heavy, so request handlers use the async
/// wrappers [`hash_password_async`] and [`verify_password_async`] which move
/// the work onto the blocking pool.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password, HashCost};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cost = HashCost::low();
/// let hash = hash_password("super_secret_password_123", &cost)?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use std::str::FromStr;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// The blocking hash task panicked or was cancelled
    #[error("Password task failed: {0}")]
    Join(String),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl HashCost {
    /// Cheap profile for tests and local development
    pub fn low() -> Self {
        Self {
            memory_kib: 8192,
            iterations: 1,
            parallelism: 1,
        }
    }
}

impl FromStr for HashCost {
    type Err = String;

    /// Parses a profile name (`default` or `low`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Self::default()),
            "low" => Ok(Self::low()),
            other => Err(format!("unknown password hash cost profile '{}'", other)),
        }
    }
}

/// Hashes a password with a fresh random salt
///
/// # Returns
///
/// PHC string format hash, e.g.
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are rejected or
/// hashing fails
pub fn hash_password(password: &str, cost: &HashCost) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(cost.memory_kib)
        .t_cost(cost.iterations)
        .p_cost(cost.parallelism)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time.
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash can't be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the hash
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// [`hash_password`] on the blocking pool
pub async fn hash_password_async(password: String, cost: HashCost) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, &cost))
        .await
        .map_err(|e| PasswordError::Join(e.to_string()))?
}

/// [`verify_password`] on the blocking pool
pub async fn verify_password_async(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::Join(e.to_string()))?
}
