/// Account model and database operations
///
/// Accounts are created either by direct credential registration or on first
/// sign-in through a third-party identity provider. Emails are stored trimmed
/// and lower-cased, which makes the unique constraint case-insensitive.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_role AS ENUM ('student', 'admin');
/// CREATE TYPE account_provider AS ENUM ('credentials', 'google');
///
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(320) NOT NULL CONSTRAINT accounts_email_key UNIQUE,
///     password_hash VARCHAR(255),
///     image VARCHAR(1024),
///     role account_role NOT NULL DEFAULT 'student',
///     provider account_provider NOT NULL DEFAULT 'credentials',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::task::UnknownLiteral;

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user (default)
    #[default]
    Student,

    /// Administrator
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

/// How an account was enrolled
///
/// The enrollment origin decides which sign-in path is valid for the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_provider", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Email and password registration
    Credentials,

    /// Google sign-in
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Credentials => "credentials",
            Provider::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentials" => Ok(Provider::Credentials),
            "google" => Ok(Provider::Google),
            other => Err(UnknownLiteral(other.to_string())),
        }
    }
}

/// Account record
///
/// `password_hash` is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Normalized (trimmed, lower-case) email, unique across accounts
    pub email: String,

    /// Argon2id hash; absent for provider-enrolled accounts
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,

    /// Optional avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub role: Role,

    /// Enrollment origin
    pub provider: Provider,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,

    /// Must already be normalized with [`normalize_email`]
    pub email: String,

    pub password_hash: Option<String>,
    pub image: Option<String>,
    pub role: Role,
    pub provider: Provider,
}

/// Trims and lower-cases an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password_hash, image, role, provider, created_at, updated_at";

impl Account {
    /// Creates a new account
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// `accounts_email_key`) or the database operation fails
    pub async fn create(pool: &PgPool, data: NewAccount) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO accounts (name, email, password_hash, image, role, provider)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(data.name)
            .bind(normalize_email(&data.email))
            .bind(data.password_hash)
            .bind(data.image)
            .bind(data.role)
            .bind(data.provider)
            .fetch_one(pool)
            .await
    }

    /// Finds an account by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");

        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds an account by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");

        sqlx::query_as::<_, Account>(&query)
            .bind(normalize_email(email))
            .fetch_optional(pool)
            .await
    }

    /// Sets the display name
    ///
    /// # Returns
    ///
    /// The updated account, None if it doesn't exist
    pub async fn update_name(pool: &PgPool, id: Uuid, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Replaces the password hash
    ///
    /// # Returns
    ///
    /// True if the account was found and updated
    pub async fn update_password_hash(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
