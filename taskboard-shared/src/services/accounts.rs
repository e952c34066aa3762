//! Registration, sign-in and account settings
//!
//! Two enrollment paths exist. Credential registration stores an Argon2id
//! hash; provider sign-in creates the account on first contact with no hash
//! at all. The enrollment origin then decides which sign-in path the account
//! may use.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::OPAQUE_FAILURE;
use crate::auth::password::{hash_password_async, verify_password_async, HashCost, PasswordError};
use crate::auth::session::{Identity, SessionKeys};
use crate::models::account::{normalize_email, Account, NewAccount, Provider, Role};
use crate::store::{AccountRepository, StoreError};
use crate::validation::{LoginForm, PasswordChangeForm, ProfileForm, RegistrationForm, ValidationErrors};

/// Account operation failures
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Field-level input errors
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// Email already registered
    #[error("User already exists")]
    Conflict,

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account was enrolled through a provider
    #[error("This email is registered with {0}. Please login with that provider.")]
    WrongProvider(Provider),

    /// Provider-enrolled account with no password set
    #[error("This account signs in with a provider and has no password to change")]
    NoPassword,

    #[error("Incorrect current password")]
    IncorrectPassword,

    #[error("Account not found")]
    NotFound,

    /// Internal failure; the cause has already been logged
    #[error("{}", OPAQUE_FAILURE)]
    Storage,
}

fn storage(operation: &'static str) -> impl FnOnce(StoreError) -> AccountError {
    move |err| {
        error!(operation, error = %err, "Account storage failure");
        AccountError::Storage
    }
}

fn hashing(operation: &'static str) -> impl FnOnce(PasswordError) -> AccountError {
    move |err| {
        error!(operation, error = %err, "Password hashing failure");
        AccountError::Storage
    }
}

/// Identity asserted by a third-party provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderProfile {
    pub provider: Provider,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Account operations
#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    hash_cost: HashCost,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>, hash_cost: HashCost) -> Self {
        Self { repo, hash_cost }
    }

    /// Registers a credential account
    ///
    /// # Errors
    ///
    /// [`AccountError::Conflict`] if the email is taken, compared
    /// case-insensitively
    pub async fn register(&self, form: RegistrationForm) -> Result<Account, AccountError> {
        let registration = form.validate()?;

        if self
            .repo
            .find_by_email(&registration.email)
            .await
            .map_err(storage("register"))?
            .is_some()
        {
            return Err(AccountError::Conflict);
        }

        let password_hash = hash_password_async(registration.password, self.hash_cost)
            .await
            .map_err(hashing("register"))?;

        let account = self
            .repo
            .create(NewAccount {
                name: registration.name,
                email: registration.email,
                password_hash: Some(password_hash),
                image: None,
                role: Role::Student,
                provider: Provider::Credentials,
            })
            .await
            .map_err(|err| match err {
                StoreError::DuplicateEmail => AccountError::Conflict,
                other => storage("register")(other),
            })?;

        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Credential sign-in
    pub async fn sign_in(&self, form: LoginForm) -> Result<Account, AccountError> {
        let credentials = form.validate()?;

        let account = self
            .repo
            .find_by_email(&credentials.email)
            .await
            .map_err(storage("sign_in"))?
            .ok_or(AccountError::InvalidCredentials)?;

        if account.provider != Provider::Credentials {
            return Err(AccountError::WrongProvider(account.provider));
        }

        let Some(hash) = account.password_hash.clone() else {
            warn!(account_id = %account.id, "Credential account without password hash");
            return Err(AccountError::InvalidCredentials);
        };

        if !verify_password_async(credentials.password, hash)
            .await
            .map_err(hashing("sign_in"))?
        {
            return Err(AccountError::InvalidCredentials);
        }

        info!(account_id = %account.id, "Signed in with credentials");
        Ok(account)
    }

    /// Provider-delegated sign-in
    ///
    /// Creates a `student` account without a password on first contact and
    /// reuses the stored account afterwards.
    pub async fn sign_in_with_provider(&self, profile: ProviderProfile) -> Result<Account, AccountError> {
        if profile.provider == Provider::Credentials {
            return Err(ValidationErrors::single("provider", "Not a third-party provider").into());
        }

        let email = normalize_email(&profile.email);
        {
            use validator::ValidateEmail;
            if !email.validate_email() {
                return Err(ValidationErrors::single("email", "Please enter a valid email").into());
            }
        }

        if let Some(existing) = self
            .repo
            .find_by_email(&email)
            .await
            .map_err(storage("provider_sign_in"))?
        {
            info!(account_id = %existing.id, provider = %profile.provider, "Signed in with provider");
            return Ok(existing);
        }

        let name = match profile.name.trim() {
            "" => email.split('@').next().unwrap_or_default().to_string(),
            name => name.to_string(),
        };

        let created = self
            .repo
            .create(NewAccount {
                name,
                email: email.clone(),
                password_hash: None,
                image: profile.image,
                role: Role::Student,
                provider: profile.provider,
            })
            .await;

        let account = match created {
            Ok(account) => {
                info!(account_id = %account.id, provider = %profile.provider, "Account created on first provider sign-in");
                account
            }
            // Lost a race with a concurrent first sign-in
            Err(StoreError::DuplicateEmail) => self
                .repo
                .find_by_email(&email)
                .await
                .map_err(storage("provider_sign_in"))?
                .ok_or(AccountError::Storage)?,
            Err(other) => return Err(storage("provider_sign_in")(other)),
        };

        Ok(account)
    }

    /// Resolves the session identity, reading the role from storage when the
    /// caller doesn't know it
    pub async fn resolve_identity(&self, account_id: Uuid, role: Option<Role>) -> Result<Identity, AccountError> {
        let role = match role {
            Some(role) => role,
            None => {
                self.repo
                    .find_by_id(account_id)
                    .await
                    .map_err(storage("resolve_identity"))?
                    .ok_or(AccountError::NotFound)?
                    .role
            }
        };

        Ok(Identity { account_id, role })
    }

    /// Signs a session token for the account
    pub async fn issue_session(
        &self,
        keys: &SessionKeys,
        account_id: Uuid,
        role: Option<Role>,
    ) -> Result<String, AccountError> {
        let identity = self.resolve_identity(account_id, role).await?;

        keys.issue(&identity).map_err(|err| {
            error!(account_id = %account_id, error = %err, "Failed to sign session token");
            AccountError::Storage
        })
    }

    /// The caller's account
    pub async fn profile(&self, identity: &Identity) -> Result<Account, AccountError> {
        self.repo
            .find_by_id(identity.account_id)
            .await
            .map_err(storage("profile"))?
            .ok_or(AccountError::NotFound)
    }

    pub async fn update_profile(&self, identity: &Identity, form: ProfileForm) -> Result<Account, AccountError> {
        let update = form.validate()?;

        let account = self
            .repo
            .update_name(identity.account_id, &update.name)
            .await
            .map_err(storage("update_profile"))?
            .ok_or(AccountError::NotFound)?;

        info!(account_id = %account.id, "Profile updated");
        Ok(account)
    }

    /// Replaces the password after checking the current one
    ///
    /// The stored hash is untouched on every failure path.
    pub async fn change_password(&self, identity: &Identity, form: PasswordChangeForm) -> Result<(), AccountError> {
        let change = form.validate()?;

        let account = self.profile(identity).await?;

        let Some(hash) = account.password_hash else {
            return Err(AccountError::NoPassword);
        };

        if !verify_password_async(change.current_password, hash)
            .await
            .map_err(hashing("change_password"))?
        {
            return Err(AccountError::IncorrectPassword);
        }

        let new_hash = hash_password_async(change.new_password, self.hash_cost)
            .await
            .map_err(hashing("change_password"))?;

        if !self
            .repo
            .update_password_hash(account.id, &new_hash)
            .await
            .map_err(storage("change_password"))?
        {
            return Err(AccountError::NotFound);
        }

        info!(account_id = %account.id, "Password changed");
        Ok(())
    }
}
