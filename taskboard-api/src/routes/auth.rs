/// Authentication endpoints
///
/// - `POST /register`: Create a credential account (no session is started)
/// - `POST /login`: Credential sign-in; sets the session cookie and returns the token
/// - `POST /logout`: Clears the session cookie
/// - `POST /auth/provider`: Trusted callback for third-party sign-in
///
/// The provider callback is for the identity-provider integration, not for
/// browsers: it must carry `Authorization: Bearer <PROVIDER_CALLBACK_SECRET>`
/// and is disabled when that secret isn't configured.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use taskboard_shared::{
    auth::secret::secrets_match,
    models::account::Account,
    services::ProviderProfile,
    validation::{LoginForm, RegistrationForm},
};
use tower_cookies::Cookies;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    session::{bearer_token, clear_session_cookie, set_session_cookie},
};

/// Successful sign-in
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub account: Account,

    /// Same token as the cookie, for clients that use Bearer auth
    pub token: String,

    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Register a credential account
///
/// ```text
/// POST /register
///
/// { "name": "Ada", "email": "ada@example.com", "password": "secret1", "confirmPassword": "secret1" }
/// ```
///
/// # Errors
///
/// - `422`: Field errors
/// - `409`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let Json(value) = payload?;
    let form = RegistrationForm::from_value(&value)?;

    let account = state.accounts.register(form).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

async fn start_session(state: &AppState, cookies: &Cookies, account: Account) -> ApiResult<Json<SessionResponse>> {
    let token = state
        .accounts
        .issue_session(&state.sessions, account.id, Some(account.role))
        .await?;

    set_session_cookie(
        cookies,
        token.clone(),
        state.config.session.ttl_days,
        state.config.session.cookie_secure,
    );

    Ok(Json(SessionResponse {
        account,
        token,
        expires_in: state.sessions.ttl().num_seconds(),
    }))
}

/// Credential sign-in
///
/// # Errors
///
/// - `422`: Field errors
/// - `401`: Invalid email or password, or the account uses a provider
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let Json(value) = payload?;
    let form = LoginForm::from_value(&value)?;

    let account = state.accounts.sign_in(form).await?;
    start_session(&state, &cookies, account).await
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> StatusCode {
    clear_session_cookie(&cookies, state.config.session.cookie_secure);
    StatusCode::NO_CONTENT
}

/// Provider-delegated sign-in
///
/// ```text
/// POST /auth/provider
/// Authorization: Bearer <PROVIDER_CALLBACK_SECRET>
///
/// { "provider": "google", "name": "Grace", "email": "grace@example.com", "image": "https://..." }
/// ```
pub async fn provider_sign_in(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    payload: Result<Json<ProviderProfile>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let Some(expected) = state.config.auth.provider_callback_secret.as_deref() else {
        return Err(ApiError::NotFound("Provider sign-in is not enabled".to_string()));
    };

    let presented = bearer_token(&headers).unwrap_or_default();
    if !secrets_match(presented, expected) {
        tracing::warn!("Rejected provider callback with bad credentials");
        return Err(ApiError::Unauthorized("Invalid provider callback credentials".to_string()));
    }

    let Json(profile) = payload?;
    let account = state.accounts.sign_in_with_provider(profile).await?;
    start_session(&state, &cookies, account).await
}
