/// Account settings
///
/// - `GET /settings/profile`
/// - `PUT /settings/profile`: `{ "name": "..." }`
/// - `PUT /settings/password`: `{ "currentPassword", "newPassword", "confirmNewPassword" }`

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use taskboard_shared::{
    models::account::Account,
    validation::{PasswordChangeForm, ProfileForm},
};

use crate::{app::AppState, error::ApiResult, session::AuthUser};

#[derive(Debug, Serialize)]
pub struct PasswordChangedResponse {
    pub success: bool,
}

pub async fn get_profile(State(state): State<AppState>, AuthUser(identity): AuthUser) -> ApiResult<Json<Account>> {
    Ok(Json(state.accounts.profile(&identity).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Account>> {
    let Json(value) = payload?;
    let form = ProfileForm::from_value(&value)?;

    Ok(Json(state.accounts.update_profile(&identity, form).await?))
}

/// Change the caller's password
///
/// # Errors
///
/// - `422`: Field errors (including a mismatched confirmation)
/// - `400`: Wrong current password, or a provider account with no password
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PasswordChangedResponse>> {
    let Json(value) = payload?;
    let form = PasswordChangeForm::from_value(&value)?;

    state.accounts.change_password(&identity, form).await?;
    Ok(Json(PasswordChangedResponse { success: true }))
}
