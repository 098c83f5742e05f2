//! Account management endpoints.
//!
//! Every route requires a bearer token. Authorization is decided from the
//! token's claims alone.

use crate::error::AppError;
use crate::extractors::{AuthUser, JsonBody};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sps_auth::providers::UserRepository;
use sps_auth::{AccountChanges, NewAccount, PublicUser, UserId};

/// `GET /users`
///
/// # Errors
///
/// Returns 401 without a valid token.
pub async fn list_users<U: UserRepository + 'static>(
    State(state): State<AppState<U>>,
    _caller: AuthUser,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    Ok(Json(state.accounts.list().await?))
}

/// `GET /users/:id`
///
/// # Errors
///
/// Returns 401 without a valid token and 404 for an unknown id.
pub async fn get_user<U: UserRepository + 'static>(
    State(state): State<AppState<U>>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(state.accounts.get(&UserId(id)).await?))
}

/// `POST /users`
///
/// # Errors
///
/// - 400 for invalid fields
/// - 403 if a non-admin creates an admin
/// - 409 for a duplicate email
pub async fn create_user<U: UserRepository + 'static>(
    State(state): State<AppState<U>>,
    caller: AuthUser,
    JsonBody(account): JsonBody<NewAccount>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let created = state.accounts.create(&caller.actor(), account).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /users/:id`
///
/// # Errors
///
/// - 400 for invalid fields
/// - 403 unless the caller is the account itself or an admin, or when a
///   non-admin changes a role
/// - 404 for an unknown id
/// - 409 if the new email is taken
pub async fn update_user<U: UserRepository + 'static>(
    State(state): State<AppState<U>>,
    caller: AuthUser,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<AccountChanges>,
) -> Result<Json<PublicUser>, AppError> {
    let updated = state
        .accounts
        .update(&caller.actor(), &UserId(id), changes)
        .await?;
    Ok(Json(updated))
}

/// `DELETE /users/:id`
///
/// # Errors
///
/// - 400 for the protected administrator
/// - 403 unless the caller is the account itself or an admin
/// - 404 for an unknown id
pub async fn delete_user<U: UserRepository + 'static>(
    State(state): State<AppState<U>>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.accounts.delete(&caller.actor(), &UserId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
