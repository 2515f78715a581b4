//! # Account Handlers
//!
//! Registration of clients and psychologists, login, and the caller's own
//! profile.

use axum::{extract::State, http::StatusCode, Json};
use konsul_core::{
    errors::{KonsulError, StorageError},
    models::{
        user::{normalize_email, LoginRequest, LoginResponse, RegisterRequest, UserResponse},
        NewUser, Role, User,
    },
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    extractors::ValidatedJson,
    middleware::{
        auth::{self, Admin, AuthUser},
        error_handling::AppError,
    },
    ApiState,
};

/// Verified against when the email is unknown, so both login failures cost
/// one Argon2 verification.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$7ZkLp6Hjq8o0y1m6cWb9Q2x8m0n3LhJ2o6p7Vt9cW0s";

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = create_account(&state, payload, Role::Klien).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Admin only. The role is checked before the payload is validated.
#[axum::debug_handler]
pub async fn register_psychologist(
    State(state): State<Arc<ApiState>>,
    Admin(caller): Admin,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = create_account(&state, payload, Role::Psikolog).await?;
    info!(admin_id = %caller.id, user_id = %user.id, "Registered psychologist");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = normalize_email(&payload.email);
    let user = state.users.get_by_email(email).await?;

    let password_hash = user
        .as_ref()
        .map_or(DUMMY_HASH, |user| user.password_hash.as_str());
    let password_valid = match auth::verify_password(&payload.password, password_hash) {
        Ok(valid) => valid,
        Err(err) => {
            error!(
                error = %err,
                user_id = ?user.as_ref().map(|u| u.id),
                "Stored password hash is unusable"
            );
            false
        }
    };

    let user = match user {
        Some(user) if password_valid => user,
        _ => {
            warn!("Rejected login attempt");
            return Err(AppError(KonsulError::Authentication(
                "invalid credentials".to_string(),
            )));
        }
    };

    let token = state.tokens.issue(user.id, user.role)?;
    info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[axum::debug_handler]
pub async fn profile(
    State(state): State<Arc<ApiState>>,
    caller: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .get_by_id(caller.id)
        .await?
        .ok_or_else(|| KonsulError::NotFound(format!("user with ID {} not found", caller.id)))?;

    Ok(Json(user.into()))
}

async fn create_account(
    state: &ApiState,
    payload: RegisterRequest,
    role: Role,
) -> Result<User, AppError> {
    let email = normalize_email(&payload.email);
    if state.users.get_by_email(email.clone()).await?.is_some() {
        return Err(email_taken());
    }

    let new_user = NewUser {
        username: payload.username.trim().to_string(),
        email,
        password_hash: auth::hash_password(&payload.password)?,
        role,
    };

    // The pre-check races with concurrent registrations; the unique
    // constraints have the final word.
    match state.users.create(new_user).await {
        Ok(user) => {
            info!(user_id = %user.id, %role, "Created user");
            Ok(user)
        }
        Err(StorageError::DuplicateKey { constraint }) => {
            warn!(?constraint, "Registration hit a unique constraint");
            match constraint.as_deref() {
                Some(name) if name.contains("username") => Err(AppError(KonsulError::Conflict(
                    "username already exists".to_string(),
                ))),
                _ => Err(email_taken()),
            }
        }
        Err(err) => Err(err.into()),
    }
}

fn email_taken() -> AppError {
    AppError(KonsulError::Conflict("email already exists".to_string()))
}
