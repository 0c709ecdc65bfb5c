use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::users;
use crate::error::ApiError;
use crate::handlers::users::UserResponse;
use crate::middleware::auth::AuthUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// POST /login - verify credentials and issue a signed, time-limited token.
///
/// Unknown email, wrong password and deactivated accounts all produce the
/// identical 401 so the response reveals nothing about which check failed.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let rejected = || ApiError::unauthorized("Incorrect email or password");

    let user = users::find_by_email(pool, &payload.email)
        .await?
        .ok_or_else(rejected)?;

    if !user.is_active || !verify_password(&payload.password, &user.password_hash)? {
        return Err(rejected());
    }

    users::touch_last_login(pool, user.id).await?;

    let claims = Claims::new(user.id, user.email.clone(), user.role);
    let token = generate_jwt(&claims)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "bearer",
        expires_in: config::config().security.jwt_expiry_minutes * 60,
        user: user.into(),
    }))
}

/// GET /me - the authenticated user's own record.
pub async fn me(Extension(auth): Extension<AuthUser>) -> Result<Json<UserResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let user = users::find_by_id(pool, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user.into()))
}
