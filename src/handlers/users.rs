use axum::{extract::Path, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::auth::permissions::Operation;
use crate::database::manager::DatabaseManager;
use crate::database::models::user::{Role, User};
use crate::database::users::{self, NewUser, UserChanges};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// User record as returned to clients; never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// POST /users - create a user account (admin or HR).
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    auth.require(Operation::UserCreate)?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::validation_error("Name is required"));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ApiError::validation_error("A valid email is required"));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::validation_error(
            "Password must be at least 6 characters",
        ));
    }

    // Privileged roles can only be handed out by an admin
    if matches!(payload.role, Role::Admin | Role::Hr | Role::Executive) && auth.role != Role::Admin
    {
        return Err(ApiError::forbidden(
            "Only admin can create admin, hr, or executive users",
        ));
    }

    let pool = DatabaseManager::pool().await?;

    if users::find_by_email(pool, &payload.email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash_password(&payload.password)?;
    // The unique index on email backstops a concurrent duplicate create;
    // the violation surfaces as a 409 through the sqlx error mapping.
    let user = users::insert(
        pool,
        NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
            role: payload.role,
            phone: payload.phone,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "user created");

    Ok(Json(user.into()))
}

/// GET /users - list all users (admin only).
pub async fn list(
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    auth.require(Operation::UserList)?;

    let pool = DatabaseManager::pool().await?;
    let users = users::list(pool).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /users/:id - partial update (admin only).
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    auth.require(Operation::UserUpdate)?;

    let pool = DatabaseManager::pool().await?;

    let user = users::update(
        pool,
        id,
        UserChanges {
            name: payload.name,
            phone: payload.phone,
            role: payload.role,
            is_active: payload.is_active,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

/// DELETE /users/:id - remove a user (admin only, never yourself).
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Operation::UserDelete)?;

    if id == auth.id {
        return Err(ApiError::bad_request("Cannot delete yourself"));
    }

    let pool = DatabaseManager::pool().await?;

    if !users::delete(pool, id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %id, deleted_by = %auth.id, "user deleted");

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
