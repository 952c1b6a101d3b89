//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use vistoria_core::error::CoreError;
use vistoria_core::roles::Role;
use vistoria_core::types::DbId;
use vistoria_db::models::user::{CreateUser, Profile};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::normalize_email;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid e-mail address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub last_name: String,
    /// `admin` or `user`; defaults to `user`.
    pub role: Option<String>,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let profiles = state.accounts.list_profiles().await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// POST /api/v1/admin/users
///
/// Create a user. Returns 201 with the new profile, or 409 when the e-mail
/// is taken.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Profile>>)> {
    input.validate()?;
    let role = match input.role.as_deref() {
        None => Role::User,
        Some(name) => Role::parse(name.trim())?,
    };
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .accounts
        .create_user(CreateUser {
            email: normalize_email(&input.email),
            password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            role,
        })
        .await?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = user.id,
        role = role.as_str(),
        "User created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: Profile::from(&user),
        }),
    ))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Change another user's role. Changing one's own role is a conflict.
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let role = Role::parse(input.role.trim())?;
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Administrators cannot change their own role".into(),
        )));
    }

    let profile = state.accounts.update_role(id, role).await?;
    tracing::info!(admin_id = admin.user_id, user_id = id, role = role.as_str(), "Role updated");
    Ok(Json(DataResponse { data: profile }))
}
