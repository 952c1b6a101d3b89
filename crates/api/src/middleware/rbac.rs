//! Role requirements layered on top of [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vistoria_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A signed-in user whose stored role is admin. Other roles get 403.
pub struct RequireAdmin(pub AuthUser);

/// Any signed-in user.
pub struct RequireAuth(pub AuthUser);

async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    admin_only: bool,
) -> Result<AuthUser, AppError> {
    let mut user = AuthUser::from_request_parts(parts, state).await?;
    if !admin_only {
        return Ok(user);
    }

    // The token's role may be stale; admin checks use the stored one.
    let account = state.accounts.find_user(user.user_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
    })?;
    user.role = account.role();

    if !user.role.is_admin() {
        tracing::warn!(
            user_id = user.user_id,
            path = %parts.uri.path(),
            "Non-admin attempted an admin action"
        );
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )));
    }
    Ok(user)
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, true).await.map(RequireAdmin)
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, false).await.map(RequireAuth)
    }
}
