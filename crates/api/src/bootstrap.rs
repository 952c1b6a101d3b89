//! First-start provisioning of the administrator account.

use vistoria_core::error::CoreError;
use vistoria_core::roles::Role;
use vistoria_db::models::user::{CreateUser, Profile};
use vistoria_db::store::AccountStore;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create `admin` when no account exists yet.
///
/// Returns the new profile, or `None` when users already exist.
pub async fn ensure_admin(
    accounts: &dyn AccountStore,
    admin: &BootstrapAdmin,
) -> AppResult<Option<Profile>> {
    if accounts.count_users().await? > 0 {
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = accounts
        .create_user(CreateUser {
            email: admin.email.trim().to_lowercase(),
            password_hash,
            first_name: "Administrador".into(),
            last_name: String::new(),
            role: Role::Admin,
        })
        .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap administrator created");
    Ok(Some(Profile::from(&user)))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use vistoria_db::store::MemoryStore;

    use super::*;

    fn admin(password: &str) -> BootstrapAdmin {
        BootstrapAdmin {
            email: " Admin@Vistoria.dev ".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn creates_admin_only_once() {
        let store = MemoryStore::new();

        let created = ensure_admin(&store, &admin("admin-password-123")).await.unwrap();
        let profile = created.expect("first run creates the admin");
        assert_eq!(profile.email, "admin@vistoria.dev");
        assert_eq!(profile.role, Role::Admin);

        let again = ensure_admin(&store, &admin("admin-password-123")).await.unwrap();
        assert!(again.is_none());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let store = MemoryStore::new();
        let result = ensure_admin(&store, &admin("short")).await;
        assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
    }
}
