use school_core::error::AppError;
use secrecy::ExposeSecret;

use super::repository::Filter;
use super::store::Store;
use crate::config::SeedConfig;
use crate::models::{Role, User};
use crate::utils::{hash_password, Password};

/// Create the first admin when the store has none. Returns whether one was created.
pub async fn ensure_admin(store: &Store, seed: &SeedConfig) -> Result<bool, AppError> {
    let admins = store.users.count(Filter::all().eq("role", Role::Admin)).await?;
    if admins > 0 {
        return Ok(false);
    }

    let password = Password::new(seed.admin_password.expose_secret().clone());
    let hash = hash_password(&password)?;
    let admin = User::new("Administrator".to_string(), &seed.admin_email, hash, Role::Admin);
    store.users.insert(&admin).await?;

    tracing::info!(user_id = %admin.id, email = %admin.email, "Seeded admin user");
    Ok(true)
}
