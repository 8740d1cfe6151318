/// Startup provisioning
///
/// When `ADMIN_EMAIL` and `ADMIN_PASSWORD` are configured and no account
/// exists for that email, an ADMIN account is created at startup. Secrets
/// come exclusively from the environment; there is no built-in fallback
/// account.

use corkboard_shared::{
    auth::password,
    models::user::{CreateUser, User, UserRole},
};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminBootstrap;

/// Provisions the initial admin account if configured and absent
///
/// Idempotent: an existing account with the configured email is left
/// untouched (including its role and password).
///
/// # Errors
///
/// Returns an error if hashing or the insert fails
pub async fn ensure_admin_account(
    pool: &PgPool,
    bootstrap: Option<&AdminBootstrap>,
) -> anyhow::Result<()> {
    let Some(bootstrap) = bootstrap else {
        info!("No admin bootstrap configured, skipping");
        return Ok(());
    };

    if User::find_by_email(pool, &bootstrap.email).await?.is_some() {
        info!("Admin bootstrap account already exists, skipping");
        return Ok(());
    }

    if let Err(reason) = password::validate_password_strength(&bootstrap.password) {
        warn!("ADMIN_PASSWORD is weak: {}", reason);
    }

    let password_hash = password::hash_password(&bootstrap.password)?;

    let user = User::create(
        pool,
        CreateUser {
            email: bootstrap.email.clone(),
            password_hash,
            name: Some("Administrator".to_string()),
            role: UserRole::Admin,
            avatar_url: None,
        },
    )
    .await?;

    info!(user_id = %user.id, "Provisioned initial admin account");

    Ok(())
}
