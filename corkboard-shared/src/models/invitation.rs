/// Invitation model and database operations
///
/// An invitation binds an email address to a board through a single-use,
/// unguessable token. Tokens transition exactly once from unused to used;
/// there is no further lifecycle. Issuance is idempotent per (email, kanban)
/// while an unused invitation exists, enforced by a partial unique index.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE invitations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     kanban_id UUID NOT NULL REFERENCES kanbans(id) ON DELETE CASCADE,
///     email CITEXT NOT NULL,
///     token VARCHAR(64) NOT NULL UNIQUE,
///     role user_role NOT NULL DEFAULT 'collaborator',
///     used BOOLEAN NOT NULL DEFAULT FALSE,
///     used_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::models::invitation::Invitation;
/// use corkboard_shared::models::user::UserRole;
/// use corkboard_shared::auth::invite_token::generate_invite_token;
/// use corkboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(kanban_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // Idempotent issue: reuse the live invitation if one exists
/// let invitation = match Invitation::find_unused(&pool, kanban_id, "new@example.com").await? {
///     Some(existing) => existing,
///     None => {
///         Invitation::create(
///             &pool,
///             kanban_id,
///             "new@example.com",
///             &generate_invite_token(),
///             UserRole::Collaborator,
///         )
///         .await?
///     }
/// };
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserRole;

/// Invitation model representing a single-use board invite
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: Uuid,

    /// Board the invite grants membership to
    pub kanban_id: Uuid,

    /// Invited email address (case-insensitive via CITEXT)
    pub email: String,

    /// Opaque single-use token
    pub token: String,

    /// Role granted to a user account created during acceptance
    pub role: UserRole,

    /// Whether the invitation has been accepted
    pub used: bool,

    /// When the invitation was accepted (None while unused)
    pub used_at: Option<DateTime<Utc>>,

    /// When the invitation was issued
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Creates a new invitation
    ///
    /// # Errors
    ///
    /// Returns an error if an unused invitation for the same (email, kanban)
    /// already exists (partial unique index) or the token collides.
    pub async fn create(
        pool: &PgPool,
        kanban_id: Uuid,
        email: &str,
        token: &str,
        role: UserRole,
    ) -> Result<Self, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (kanban_id, email, token, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, kanban_id, email, token, role, used, used_at, created_at
            "#,
        )
        .bind(kanban_id)
        .bind(email)
        .bind(token)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(invitation)
    }

    /// Finds the live (unused) invitation for an (email, kanban) pair
    ///
    /// At most one exists at a time.
    pub async fn find_unused(
        pool: &PgPool,
        kanban_id: Uuid,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, kanban_id, email, token, role, used, used_at, created_at
            FROM invitations
            WHERE kanban_id = $1 AND email = $2 AND NOT used
            "#,
        )
        .bind(kanban_id)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Finds an invitation by its token
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, kanban_id, email, token, role, used, used_at, created_at
            FROM invitations
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Marks an invitation used and stamps used_at
    ///
    /// The `NOT used` guard makes the transition one-way even under
    /// concurrent acceptance attempts.
    ///
    /// # Returns
    ///
    /// The updated invitation, or None if it was already used or absent
    pub async fn mark_used(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            UPDATE invitations
            SET used = TRUE, used_at = NOW()
            WHERE id = $1 AND NOT used
            RETURNING id, kanban_id, email, token, role, used, used_at, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Lists invitations issued for a board (newest first)
    pub async fn list_by_kanban(pool: &PgPool, kanban_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let invitations = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, kanban_id, email, token, role, used, used_at, created_at
            FROM invitations
            WHERE kanban_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(kanban_id)
        .fetch_all(pool)
        .await?;

        Ok(invitations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_struct() {
        let invitation = Invitation {
            id: Uuid::new_v4(),
            kanban_id: Uuid::new_v4(),
            email: "new@example.com".to_string(),
            token: "cb_0123456789abcdefghijklmnopqrstuv".to_string(),
            role: UserRole::Collaborator,
            used: false,
            used_at: None,
            created_at: Utc::now(),
        };

        assert!(!invitation.used);
        assert!(invitation.used_at.is_none());
    }

    // Integration tests for the used/unused transition are in tests/ at the api crate
}
