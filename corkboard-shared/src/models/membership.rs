/// Board membership model and database operations
///
/// This module provides the membership set: a many-to-many relationship
/// between users and kanbans. The owner of a board is always a member;
/// additional members join via direct attachment or invitation acceptance.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE kanban_members (
///     kanban_id UUID NOT NULL REFERENCES kanbans(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (kanban_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::models::membership::Membership;
/// use corkboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let kanban_id = Uuid::new_v4();
/// let user_id = Uuid::new_v4();
///
/// let membership = Membership::create(&pool, kanban_id, user_id).await?;
/// let has_access = Membership::has_access(&pool, kanban_id, user_id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Membership model representing a user-kanban relationship
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Kanban ID
    pub kanban_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a new membership (adds user to a board)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Membership already exists (unique constraint violation)
    /// - Kanban or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, kanban_id: Uuid, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO kanban_members (kanban_id, user_id)
            VALUES ($1, $2)
            RETURNING kanban_id, user_id, created_at
            "#,
        )
        .bind(kanban_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Checks if a user is a member of a board
    pub async fn has_access(
        pool: &PgPool,
        kanban_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM kanban_members
                WHERE kanban_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(kanban_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Deletes a membership (removes user from a board)
    ///
    /// # Returns
    ///
    /// True if membership was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, kanban_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM kanban_members WHERE kanban_id = $1 AND user_id = $2")
            .bind(kanban_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all members of a board
    pub async fn list_by_kanban(pool: &PgPool, kanban_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT kanban_id, user_id, created_at
            FROM kanban_members
            WHERE kanban_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(kanban_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Counts members of a board
    pub async fn count_by_kanban(pool: &PgPool, kanban_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM kanban_members WHERE kanban_id = $1")
                .bind(kanban_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_struct() {
        let membership = Membership {
            kanban_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let cloned = membership.clone();
        assert_eq!(membership.kanban_id, cloned.kanban_id);
        assert_eq!(membership.user_id, cloned.user_id);
    }

    // Integration tests for database operations are in tests/ at the api crate
}
