/// Kanban (board) model and database operations
///
/// A kanban is a named board owned by one user and shared with a membership
/// set. Deleting a kanban cascades to its columns, cards and their children,
/// labels, members, and invitations.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE kanbans (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::models::kanban::{Kanban, CreateKanban};
/// use corkboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let kanban = Kanban::create(&pool, CreateKanban {
///     name: "Sprint 1".to_string(),
///     description: None,
///     owner_id: Uuid::new_v4(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Kanban model representing a board
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Kanban {
    /// Unique kanban ID
    pub id: Uuid,

    /// Board name
    pub name: String,

    /// Optional board description
    pub description: Option<String>,

    /// User who owns the board
    pub owner_id: Uuid,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new kanban
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKanban {
    /// Board name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user
    pub owner_id: Uuid,
}

/// Input for updating an existing kanban
///
/// Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateKanban {
    /// New board name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,
}

impl Kanban {
    /// Creates a new kanban and adds the owner to its membership set
    ///
    /// # Errors
    ///
    /// Returns an error if the owner doesn't exist or the database fails
    pub async fn create(pool: &PgPool, data: CreateKanban) -> Result<Self, sqlx::Error> {
        let kanban = sqlx::query_as::<_, Kanban>(
            r#"
            INSERT INTO kanbans (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        // The owner is always part of the membership set
        sqlx::query(
            r#"
            INSERT INTO kanban_members (kanban_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(kanban.id)
        .bind(kanban.owner_id)
        .execute(pool)
        .await?;

        Ok(kanban)
    }

    /// Finds a kanban by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let kanban = sqlx::query_as::<_, Kanban>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM kanbans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(kanban)
    }

    /// Lists all kanbans a user can see (owned or member of)
    ///
    /// Ordered by creation date (oldest first).
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let kanbans = sqlx::query_as::<_, Kanban>(
            r#"
            SELECT k.id, k.name, k.description, k.owner_id, k.created_at, k.updated_at
            FROM kanbans k
            JOIN kanban_members m ON m.kanban_id = k.id
            WHERE m.user_id = $1
            ORDER BY k.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(kanbans)
    }

    /// Updates an existing kanban
    ///
    /// # Returns
    ///
    /// The updated kanban if found, None if it doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateKanban,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE kanbans SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, description, owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Kanban>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description_opt) = data.description {
            q = q.bind(description_opt);
        }

        let kanban = q.fetch_optional(pool).await?;

        Ok(kanban)
    }

    /// Deletes a kanban by ID
    ///
    /// Cascades to columns, cards, labels, checklist items, comments,
    /// attachments, memberships, and invitations.
    ///
    /// # Returns
    ///
    /// True if the kanban was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM kanbans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_kanban_struct() {
        let data = CreateKanban {
            name: "Sprint 1".to_string(),
            description: Some("First sprint".to_string()),
            owner_id: Uuid::new_v4(),
        };

        assert_eq!(data.name, "Sprint 1");
        assert!(data.description.is_some());
    }

    #[test]
    fn test_update_kanban_default() {
        let update = UpdateKanban::default();
        assert!(update.name.is_none());
        assert!(update.description.is_none());
    }
}
