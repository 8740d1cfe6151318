/// Column model and database operations
///
/// Columns are the ordered lists within a board. The `position` key orders
/// columns within their kanban; it is strictly increasing but not required
/// to be contiguous after deletions.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     kanban_id UUID NOT NULL REFERENCES kanbans(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     position INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Column model representing an ordered list of cards within a board
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    /// Unique column ID
    pub id: Uuid,

    /// Board this column belongs to
    pub kanban_id: Uuid,

    /// Column title
    pub title: String,

    /// Ordering key within the kanban (strictly increasing)
    pub position: i32,

    /// When the column was created
    pub created_at: DateTime<Utc>,

    /// When the column was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new column
///
/// When `position` is None the column is appended after the board's last
/// column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateColumn {
    /// Column title
    pub title: String,

    /// Explicit position (appended at the end when absent)
    pub position: Option<i32>,
}

/// Input for updating an existing column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateColumn {
    /// New title
    pub title: Option<String>,

    /// New position
    pub position: Option<i32>,
}

impl Column {
    /// Creates a new column in a board
    ///
    /// Without an explicit position the column lands after the current last
    /// column of the kanban.
    pub async fn create(
        pool: &PgPool,
        kanban_id: Uuid,
        data: CreateColumn,
    ) -> Result<Self, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (kanban_id, title, position)
            VALUES (
                $1,
                $2,
                COALESCE($3, (SELECT COALESCE(MAX(position) + 1, 0) FROM columns WHERE kanban_id = $1))
            )
            RETURNING id, kanban_id, title, position, created_at, updated_at
            "#,
        )
        .bind(kanban_id)
        .bind(data.title)
        .bind(data.position)
        .fetch_one(pool)
        .await?;

        Ok(column)
    }

    /// Finds a column by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, kanban_id, title, position, created_at, updated_at
            FROM columns
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(column)
    }

    /// Lists columns of a board in display order
    pub async fn list_by_kanban(pool: &PgPool, kanban_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, kanban_id, title, position, created_at, updated_at
            FROM columns
            WHERE kanban_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(kanban_id)
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Updates an existing column
    ///
    /// # Returns
    ///
    /// The updated column if found, None if it doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateColumn,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE columns SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.position.is_some() {
            bind_count += 1;
            query.push_str(&format!(", position = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, kanban_id, title, position, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Column>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(position) = data.position {
            q = q.bind(position);
        }

        let column = q.fetch_optional(pool).await?;

        Ok(column)
    }

    /// Deletes a column by ID
    ///
    /// Cascades to the column's cards and their children.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves the kanban a column belongs to
    ///
    /// Used by handlers to scope authorization checks.
    pub async fn kanban_id_of(pool: &PgPool, column_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let kanban_id: Option<Uuid> =
            sqlx::query_scalar("SELECT kanban_id FROM columns WHERE id = $1")
                .bind(column_id)
                .fetch_optional(pool)
                .await?;

        Ok(kanban_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_column_struct() {
        let data = CreateColumn {
            title: "Todo".to_string(),
            position: None,
        };

        assert_eq!(data.title, "Todo");
        assert!(data.position.is_none());
    }

    #[test]
    fn test_update_column_default() {
        let update = UpdateColumn::default();
        assert!(update.title.is_none());
        assert!(update.position.is_none());
    }
}
