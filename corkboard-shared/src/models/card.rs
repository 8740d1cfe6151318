/// Card model and database operations
///
/// Cards are the units of work inside a column. Each card belongs to exactly
/// one column at a time; the `position` key orders it within that column.
/// Moving a card between columns is done through a placement batch (see
/// [`Card::apply_placements`]), never by editing `position` rows one at a
/// time from the client.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     column_id UUID NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     position INTEGER NOT NULL DEFAULT 0,
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::models::card::{Card, CreateCard};
/// use corkboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(column_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let card = Card::create(&pool, column_id, CreateCard {
///     title: "Write release notes".to_string(),
///     description: None,
///     position: None,
///     due_date: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::reorder::CardPlacement;

/// Card model representing a unit of work within a column
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    /// Unique card ID
    pub id: Uuid,

    /// Column this card currently belongs to
    pub column_id: Uuid,

    /// Card title
    pub title: String,

    /// Optional long-form description
    pub description: Option<String>,

    /// Ordering key within the column
    pub position: i32,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// When the card was created
    pub created_at: DateTime<Utc>,

    /// When the card was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new card
///
/// When `position` is None the card is appended after the column's last card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCard {
    /// Card title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Explicit position (appended at the end when absent)
    pub position: Option<i32>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for updating an existing card
///
/// Only non-None fields will be updated. Column moves go through
/// [`Card::apply_placements`], not through this payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCard {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New due date (use Some(None) to clear)
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl Card {
    /// Creates a new card in a column
    ///
    /// Without an explicit position the card lands after the current last
    /// card of the column.
    pub async fn create(
        pool: &PgPool,
        column_id: Uuid,
        data: CreateCard,
    ) -> Result<Self, sqlx::Error> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            INSERT INTO cards (column_id, title, description, position, due_date)
            VALUES (
                $1,
                $2,
                $3,
                COALESCE($4, (SELECT COALESCE(MAX(position) + 1, 0) FROM cards WHERE column_id = $1)),
                $5
            )
            RETURNING id, column_id, title, description, position, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(column_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.position)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(card)
    }

    /// Finds a card by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, column_id, title, description, position, due_date,
                   created_at, updated_at
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(card)
    }

    /// Lists cards of a column in display order
    pub async fn list_by_column(pool: &PgPool, column_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let cards = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, column_id, title, description, position, due_date,
                   created_at, updated_at
            FROM cards
            WHERE column_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(column_id)
        .fetch_all(pool)
        .await?;

        Ok(cards)
    }

    /// Lists all cards of a board in (column, position) order
    ///
    /// Used to assemble the nested board snapshot in one query.
    pub async fn list_by_kanban(pool: &PgPool, kanban_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let cards = sqlx::query_as::<_, Card>(
            r#"
            SELECT c.id, c.column_id, c.title, c.description, c.position, c.due_date,
                   c.created_at, c.updated_at
            FROM cards c
            JOIN columns col ON col.id = c.column_id
            WHERE col.kanban_id = $1
            ORDER BY col.position ASC, c.position ASC, c.created_at ASC
            "#,
        )
        .bind(kanban_id)
        .fetch_all(pool)
        .await?;

        Ok(cards)
    }

    /// Updates an existing card
    ///
    /// # Returns
    ///
    /// The updated card if found, None if it doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCard,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE cards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, column_id, title, description, position, due_date, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Card>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description_opt) = data.description {
            q = q.bind(description_opt);
        }
        if let Some(due_date_opt) = data.due_date {
            q = q.bind(due_date_opt);
        }

        let card = q.fetch_optional(pool).await?;

        Ok(card)
    }

    /// Deletes a card by ID
    ///
    /// Cascades to the card's checklist items, comments, attachments, and
    /// label/assignee links.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Applies a reorder batch in a single transaction
    ///
    /// Every (card, column, position) triple is written together; a failure
    /// rolls the whole batch back and leaves the previous ordering intact.
    ///
    /// # Returns
    ///
    /// The number of cards updated
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced column doesn't exist or the
    /// database fails mid-batch (nothing is applied in that case)
    pub async fn apply_placements(
        pool: &PgPool,
        placements: &[CardPlacement],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0u64;

        for placement in placements {
            let result = sqlx::query(
                r#"
                UPDATE cards
                SET column_id = $2, position = $3, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(placement.card_id)
            .bind(placement.column_id)
            .bind(placement.position)
            .execute(&mut *tx)
            .await?;

            updated += result.rows_affected();
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Resolves the kanban a card belongs to (through its column)
    ///
    /// Used by handlers to scope authorization checks.
    pub async fn kanban_id_of(pool: &PgPool, card_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let kanban_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT col.kanban_id
            FROM cards c
            JOIN columns col ON col.id = c.column_id
            WHERE c.id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(pool)
        .await?;

        Ok(kanban_id)
    }

    /// Adds a label to a card
    ///
    /// Idempotent: re-adding an attached label is a no-op.
    pub async fn add_label(pool: &PgPool, card_id: Uuid, label_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO card_labels (card_id, label_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(card_id)
        .bind(label_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Removes a label from a card
    pub async fn remove_label(
        pool: &PgPool,
        card_id: Uuid,
        label_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM card_labels WHERE card_id = $1 AND label_id = $2")
            .bind(card_id)
            .bind(label_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Assigns a user to a card
    ///
    /// Idempotent: re-assigning is a no-op.
    pub async fn add_assignee(
        pool: &PgPool,
        card_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO card_assignees (card_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(card_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Unassigns a user from a card
    pub async fn remove_assignee(
        pool: &PgPool,
        card_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM card_assignees WHERE card_id = $1 AND user_id = $2")
            .bind(card_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_card_struct() {
        let data = CreateCard {
            title: "A".to_string(),
            description: None,
            position: Some(0),
            due_date: None,
        };

        assert_eq!(data.title, "A");
        assert_eq!(data.position, Some(0));
    }

    #[test]
    fn test_update_card_default() {
        let update = UpdateCard::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.due_date.is_none());
    }
}
