/// Checklist item model and database operations
///
/// Checklist items belong to exactly one card. The board snapshot computes
/// a per-card completion percentage from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Checklist item model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChecklistItem {
    /// Unique item ID
    pub id: Uuid,

    /// Card this item belongs to
    pub card_id: Uuid,

    /// Item text
    pub text: String,

    /// Whether the item is checked off
    pub done: bool,

    /// When the item was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new checklist item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChecklistItem {
    /// Item text
    pub text: String,
}

/// Input for updating an existing checklist item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChecklistItem {
    /// New text
    pub text: Option<String>,

    /// New done state
    pub done: Option<bool>,
}

impl ChecklistItem {
    /// Creates a new checklist item on a card
    pub async fn create(
        pool: &PgPool,
        card_id: Uuid,
        data: CreateChecklistItem,
    ) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, ChecklistItem>(
            r#"
            INSERT INTO checklist_items (card_id, text)
            VALUES ($1, $2)
            RETURNING id, card_id, text, done, created_at
            "#,
        )
        .bind(card_id)
        .bind(data.text)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Finds a checklist item by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, ChecklistItem>(
            "SELECT id, card_id, text, done, created_at FROM checklist_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Lists checklist items of a card in creation order
    pub async fn list_by_card(pool: &PgPool, card_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT id, card_id, text, done, created_at
            FROM checklist_items
            WHERE card_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Updates an existing checklist item
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateChecklistItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE checklist_items SET id = id");
        let mut bind_count = 1;

        if data.text.is_some() {
            bind_count += 1;
            query.push_str(&format!(", text = ${}", bind_count));
        }
        if data.done.is_some() {
            bind_count += 1;
            query.push_str(&format!(", done = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id, card_id, text, done, created_at");

        let mut q = sqlx::query_as::<_, ChecklistItem>(&query).bind(id);

        if let Some(text) = data.text {
            q = q.bind(text);
        }
        if let Some(done) = data.done {
            q = q.bind(done);
        }

        let item = q.fetch_optional(pool).await?;

        Ok(item)
    }

    /// Deletes a checklist item by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM checklist_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves the card a checklist item belongs to
    pub async fn card_id_of(pool: &PgPool, item_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let card_id: Option<Uuid> =
            sqlx::query_scalar("SELECT card_id FROM checklist_items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(pool)
                .await?;

        Ok(card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_checklist_item_default() {
        let update = UpdateChecklistItem::default();
        assert!(update.text.is_none());
        assert!(update.done.is_none());
    }
}
