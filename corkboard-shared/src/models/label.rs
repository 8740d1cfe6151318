/// Label model and database operations
///
/// Labels are board-scoped and shared across the board's cards via the
/// `card_labels` join table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Label model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    /// Unique label ID
    pub id: Uuid,

    /// Board this label belongs to
    pub kanban_id: Uuid,

    /// Label name
    pub name: String,

    /// Display color (e.g., "#e53935" or a named palette key)
    pub color: String,

    /// When the label was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLabel {
    /// Label name
    pub name: String,

    /// Display color
    pub color: String,
}

/// Input for updating an existing label
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLabel {
    /// New name
    pub name: Option<String>,

    /// New color
    pub color: Option<String>,
}

impl Label {
    /// Creates a new label in a board
    pub async fn create(
        pool: &PgPool,
        kanban_id: Uuid,
        data: CreateLabel,
    ) -> Result<Self, sqlx::Error> {
        let label = sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (kanban_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, kanban_id, name, color, created_at
            "#,
        )
        .bind(kanban_id)
        .bind(data.name)
        .bind(data.color)
        .fetch_one(pool)
        .await?;

        Ok(label)
    }

    /// Finds a label by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let label = sqlx::query_as::<_, Label>(
            "SELECT id, kanban_id, name, color, created_at FROM labels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(label)
    }

    /// Lists labels of a board
    pub async fn list_by_kanban(pool: &PgPool, kanban_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let labels = sqlx::query_as::<_, Label>(
            r#"
            SELECT id, kanban_id, name, color, created_at
            FROM labels
            WHERE kanban_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(kanban_id)
        .fetch_all(pool)
        .await?;

        Ok(labels)
    }

    /// Lists labels attached to a card
    pub async fn list_by_card(pool: &PgPool, card_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let labels = sqlx::query_as::<_, Label>(
            r#"
            SELECT l.id, l.kanban_id, l.name, l.color, l.created_at
            FROM labels l
            JOIN card_labels cl ON cl.label_id = l.id
            WHERE cl.card_id = $1
            ORDER BY l.created_at ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(pool)
        .await?;

        Ok(labels)
    }

    /// Updates an existing label
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateLabel,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE labels SET id = id");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", color = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id, kanban_id, name, color, created_at");

        let mut q = sqlx::query_as::<_, Label>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(color) = data.color {
            q = q.bind(color);
        }

        let label = q.fetch_optional(pool).await?;

        Ok(label)
    }

    /// Deletes a label by ID
    ///
    /// Cascades to its card links.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
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
    fn test_create_label_struct() {
        let data = CreateLabel {
            name: "bug".to_string(),
            color: "#e53935".to_string(),
        };

        assert_eq!(data.name, "bug");
        assert_eq!(data.color, "#e53935");
    }
}
