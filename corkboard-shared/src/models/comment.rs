/// Comment model and database operations
///
/// Comments belong to exactly one card and carry an author. The author
/// reference survives user deletion as NULL (the comment itself stays).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Card this comment belongs to
    pub card_id: Uuid,

    /// Authoring user (None if the account was deleted)
    pub author_id: Option<Uuid>,

    /// Comment body
    pub content: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last edited
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// Comment body
    pub content: String,
}

impl Comment {
    /// Creates a new comment on a card
    pub async fn create(
        pool: &PgPool,
        card_id: Uuid,
        author_id: Uuid,
        data: CreateComment,
    ) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (card_id, author_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, card_id, author_id, content, created_at, updated_at
            "#,
        )
        .bind(card_id)
        .bind(author_id)
        .bind(data.content)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, card_id, author_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Lists comments of a card in creation order
    pub async fn list_by_card(pool: &PgPool, card_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, card_id, author_id, content, created_at, updated_at
            FROM comments
            WHERE card_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Updates a comment's body
    pub async fn update_content(
        pool: &PgPool,
        id: Uuid,
        content: String,
    ) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, card_id, author_id, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Deletes a comment by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
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
    fn test_create_comment_struct() {
        let data = CreateComment {
            content: "Looks good".to_string(),
        };

        assert_eq!(data.content, "Looks good");
    }
}
