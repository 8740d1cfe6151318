/// Attachment model and database operations
///
/// The database stores attachment metadata only; the backing file lives on
/// the filesystem under the configured upload directory and is addressed by
/// `url`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Attachment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attachment {
    /// Unique attachment ID
    pub id: Uuid,

    /// Card this attachment belongs to
    pub card_id: Uuid,

    /// Original filename as uploaded
    pub filename: String,

    /// URL the stored file is served from
    pub url: String,

    /// When the attachment was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new attachment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttachment {
    /// Original filename
    pub filename: String,

    /// URL of the stored file
    pub url: String,
}

impl Attachment {
    /// Creates a new attachment record for a card
    pub async fn create(
        pool: &PgPool,
        card_id: Uuid,
        data: CreateAttachment,
    ) -> Result<Self, sqlx::Error> {
        let attachment = sqlx::query_as::<_, Attachment>(
            r#"
            INSERT INTO attachments (card_id, filename, url)
            VALUES ($1, $2, $3)
            RETURNING id, card_id, filename, url, created_at
            "#,
        )
        .bind(card_id)
        .bind(data.filename)
        .bind(data.url)
        .fetch_one(pool)
        .await?;

        Ok(attachment)
    }

    /// Finds an attachment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let attachment = sqlx::query_as::<_, Attachment>(
            "SELECT id, card_id, filename, url, created_at FROM attachments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(attachment)
    }

    /// Lists attachments of a card in creation order
    pub async fn list_by_card(pool: &PgPool, card_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let attachments = sqlx::query_as::<_, Attachment>(
            r#"
            SELECT id, card_id, filename, url, created_at
            FROM attachments
            WHERE card_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(pool)
        .await?;

        Ok(attachments)
    }

    /// Deletes an attachment record by ID
    ///
    /// The backing file is the caller's responsibility.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
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
    fn test_create_attachment_struct() {
        let data = CreateAttachment {
            filename: "spec.pdf".to_string(),
            url: "/uploads/ab12/spec.pdf".to_string(),
        };

        assert_eq!(data.filename, "spec.pdf");
        assert!(data.url.starts_with("/uploads/"));
    }
}
