/// Nested board snapshot assembly
///
/// A board snapshot is the canonical, fully-nested view of one kanban:
/// columns in display order, each column's cards in display order, and each
/// card's labels, assignees, checklist (with completion percentage),
/// comments, and attachments. Clients reconcile their local state against
/// this after mutations; it is the single payload a board view needs.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{
    attachment::Attachment,
    card::Card,
    checklist_item::ChecklistItem,
    column::Column,
    comment::Comment,
    kanban::Kanban,
    label::Label,
    membership::Membership,
};

/// One card with all of its nested entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    /// The card record
    #[serde(flatten)]
    pub card: Card,

    /// Labels attached to the card
    pub labels: Vec<Label>,

    /// Users assigned to the card
    pub assignees: Vec<Uuid>,

    /// Checklist items in creation order
    pub checklist: Vec<ChecklistItem>,

    /// Share of checked-off checklist items, 0-100 (0 for an empty checklist)
    pub checklist_percent: u8,

    /// Comments in creation order
    pub comments: Vec<Comment>,

    /// Attachment metadata in creation order
    pub attachments: Vec<Attachment>,
}

/// One column with its ordered cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnView {
    /// The column record
    #[serde(flatten)]
    pub column: Column,

    /// Cards in display order
    pub cards: Vec<CardView>,
}

/// The fully-nested board snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// The board record
    #[serde(flatten)]
    pub kanban: Kanban,

    /// Member user ids (owner included)
    pub members: Vec<Uuid>,

    /// Columns in display order
    pub columns: Vec<ColumnView>,
}

/// Computes the checklist completion percentage
///
/// Rounded to the nearest whole percent; an empty checklist is 0.
///
/// # Example
///
/// ```
/// use corkboard_shared::board::checklist_percentage;
///
/// assert_eq!(checklist_percentage(0, 0), 0);
/// assert_eq!(checklist_percentage(1, 2), 50);
/// assert_eq!(checklist_percentage(2, 3), 67);
/// assert_eq!(checklist_percentage(3, 3), 100);
/// ```
pub fn checklist_percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }

    ((done as f64 / total as f64) * 100.0).round() as u8
}

impl BoardSnapshot {
    /// Loads the full snapshot for a board
    ///
    /// Child rows are fetched board-wide (one query per entity kind) and
    /// stitched in memory, rather than one round-trip per card.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails; an absent kanban is the
    /// caller's not-found case before calling this.
    pub async fn load(pool: &PgPool, kanban: Kanban) -> Result<Self, sqlx::Error> {
        let members = Membership::list_by_kanban(pool, kanban.id).await?;
        let columns = Column::list_by_kanban(pool, kanban.id).await?;
        let cards = Card::list_by_kanban(pool, kanban.id).await?;

        let mut labels_by_card = card_labels_for_kanban(pool, kanban.id).await?;
        let mut assignees_by_card = assignees_for_kanban(pool, kanban.id).await?;
        let mut checklist_by_card = checklist_for_kanban(pool, kanban.id).await?;
        let mut comments_by_card = comments_for_kanban(pool, kanban.id).await?;
        let mut attachments_by_card = attachments_for_kanban(pool, kanban.id).await?;

        let mut cards_by_column: HashMap<Uuid, Vec<CardView>> = HashMap::new();
        for card in cards {
            let checklist = checklist_by_card.remove(&card.id).unwrap_or_default();
            let done = checklist.iter().filter(|item| item.done).count();
            let checklist_percent = checklist_percentage(done, checklist.len());

            let view = CardView {
                labels: labels_by_card.remove(&card.id).unwrap_or_default(),
                assignees: assignees_by_card.remove(&card.id).unwrap_or_default(),
                checklist,
                checklist_percent,
                comments: comments_by_card.remove(&card.id).unwrap_or_default(),
                attachments: attachments_by_card.remove(&card.id).unwrap_or_default(),
                card,
            };

            cards_by_column
                .entry(view.card.column_id)
                .or_default()
                .push(view);
        }

        let columns = columns
            .into_iter()
            .map(|column| ColumnView {
                cards: cards_by_column.remove(&column.id).unwrap_or_default(),
                column,
            })
            .collect();

        Ok(BoardSnapshot {
            kanban,
            members: members.into_iter().map(|m| m.user_id).collect(),
            columns,
        })
    }
}

async fn card_labels_for_kanban(
    pool: &PgPool,
    kanban_id: Uuid,
) -> Result<HashMap<Uuid, Vec<Label>>, sqlx::Error> {
    let rows: Vec<(Uuid, Label)> = sqlx::query_as::<_, (Uuid, Uuid, Uuid, String, String, chrono::DateTime<chrono::Utc>)>(
        r#"
        SELECT cl.card_id, l.id, l.kanban_id, l.name, l.color, l.created_at
        FROM card_labels cl
        JOIN labels l ON l.id = cl.label_id
        WHERE l.kanban_id = $1
        ORDER BY l.created_at ASC
        "#,
    )
    .bind(kanban_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(card_id, id, kanban_id, name, color, created_at)| {
        (
            card_id,
            Label {
                id,
                kanban_id,
                name,
                color,
                created_at,
            },
        )
    })
    .collect();

    let mut by_card: HashMap<Uuid, Vec<Label>> = HashMap::new();
    for (card_id, label) in rows {
        by_card.entry(card_id).or_default().push(label);
    }

    Ok(by_card)
}

async fn assignees_for_kanban(
    pool: &PgPool,
    kanban_id: Uuid,
) -> Result<HashMap<Uuid, Vec<Uuid>>, sqlx::Error> {
    let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
        r#"
        SELECT ca.card_id, ca.user_id
        FROM card_assignees ca
        JOIN cards c ON c.id = ca.card_id
        JOIN columns col ON col.id = c.column_id
        WHERE col.kanban_id = $1
        "#,
    )
    .bind(kanban_id)
    .fetch_all(pool)
    .await?;

    let mut by_card: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (card_id, user_id) in rows {
        by_card.entry(card_id).or_default().push(user_id);
    }

    Ok(by_card)
}

async fn checklist_for_kanban(
    pool: &PgPool,
    kanban_id: Uuid,
) -> Result<HashMap<Uuid, Vec<ChecklistItem>>, sqlx::Error> {
    let items = sqlx::query_as::<_, ChecklistItem>(
        r#"
        SELECT i.id, i.card_id, i.text, i.done, i.created_at
        FROM checklist_items i
        JOIN cards c ON c.id = i.card_id
        JOIN columns col ON col.id = c.column_id
        WHERE col.kanban_id = $1
        ORDER BY i.created_at ASC
        "#,
    )
    .bind(kanban_id)
    .fetch_all(pool)
    .await?;

    let mut by_card: HashMap<Uuid, Vec<ChecklistItem>> = HashMap::new();
    for item in items {
        by_card.entry(item.card_id).or_default().push(item);
    }

    Ok(by_card)
}

async fn comments_for_kanban(
    pool: &PgPool,
    kanban_id: Uuid,
) -> Result<HashMap<Uuid, Vec<Comment>>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT cm.id, cm.card_id, cm.author_id, cm.content, cm.created_at, cm.updated_at
        FROM comments cm
        JOIN cards c ON c.id = cm.card_id
        JOIN columns col ON col.id = c.column_id
        WHERE col.kanban_id = $1
        ORDER BY cm.created_at ASC
        "#,
    )
    .bind(kanban_id)
    .fetch_all(pool)
    .await?;

    let mut by_card: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for comment in comments {
        by_card.entry(comment.card_id).or_default().push(comment);
    }

    Ok(by_card)
}

async fn attachments_for_kanban(
    pool: &PgPool,
    kanban_id: Uuid,
) -> Result<HashMap<Uuid, Vec<Attachment>>, sqlx::Error> {
    let attachments = sqlx::query_as::<_, Attachment>(
        r#"
        SELECT a.id, a.card_id, a.filename, a.url, a.created_at
        FROM attachments a
        JOIN cards c ON c.id = a.card_id
        JOIN columns col ON col.id = c.column_id
        WHERE col.kanban_id = $1
        ORDER BY a.created_at ASC
        "#,
    )
    .bind(kanban_id)
    .fetch_all(pool)
    .await?;

    let mut by_card: HashMap<Uuid, Vec<Attachment>> = HashMap::new();
    for attachment in attachments {
        by_card.entry(attachment.card_id).or_default().push(attachment);
    }

    Ok(by_card)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_percentage_empty() {
        assert_eq!(checklist_percentage(0, 0), 0);
    }

    #[test]
    fn test_checklist_percentage_rounding() {
        assert_eq!(checklist_percentage(1, 3), 33);
        assert_eq!(checklist_percentage(2, 3), 67);
        assert_eq!(checklist_percentage(1, 2), 50);
        assert_eq!(checklist_percentage(5, 5), 100);
    }

    #[test]
    fn test_checklist_percentage_none_done() {
        assert_eq!(checklist_percentage(0, 4), 0);
    }
}
