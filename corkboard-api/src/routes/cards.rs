/// Card endpoints
///
/// # Endpoints
///
/// - `POST   /v1/columns/:id/cards` - Create a card in a column
/// - `GET    /v1/cards/:id` - Fetch a card
/// - `PUT    /v1/cards/:id` - Update a card
/// - `DELETE /v1/cards/:id` - Delete a card (cascades)
/// - `POST   /v1/cards/reorder` - Persist a reorder batch
/// - `POST   /v1/cards/:id/labels/:label_id` - Attach a label
/// - `DELETE /v1/cards/:id/labels/:label_id` - Detach a label
/// - `POST   /v1/cards/:id/assignees/:user_id` - Assign a user
/// - `DELETE /v1/cards/:id/assignees/:user_id` - Unassign a user
///
/// The reorder endpoint accepts the placement batch a drag gesture
/// produces (see the shared reorder module) and applies it in one
/// transaction: a storage failure leaves the previous ordering intact.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use corkboard_shared::{
    auth::{authorization::require_membership, middleware::AuthContext},
    models::{
        card::{Card, CreateCard, UpdateCard},
        column::Column,
        label::Label,
        user::User,
    },
    reorder::{validate_batch, CardPlacement},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

/// Card creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    /// Card title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Explicit position (appended at the end when absent)
    pub position: Option<i32>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Card update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCardRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Reorder batch request
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// (card, column, position) triples covering every touched card
    pub placements: Vec<CardPlacement>,
}

/// Reorder batch response
#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    /// Number of cards written
    pub updated: u64,
}

/// Deletion acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a record was removed
    pub deleted: bool,
}

/// Link acknowledgment (labels, assignees)
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    /// Whether the link now exists (attach) or was removed (detach)
    pub ok: bool,
}

/// Creates a card in a column
pub async fn create_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(column_id): Path<Uuid>,
    Json(req): Json<CreateCardRequest>,
) -> ApiResult<Json<Card>> {
    req.validate()?;

    let kanban_id = Column::kanban_id_of(&state.db, column_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let card = Card::create(
        &state.db,
        column_id,
        CreateCard {
            title: req.title,
            description: req.description,
            position: req.position,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok(Json(card))
}

/// Fetches a card
pub async fn get_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<Json<Card>> {
    let kanban_id = Card::kanban_id_of(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let card = Card::find_by_id(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    Ok(Json(card))
}

/// Updates a card
pub async fn update_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(card_id): Path<Uuid>,
    Json(req): Json<UpdateCardRequest>,
) -> ApiResult<Json<Card>> {
    req.validate()?;

    let kanban_id = Card::kanban_id_of(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let card = Card::update(
        &state.db,
        card_id,
        UpdateCard {
            title: req.title,
            description: req.description.map(Some),
            due_date: req.due_date.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    Ok(Json(card))
}

/// Deletes a card
pub async fn delete_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let kanban_id = Card::kanban_id_of(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let deleted = Card::delete(&state.db, card_id).await?;

    Ok(Json(DeleteResponse { deleted }))
}

/// Persists a reorder batch
///
/// The batch must be internally consistent (no card twice, no two cards in
/// one (column, position) slot) and every touched card and column must lie
/// on a board the caller belongs to. All rows are written in a single
/// transaction.
///
/// # Errors
///
/// - `400 Bad Request`: empty or inconsistent batch
/// - `403 Forbidden`: a touched board doesn't include the caller
/// - `404 Not Found`: a referenced card or column doesn't exist
pub async fn reorder_cards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<Json<ReorderResponse>> {
    if req.placements.is_empty() {
        return Err(ApiError::BadRequest(
            "Reorder batch must not be empty".to_string(),
        ));
    }

    validate_batch(&req.placements)?;

    // Authorize once per distinct board touched by the batch
    let mut checked_kanbans: HashSet<Uuid> = HashSet::new();

    for placement in &req.placements {
        let card_kanban = Card::kanban_id_of(&state.db, placement.card_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Card {} not found", placement.card_id))
            })?;

        let column_kanban = Column::kanban_id_of(&state.db, placement.column_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Column {} not found", placement.column_id))
            })?;

        for kanban_id in [card_kanban, column_kanban] {
            if checked_kanbans.insert(kanban_id) {
                require_membership(&state.db, kanban_id, auth.user_id).await?;
            }
        }
    }

    let updated = Card::apply_placements(&state.db, &req.placements).await?;

    Ok(Json(ReorderResponse { updated }))
}

/// Attaches a label to a card
///
/// The label must belong to the same board as the card.
pub async fn add_label(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((card_id, label_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<LinkResponse>> {
    let kanban_id = Card::kanban_id_of(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let label = Label::find_by_id(&state.db, label_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    if label.kanban_id != kanban_id {
        return Err(ApiError::BadRequest(
            "Label belongs to a different kanban".to_string(),
        ));
    }

    Card::add_label(&state.db, card_id, label_id).await?;

    Ok(Json(LinkResponse { ok: true }))
}

/// Detaches a label from a card
pub async fn remove_label(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((card_id, label_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<LinkResponse>> {
    let kanban_id = Card::kanban_id_of(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let removed = Card::remove_label(&state.db, card_id, label_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Label is not on this card".to_string()));
    }

    Ok(Json(LinkResponse { ok: true }))
}

/// Assigns a user to a card
///
/// The assignee must be a member of the card's board.
pub async fn add_assignee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((card_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<LinkResponse>> {
    let kanban_id = Card::kanban_id_of(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // The assignee must see the board too
    require_membership(&state.db, kanban_id, user_id)
        .await
        .map_err(|_| {
            ApiError::BadRequest("Assignee is not a member of this kanban".to_string())
        })?;

    Card::add_assignee(&state.db, card_id, user_id).await?;

    Ok(Json(LinkResponse { ok: true }))
}

/// Unassigns a user from a card
pub async fn remove_assignee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((card_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<LinkResponse>> {
    let kanban_id = Card::kanban_id_of(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let removed = Card::remove_assignee(&state.db, card_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound(
            "User is not assigned to this card".to_string(),
        ));
    }

    Ok(Json(LinkResponse { ok: true }))
}
