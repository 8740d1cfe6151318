/// Checklist item endpoints
///
/// # Endpoints
///
/// - `POST   /v1/cards/:id/checklist` - Add an item to a card's checklist
/// - `PUT    /v1/checklist-items/:id` - Update an item (text, done)
/// - `DELETE /v1/checklist-items/:id` - Delete an item

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
        card::Card,
        checklist_item::{ChecklistItem, CreateChecklistItem, UpdateChecklistItem},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Checklist item creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChecklistItemRequest {
    /// Item text
    #[validate(length(min = 1, message = "Text must not be empty"))]
    pub text: String,
}

/// Checklist item update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChecklistItemRequest {
    /// New text
    #[validate(length(min = 1, message = "Text must not be empty"))]
    pub text: Option<String>,

    /// New done state
    pub done: Option<bool>,
}

/// Deletion acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a record was removed
    pub deleted: bool,
}

async fn require_card_access(
    state: &AppState,
    auth: &AuthContext,
    card_id: Uuid,
) -> ApiResult<()> {
    let kanban_id = Card::kanban_id_of(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    Ok(())
}

/// Adds an item to a card's checklist
pub async fn create_checklist_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(card_id): Path<Uuid>,
    Json(req): Json<CreateChecklistItemRequest>,
) -> ApiResult<Json<ChecklistItem>> {
    req.validate()?;

    require_card_access(&state, &auth, card_id).await?;

    let item = ChecklistItem::create(&state.db, card_id, CreateChecklistItem { text: req.text })
        .await?;

    Ok(Json(item))
}

/// Updates a checklist item
pub async fn update_checklist_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(item_id): Path<Uuid>,
    Json(req): Json<UpdateChecklistItemRequest>,
) -> ApiResult<Json<ChecklistItem>> {
    req.validate()?;

    let card_id = ChecklistItem::card_id_of(&state.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Checklist item not found".to_string()))?;

    require_card_access(&state, &auth, card_id).await?;

    let item = ChecklistItem::update(
        &state.db,
        item_id,
        UpdateChecklistItem {
            text: req.text,
            done: req.done,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Checklist item not found".to_string()))?;

    Ok(Json(item))
}

/// Deletes a checklist item
pub async fn delete_checklist_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(item_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let card_id = ChecklistItem::card_id_of(&state.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Checklist item not found".to_string()))?;

    require_card_access(&state, &auth, card_id).await?;

    let deleted = ChecklistItem::delete(&state.db, item_id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
