/// Board (kanban) endpoints
///
/// # Endpoints
///
/// - `POST   /v1/kanbans` - Create a board
/// - `GET    /v1/kanbans` - List boards visible to the caller
/// - `GET    /v1/kanbans/:id` - Fetch one board record
/// - `PUT    /v1/kanbans/:id` - Update a board
/// - `DELETE /v1/kanbans/:id` - Delete a board (owner only; cascades)
/// - `GET    /v1/kanbans/:id/board` - Full nested board snapshot
/// - `GET    /v1/kanbans/:id/members` - List the membership set
/// - `DELETE /v1/kanbans/:id/members/:user_id` - Remove a member

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
    board::BoardSnapshot,
    models::{
        kanban::{CreateKanban, Kanban, UpdateKanban},
        membership::Membership,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Board creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateKanbanRequest {
    /// Board name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Board update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateKanbanRequest {
    /// New board name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// Deletion acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a record was removed
    pub deleted: bool,
}

/// Creates a new board owned by the caller
pub async fn create_kanban(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateKanbanRequest>,
) -> ApiResult<Json<Kanban>> {
    req.validate()?;

    let kanban = Kanban::create(
        &state.db,
        CreateKanban {
            name: req.name,
            description: req.description,
            owner_id: auth.user_id,
        },
    )
    .await?;

    Ok(Json(kanban))
}

/// Lists boards the caller owns or belongs to
pub async fn list_kanbans(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Kanban>>> {
    let kanbans = Kanban::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(kanbans))
}

/// Fetches one board record
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member
/// - `404 Not Found`: board doesn't exist
pub async fn get_kanban(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
) -> ApiResult<Json<Kanban>> {
    let kanban = Kanban::find_by_id(&state.db, kanban_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Kanban not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    Ok(Json(kanban))
}

/// Updates a board (members only)
pub async fn update_kanban(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
    Json(req): Json<UpdateKanbanRequest>,
) -> ApiResult<Json<Kanban>> {
    req.validate()?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let kanban = Kanban::update(
        &state.db,
        kanban_id,
        UpdateKanban {
            name: req.name,
            description: req.description.map(Some),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Kanban not found".to_string()))?;

    Ok(Json(kanban))
}

/// Deletes a board (owner only)
///
/// Cascades to columns, cards, and all nested entities.
pub async fn delete_kanban(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let kanban = Kanban::find_by_id(&state.db, kanban_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Kanban not found".to_string()))?;

    if kanban.owner_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the board owner can delete it".to_string(),
        ));
    }

    let deleted = Kanban::delete(&state.db, kanban_id).await?;

    Ok(Json(DeleteResponse { deleted }))
}

/// Fetches the full nested board snapshot
///
/// Columns in display order, each card with labels, assignees, checklist
/// (and completion percentage), comments, and attachments. Clients
/// reconcile their local state against this payload.
pub async fn get_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
) -> ApiResult<Json<BoardSnapshot>> {
    let kanban = Kanban::find_by_id(&state.db, kanban_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Kanban not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let snapshot = BoardSnapshot::load(&state.db, kanban).await?;

    Ok(Json(snapshot))
}

/// Lists a board's membership set
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Membership>>> {
    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let members = Membership::list_by_kanban(&state.db, kanban_id).await?;

    Ok(Json(members))
}

/// Removes a member from a board
///
/// The owner can remove anyone else; a member can remove themself (leave).
/// The owner cannot be removed.
///
/// # Errors
///
/// - `400 Bad Request`: attempted to remove the owner
/// - `403 Forbidden`: caller is neither the owner nor the target
/// - `404 Not Found`: board or membership doesn't exist
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((kanban_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DeleteResponse>> {
    let kanban = Kanban::find_by_id(&state.db, kanban_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Kanban not found".to_string()))?;

    if user_id == kanban.owner_id {
        return Err(ApiError::BadRequest(
            "The board owner cannot be removed".to_string(),
        ));
    }

    if auth.user_id != kanban.owner_id && auth.user_id != user_id {
        return Err(ApiError::Forbidden(
            "Only the owner can remove other members".to_string(),
        ));
    }

    let deleted = Membership::delete(&state.db, kanban_id, user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Membership not found".to_string()));
    }

    Ok(Json(DeleteResponse { deleted }))
}
