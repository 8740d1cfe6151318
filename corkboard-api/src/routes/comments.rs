/// Comment endpoints
///
/// # Endpoints
///
/// - `POST   /v1/cards/:id/comments` - Comment on a card
/// - `GET    /v1/cards/:id/comments` - List a card's comments
/// - `PUT    /v1/comments/:id` - Edit a comment (author only)
/// - `DELETE /v1/comments/:id` - Delete a comment

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
        comment::{Comment, CreateComment},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Comment creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment body
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

/// Comment update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    /// New body
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
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

/// Comments on a card as the authenticated user
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(card_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate()?;

    require_card_access(&state, &auth, card_id).await?;

    let comment = Comment::create(
        &state.db,
        card_id,
        auth.user_id,
        CreateComment {
            content: req.content,
        },
    )
    .await?;

    Ok(Json(comment))
}

/// Lists a card's comments in creation order
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    require_card_access(&state, &auth, card_id).await?;

    let comments = Comment::list_by_card(&state.db, card_id).await?;

    Ok(Json(comments))
}

/// Edits a comment
///
/// Only the comment's author may edit it.
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate()?;

    let comment = Comment::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    require_card_access(&state, &auth, comment.card_id).await?;

    if comment.author_id != Some(auth.user_id) {
        return Err(ApiError::Forbidden(
            "Only the author can edit a comment".to_string(),
        ));
    }

    let comment = Comment::update_content(&state.db, comment_id, req.content)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    Ok(Json(comment))
}

/// Deletes a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let comment = Comment::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    require_card_access(&state, &auth, comment.card_id).await?;

    let deleted = Comment::delete(&state.db, comment_id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
