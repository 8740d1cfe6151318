/// Label endpoints
///
/// # Endpoints
///
/// - `POST   /v1/kanbans/:id/labels` - Create a label in a board
/// - `GET    /v1/kanbans/:id/labels` - List a board's labels
/// - `PUT    /v1/labels/:id` - Update a label
/// - `DELETE /v1/labels/:id` - Delete a label (detaches it everywhere)

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
    models::label::{CreateLabel, Label, UpdateLabel},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Label creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLabelRequest {
    /// Label name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Display color
    #[validate(length(min = 1, max = 32, message = "Color must be 1-32 characters"))]
    pub color: String,
}

/// Label update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLabelRequest {
    /// New name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// New color
    #[validate(length(min = 1, max = 32, message = "Color must be 1-32 characters"))]
    pub color: Option<String>,
}

/// Deletion acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a record was removed
    pub deleted: bool,
}

/// Creates a label in a board
pub async fn create_label(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
    Json(req): Json<CreateLabelRequest>,
) -> ApiResult<Json<Label>> {
    req.validate()?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let label = Label::create(
        &state.db,
        kanban_id,
        CreateLabel {
            name: req.name,
            color: req.color,
        },
    )
    .await?;

    Ok(Json(label))
}

/// Lists a board's labels
pub async fn list_labels(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Label>>> {
    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let labels = Label::list_by_kanban(&state.db, kanban_id).await?;

    Ok(Json(labels))
}

/// Updates a label
pub async fn update_label(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(label_id): Path<Uuid>,
    Json(req): Json<UpdateLabelRequest>,
) -> ApiResult<Json<Label>> {
    req.validate()?;

    let label = Label::find_by_id(&state.db, label_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    require_membership(&state.db, label.kanban_id, auth.user_id).await?;

    let label = Label::update(
        &state.db,
        label_id,
        UpdateLabel {
            name: req.name,
            color: req.color,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    Ok(Json(label))
}

/// Deletes a label
pub async fn delete_label(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(label_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let label = Label::find_by_id(&state.db, label_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    require_membership(&state.db, label.kanban_id, auth.user_id).await?;

    let deleted = Label::delete(&state.db, label_id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
