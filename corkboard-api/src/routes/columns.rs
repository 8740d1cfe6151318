/// Column endpoints
///
/// # Endpoints
///
/// - `POST   /v1/kanbans/:id/columns` - Create a column in a board
/// - `GET    /v1/kanbans/:id/columns` - List a board's columns in order
/// - `PUT    /v1/columns/:id` - Update a column
/// - `DELETE /v1/columns/:id` - Delete a column (cascades to cards)

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
    models::column::{Column, CreateColumn, UpdateColumn},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Column creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateColumnRequest {
    /// Column title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Explicit position (appended at the end when absent)
    pub position: Option<i32>,
}

/// Column update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateColumnRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New position
    pub position: Option<i32>,
}

/// Deletion acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a record was removed
    pub deleted: bool,
}

/// Creates a column in a board
pub async fn create_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
    Json(req): Json<CreateColumnRequest>,
) -> ApiResult<Json<Column>> {
    req.validate()?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let column = Column::create(
        &state.db,
        kanban_id,
        CreateColumn {
            title: req.title,
            position: req.position,
        },
    )
    .await?;

    Ok(Json(column))
}

/// Lists a board's columns in display order
pub async fn list_columns(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Column>>> {
    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let columns = Column::list_by_kanban(&state.db, kanban_id).await?;

    Ok(Json(columns))
}

/// Updates a column
pub async fn update_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(column_id): Path<Uuid>,
    Json(req): Json<UpdateColumnRequest>,
) -> ApiResult<Json<Column>> {
    req.validate()?;

    let kanban_id = Column::kanban_id_of(&state.db, column_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let column = Column::update(
        &state.db,
        column_id,
        UpdateColumn {
            title: req.title,
            position: req.position,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    Ok(Json(column))
}

/// Deletes a column
///
/// Cascades to the column's cards and their nested entities.
pub async fn delete_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(column_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let kanban_id = Column::kanban_id_of(&state.db, column_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let deleted = Column::delete(&state.db, column_id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
