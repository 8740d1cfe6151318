/// Attachment endpoints
///
/// # Endpoints
///
/// - `POST   /v1/cards/:id/attachments` - Upload a file (multipart form data)
/// - `GET    /v1/cards/:id/attachments` - List a card's attachments
/// - `DELETE /v1/attachments/:id` - Delete an attachment
///
/// The upload is the one non-JSON endpoint: a multipart body with a single
/// `file` field. The file is written under the configured upload directory
/// keyed by a fresh UUID; the database stores metadata only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use corkboard_shared::{
    auth::{authorization::require_membership, middleware::AuthContext},
    models::{
        attachment::{Attachment, CreateAttachment},
        card::Card,
    },
};
use serde::Serialize;
use uuid::Uuid;

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

/// Strips any path components from an uploaded filename
fn sanitize_filename(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("upload")
        .to_string()
}

/// Uploads a file attachment to a card
///
/// Expects a multipart body with a `file` field carrying a filename.
///
/// # Errors
///
/// - `400 Bad Request`: no `file` field, missing filename, or unreadable body
pub async fn upload_attachment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(card_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<Attachment>> {
    require_card_access(&state, &auth, card_id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .ok_or_else(|| ApiError::BadRequest("File field is missing a filename".to_string()))?;

        if filename.is_empty() {
            return Err(ApiError::BadRequest("Filename must not be empty".to_string()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?;

        // Key the stored file by a fresh UUID so concurrent uploads of the
        // same filename never collide
        let key = Uuid::new_v4();
        let dir = std::path::Path::new(&state.config.uploads.dir).join(key.to_string());

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::InternalError(format!("Failed to create upload dir: {}", e)))?;

        tokio::fs::write(dir.join(&filename), &data)
            .await
            .map_err(|e| ApiError::InternalError(format!("Failed to store file: {}", e)))?;

        let url = format!("/uploads/{}/{}", key, filename);

        let attachment =
            Attachment::create(&state.db, card_id, CreateAttachment { filename, url }).await?;

        return Ok(Json(attachment));
    }

    Err(ApiError::BadRequest(
        "Multipart body must contain a 'file' field".to_string(),
    ))
}

/// Lists a card's attachments in creation order
pub async fn list_attachments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Attachment>>> {
    require_card_access(&state, &auth, card_id).await?;

    let attachments = Attachment::list_by_card(&state.db, card_id).await?;

    Ok(Json(attachments))
}

/// Deletes an attachment record
///
/// The stored file is removed best-effort; a failure to unlink it is logged
/// and does not fail the request.
pub async fn delete_attachment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(attachment_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let attachment = Attachment::find_by_id(&state.db, attachment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attachment not found".to_string()))?;

    require_card_access(&state, &auth, attachment.card_id).await?;

    let deleted = Attachment::delete(&state.db, attachment_id).await?;

    if let Some(relative) = attachment.url.strip_prefix("/uploads/") {
        let path = std::path::Path::new(&state.config.uploads.dir).join(relative);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Failed to remove stored file {:?}: {}", path, e);
        }
    }

    Ok(Json(DeleteResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\notes.txt"), "notes.txt");
    }

    #[test]
    fn test_sanitize_filename_empty_component() {
        assert_eq!(sanitize_filename("dir/"), "");
    }
}
