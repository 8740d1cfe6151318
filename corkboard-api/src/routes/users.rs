/// User self-service and administration endpoints
///
/// # Endpoints
///
/// - `GET    /v1/users/me` - Fetch own profile
/// - `PUT    /v1/users/me` - Update own profile
/// - `PUT    /v1/users/me/password` - Change own password
/// - `GET    /v1/users` - List users (ADMIN)
/// - `DELETE /v1/users/:id` - Delete a user (ADMIN, never self)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use corkboard_shared::{
    auth::{
        authorization::{require_admin, require_user_delete},
        middleware::AuthContext,
        password,
    },
    models::user::{UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    /// New avatar URL
    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password (re-verified before the change)
    pub current_password: String,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Maximum number of users to return (default 50)
    pub limit: Option<i64>,

    /// Number of users to skip (default 0)
    pub offset: Option<i64>,
}

/// Deletion acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a record was removed
    pub deleted: bool,
}

/// Fetches the authenticated user's profile
///
/// # Errors
///
/// - `404 Not Found`: the account behind the token no longer exists
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Updates the authenticated user's profile
///
/// Only the provided fields change.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateMeRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let update = UpdateUser {
        email: req.email,
        password_hash: None,
        name: req.name.map(Some),
        avatar_url: req.avatar_url.map(Some),
    };

    let user = User::update(&state.db, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Changes the authenticated user's password
///
/// # Errors
///
/// - `401 Unauthorized`: current password doesn't match
/// - `422 Unprocessable Entity`: new password too weak
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    password::validate_password_strength(&req.new_password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "new_password".to_string(),
            message: e,
        }])
    })?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.new_password)?;

    let user = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            password_hash: Some(password_hash),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Lists user accounts (ADMIN only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Vec<User>>> {
    require_admin(&auth)?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let users = User::list(&state.db, limit, offset).await?;

    Ok(Json(users))
}

/// Deletes a user account
///
/// Only ADMIN accounts may delete users, and no account may delete itself.
///
/// # Errors
///
/// - `400 Bad Request`: attempted self-deletion
/// - `403 Forbidden`: acting account is not an ADMIN
/// - `404 Not Found`: target user doesn't exist
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require_user_delete(&auth, user_id)?;

    let deleted = User::delete(&state.db, user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(DeleteResponse { deleted }))
}
