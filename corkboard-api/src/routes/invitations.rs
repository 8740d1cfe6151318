/// Invitation endpoints
///
/// # Endpoints
///
/// - `POST /v1/kanbans/:id/invitations` - Issue an invitation (members only)
/// - `GET  /v1/kanbans/:id/invitations` - List a board's invitations
/// - `POST /v1/invitations/accept` - Accept an invitation (public)
///
/// # Flow
///
/// Issuing with a `user_id` attaches an existing account to the board
/// directly; no token is minted. Issuing with an `email` mints a single-use
/// token, idempotently: while an unused invitation for the same (email,
/// kanban) pair exists, its token is returned instead of a new one.
///
/// Acceptance is public (the invited user has no session yet): the token is
/// claimed one-way, the account is provisioned on first use, membership is
/// attached, and a bearer token pair is issued.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use corkboard_shared::{
    auth::{
        authorization::require_membership, invite_token::generate_invite_token, jwt,
        middleware::AuthContext, password,
    },
    models::{
        invitation::Invitation,
        kanban::Kanban,
        membership::Membership,
        user::{CreateUser, User, UserRole},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Invitation issue request
///
/// Exactly one of `email` and `user_id` must be provided.
#[derive(Debug, Deserialize, Validate)]
pub struct IssueInvitationRequest {
    /// Email to invite (token flow)
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Existing user to attach directly (no token)
    pub user_id: Option<Uuid>,

    /// Role granted to an account created during acceptance
    /// (defaults to COLLABORATOR)
    pub role: Option<UserRole>,
}

/// Invitation issue response
#[derive(Debug, Serialize)]
pub struct IssueInvitationResponse {
    /// The single-use token (email flow only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// The user attached directly (user_id flow only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_user_id: Option<Uuid>,

    /// Board the invitation targets
    pub kanban_id: Uuid,
}

/// Invitation accept request
#[derive(Debug, Deserialize)]
pub struct AcceptInvitationRequest {
    /// The invitation token
    pub token: String,

    /// Password for the account created on first acceptance. Existing
    /// accounts keep their password; this field is ignored for them.
    pub password: String,
}

/// Invitation accept response
#[derive(Debug, Serialize)]
pub struct AcceptInvitationResponse {
    /// The accepted user's ID
    pub user_id: Uuid,

    /// Board the user now belongs to
    pub kanban_id: Uuid,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Issues an invitation for a board
///
/// # Errors
///
/// - `400 Bad Request`: neither or both of `email` / `user_id` given
/// - `404 Not Found`: board or target user doesn't exist
/// - `409 Conflict`: target user is already a member
pub async fn issue_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
    Json(req): Json<IssueInvitationRequest>,
) -> ApiResult<Json<IssueInvitationResponse>> {
    req.validate()?;

    let kanban = Kanban::find_by_id(&state.db, kanban_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Kanban not found".to_string()))?;

    require_membership(&state.db, kanban.id, auth.user_id).await?;

    let role = req.role.unwrap_or(UserRole::Collaborator);

    match (req.email, req.user_id) {
        (None, Some(user_id)) => {
            User::find_by_id(&state.db, user_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

            if Membership::has_access(&state.db, kanban.id, user_id).await? {
                return Err(ApiError::Conflict(
                    "User is already a member of this kanban".to_string(),
                ));
            }

            Membership::create(&state.db, kanban.id, user_id).await?;

            Ok(Json(IssueInvitationResponse {
                token: None,
                attached_user_id: Some(user_id),
                kanban_id: kanban.id,
            }))
        }
        (Some(email), None) => {
            // Idempotent per (email, kanban): reuse the live invitation
            if let Some(existing) = Invitation::find_unused(&state.db, kanban.id, &email).await? {
                return Ok(Json(IssueInvitationResponse {
                    token: Some(existing.token),
                    attached_user_id: None,
                    kanban_id: kanban.id,
                }));
            }

            let invitation = Invitation::create(
                &state.db,
                kanban.id,
                &email,
                &generate_invite_token(),
                role,
            )
            .await?;

            Ok(Json(IssueInvitationResponse {
                token: Some(invitation.token),
                attached_user_id: None,
                kanban_id: kanban.id,
            }))
        }
        _ => Err(ApiError::BadRequest(
            "Provide exactly one of 'email' or 'user_id'".to_string(),
        )),
    }
}

/// Lists a board's invitations (newest first)
pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(kanban_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Invitation>>> {
    require_membership(&state.db, kanban_id, auth.user_id).await?;

    let invitations = Invitation::list_by_kanban(&state.db, kanban_id).await?;

    Ok(Json(invitations))
}

/// Accepts an invitation token
///
/// No session is required. If no account exists for the invited email, one
/// is created with the supplied password and the invitation's role. An
/// existing account is reused as-is (its password is neither checked nor
/// changed).
///
/// # Errors
///
/// - `404 Not Found`: unknown token (membership untouched)
/// - `409 Conflict`: token already used (membership untouched)
/// - `422 Unprocessable Entity`: password too weak for a new account
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(req): Json<AcceptInvitationRequest>,
) -> ApiResult<Json<AcceptInvitationResponse>> {
    let invitation = Invitation::find_by_token(&state.db, &req.token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    if invitation.used {
        return Err(ApiError::Conflict(
            "Invitation has already been used".to_string(),
        ));
    }

    let user = match User::find_by_email(&state.db, &invitation.email).await? {
        Some(existing) => existing,
        None => {
            password::validate_password_strength(&req.password).map_err(|e| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message: e,
                }])
            })?;

            let password_hash = password::hash_password(&req.password)?;

            User::create(
                &state.db,
                CreateUser {
                    email: invitation.email.clone(),
                    password_hash,
                    name: None,
                    role: invitation.role,
                    avatar_url: None,
                },
            )
            .await?
        }
    };

    if !Membership::has_access(&state.db, invitation.kanban_id, user.id).await? {
        Membership::create(&state.db, invitation.kanban_id, user.id).await?;
    }

    // One-way claim; a concurrent acceptance that got here first wins
    Invitation::mark_used(&state.db, invitation.id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Invitation has already been used".to_string()))?;

    let access_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(AcceptInvitationResponse {
        user_id: user.id,
        kanban_id: invitation.kanban_id,
        access_token,
        refresh_token,
    }))
}
