/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
/// - Token refresh
/// - Logout
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token
/// - `POST /v1/auth/logout` - End the session client-side

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Json};
use corkboard_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// User ID
    pub user_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: String,

    /// Global role
    pub role: UserRole,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Acknowledgment
    pub ok: bool,
}

/// Register a new user
///
/// Creates a new COLLABORATOR account and returns a token pair.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "name": "John Doe"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate()?;

    // Validate password strength
    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
            role: UserRole::Collaborator,
            avatar_url: None,
        },
    )
    .await?;

    let access_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(RegisterResponse {
        user_id: user.id.to_string(),
        access_token,
        refresh_token,
    }))
}

/// Login endpoint
///
/// Authenticates a user and returns JWT tokens.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    // Find user by email
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    // Verify password
    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    // Update last login
    User::update_last_login(&state.db, user.id).await?;

    let access_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        role: user.role,
        access_token,
        refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Logout endpoint
///
/// Tokens are stateless, so logout is an acknowledgment: the client discards
/// its tokens and they expire on their own.
pub async fn logout() -> ApiResult<Json<LogoutResponse>> {
    Ok(Json(LogoutResponse { ok: true }))
}
