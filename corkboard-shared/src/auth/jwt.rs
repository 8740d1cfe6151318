/// JWT token generation and validation module
///
/// This module provides JWT (JSON Web Token) functionality for user
/// authentication. Tokens are signed using HS256 (HMAC-SHA256) and carry the
/// user's identity and global role. This replaces the unsigned cookie
/// identity older deployments used: tokens expire and cannot be forged
/// without the signing secret.
///
/// # Token Types
///
/// - **Access Token**: Short-lived (24h), used for API authentication
/// - **Refresh Token**: Long-lived (30d), used to obtain new access tokens
///
/// # Example
///
/// ```
/// use corkboard_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use corkboard_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, UserRole::Collaborator, TokenType::Access);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}, got {actual}")]
    InvalidIssuer { expected: String, actual: String },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 24 hours)
    Access,

    /// Refresh token (long-lived, 30 days)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "corkboard")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Custom Claims
///
/// - `role`: Global user role at issuance time
/// - `token_type`: Access or refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "corkboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Global role (custom claim)
    pub role: UserRole,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with default expiration
    pub fn new(user_id: Uuid, role: UserRole, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, role, token_type, token_type.default_expiration())
    }

    /// Creates claims with custom expiration
    pub fn with_expiration(
        user_id: Uuid,
        role: UserRole,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: "corkboard".to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            role,
            token_type,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
///
/// # Security
///
/// The secret should be at least 32 bytes, randomly generated, and stored
/// in the environment or a secret manager.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies signature, expiration, not-before, and the "corkboard" issuer.
///
/// # Errors
///
/// Returns an error if the signature is invalid, the token has expired, the
/// issuer doesn't match, or the format is invalid.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&["corkboard"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: "corkboard".to_string(),
            actual: "unknown".to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates token and checks it's an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::ValidationError(
            "Expected access token, got refresh token".to_string(),
        ));
    }

    Ok(claims)
}

/// Validates token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::ValidationError(
            "Expected refresh token, got access token".to_string(),
        ));
    }

    Ok(claims)
}

/// Refreshes an access token using a refresh token
///
/// Takes a valid refresh token and generates a new access token with the
/// same user identity and role.
///
/// # Errors
///
/// Returns an error if the refresh token is invalid or expired
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::new(refresh_claims.sub, refresh_claims.role, TokenType::Access);

    create_token(&access_claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(30));
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, UserRole::Collaborator, TokenType::Access);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "corkboard");
        assert_eq!(claims.role, UserRole::Collaborator);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::new(user_id, UserRole::Admin, TokenType::Access);
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.token_type, TokenType::Access);
        assert_eq!(validated.iss, "corkboard");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), UserRole::Collaborator, TokenType::Access);
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret";

        // Negative duration = already expired
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            UserRole::Collaborator,
            TokenType::Access,
            Duration::seconds(-3600),
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_access_token_rejects_refresh() {
        let secret = "secret";

        let access_claims = Claims::new(Uuid::new_v4(), UserRole::Collaborator, TokenType::Access);
        let access_token = create_token(&access_claims, secret).unwrap();
        assert!(validate_access_token(&access_token, secret).is_ok());

        let refresh_claims =
            Claims::new(Uuid::new_v4(), UserRole::Collaborator, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, secret).unwrap();
        assert!(validate_access_token(&refresh_token, secret).is_err());
    }

    #[test]
    fn test_refresh_access_token() {
        let user_id = Uuid::new_v4();
        let secret = "secret";

        let refresh_claims = Claims::new(user_id, UserRole::Admin, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, secret).unwrap();

        let new_access_token = refresh_access_token(&refresh_token, secret).unwrap();

        let validated = validate_access_token(&new_access_token, secret).unwrap();
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_with_access_token_fails() {
        let secret = "secret";

        let access_claims = Claims::new(Uuid::new_v4(), UserRole::Collaborator, TokenType::Access);
        let access_token = create_token(&access_claims, secret).unwrap();

        let result = refresh_access_token(&access_token, secret);
        assert!(result.is_err());
    }
}
