/// Authentication context for request handling
///
/// After the API server validates a bearer token, it attaches an
/// [`AuthContext`] to the request extensions. Handlers extract it with
/// Axum's `Extension` extractor; the resolved identity is threaded
/// explicitly through request handling rather than held in ambient state.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use corkboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Authentication context added to request extensions
///
/// Carries the identity resolved from the access token: the user and their
/// global role at issuance time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Global role claimed by the token
    pub role: UserRole,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_jwt(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Whether this identity holds the ADMIN role
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_from_jwt() {
        let user_id = Uuid::new_v4();
        let ctx = AuthContext::from_jwt(user_id, UserRole::Admin);

        assert_eq!(ctx.user_id, user_id);
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_collaborator_is_not_admin() {
        let ctx = AuthContext::from_jwt(Uuid::new_v4(), UserRole::Collaborator);
        assert!(!ctx.is_admin());
    }
}
