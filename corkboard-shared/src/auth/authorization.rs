/// Authorization helpers and permission checks
///
/// This module provides the allow-list checks protected routes perform:
///
/// 1. **Board Membership**: mutations on a board's resources require the
///    acting user to be in that board's membership set
/// 2. **Global Role**: user administration requires the ADMIN role
/// 3. **Self-Deletion Guard**: no account may delete itself, regardless of
///    role
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::auth::authorization::{require_membership, require_user_delete};
/// use corkboard_shared::auth::middleware::AuthContext;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: &PgPool, auth: &AuthContext, kanban_id: Uuid, target: Uuid)
/// # -> Result<(), Box<dyn std::error::Error>> {
/// require_membership(pool, kanban_id, auth.user_id).await?;
/// require_user_delete(auth, target)?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::membership::Membership;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User is not a member of the board
    #[error("Not a member of kanban {0}")]
    NotMember(Uuid),

    /// Operation requires the ADMIN role
    #[error("Requires admin role")]
    NotAdmin,

    /// An account tried to delete itself
    #[error("A user cannot delete their own account")]
    SelfDeletion,

    /// User doesn't own the resource
    #[error("Not authorized to access this resource")]
    NotAuthorized,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Checks that a user belongs to a board's membership set
///
/// # Errors
///
/// Returns `AuthzError::NotMember` if the user is not a member
pub async fn require_membership(
    pool: &PgPool,
    kanban_id: Uuid,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    let has_access = Membership::has_access(pool, kanban_id, user_id).await?;

    if !has_access {
        return Err(AuthzError::NotMember(kanban_id));
    }

    Ok(())
}

/// Checks that the acting identity may delete the target user account
///
/// The self-deletion guard applies before the role check: even an ADMIN
/// cannot delete their own account.
///
/// # Errors
///
/// - `AuthzError::SelfDeletion` when actor and target are the same account
/// - `AuthzError::NotAdmin` when the actor lacks the ADMIN role
pub fn require_user_delete(auth: &AuthContext, target_user_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id == target_user_id {
        return Err(AuthzError::SelfDeletion);
    }

    if !auth.is_admin() {
        return Err(AuthzError::NotAdmin);
    }

    Ok(())
}

/// Checks that the acting identity holds the ADMIN role
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if !auth.is_admin() {
        return Err(AuthzError::NotAdmin);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    #[test]
    fn test_admin_can_delete_other_user() {
        let auth = AuthContext::from_jwt(Uuid::new_v4(), UserRole::Admin);
        assert!(require_user_delete(&auth, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_collaborator_cannot_delete_other_user() {
        let auth = AuthContext::from_jwt(Uuid::new_v4(), UserRole::Collaborator);
        let result = require_user_delete(&auth, Uuid::new_v4());
        assert!(matches!(result, Err(AuthzError::NotAdmin)));
    }

    #[test]
    fn test_no_self_deletion_even_for_admin() {
        let user_id = Uuid::new_v4();
        let auth = AuthContext::from_jwt(user_id, UserRole::Admin);
        let result = require_user_delete(&auth, user_id);
        assert!(matches!(result, Err(AuthzError::SelfDeletion)));
    }

    #[test]
    fn test_require_admin() {
        let admin = AuthContext::from_jwt(Uuid::new_v4(), UserRole::Admin);
        assert!(require_admin(&admin).is_ok());

        let collaborator = AuthContext::from_jwt(Uuid::new_v4(), UserRole::Collaborator);
        assert!(matches!(require_admin(&collaborator), Err(AuthzError::NotAdmin)));
    }
}
