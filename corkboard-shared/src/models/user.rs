/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// accounts. Users can belong to multiple kanbans via the membership model.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'collaborator');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255),
///     role user_role NOT NULL DEFAULT 'collaborator',
///     avatar_url VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::models::user::{User, CreateUser, UserRole};
/// use corkboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: Some("John Doe".to_string()),
///     role: UserRole::Collaborator,
///     avatar_url: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// println!("Created user: {}", user.id);
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Global user role
///
/// ADMIN accounts can manage other users; COLLABORATOR accounts only act on
/// boards they own or belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Can manage other user accounts
    Admin,

    /// Regular account; acts only on boards it owns or belongs to
    Collaborator,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Collaborator => "collaborator",
        }
    }

    /// Can delete user accounts other than their own
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User model representing a user account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT)
    ///
    /// Must be unique across all users
    pub email: String,

    /// Argon2id password hash
    ///
    /// Never store plaintext passwords!
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// Global role
    pub role: UserRole,

    /// Optional avatar/profile picture URL
    pub avatar_url: Option<String>,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never logged in)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
///
/// Email and password_hash are required. Name and avatar_url are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (stored lowercase via CITEXT)
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// Global role to assign
    pub role: UserRole,

    /// Optional avatar URL
    pub avatar_url: Option<String>,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address
    pub email: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,

    /// New display name (use Some(None) to clear)
    pub name: Option<Option<String>>,

    /// New avatar URL (use Some(None) to clear)
    pub avatar_url: Option<Option<String>>,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, role, avatar_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, role, avatar_url,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .bind(data.avatar_url)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, avatar_url,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Email lookup is case-insensitive (via CITEXT column type).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, avatar_url,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at`
    /// timestamp is automatically set to the current time.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if user doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists for another user
    /// - Database connection fails
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.avatar_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar_url = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, email, password_hash, name, role, avatar_url, \
             created_at, updated_at, last_login_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(name_opt) = data.name {
            q = q.bind(name_opt);
        }
        if let Some(avatar_opt) = data.avatar_url {
            q = q.bind(avatar_opt);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// # Returns
    ///
    /// True if user was deleted, false if user didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates the last login timestamp for a user
    ///
    /// This is typically called after successful authentication.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all users with pagination
    ///
    /// Ordered by creation date (newest first).
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, avatar_url,
                   created_at, updated_at, last_login_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts users with a given role
    pub async fn count_by_role(pool: &PgPool, role: UserRole) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: Some("Test User".to_string()),
            role: UserRole::Collaborator,
            avatar_url: None,
        };

        assert_eq!(create_user.email, "test@example.com");
        assert_eq!(create_user.password_hash, "hash");
    }

    #[test]
    fn test_update_user_default() {
        let update = UpdateUser::default();
        assert!(update.email.is_none());
        assert!(update.password_hash.is_none());
        assert!(update.name.is_none());
        assert!(update.avatar_url.is_none());
    }

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Collaborator.as_str(), "collaborator");
    }

    #[test]
    fn test_user_role_permissions() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(!UserRole::Collaborator.can_manage_users());
    }

    #[test]
    fn test_user_role_serialization() {
        // API clients exchange roles in UPPERCASE
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");

        let role: UserRole = serde_json::from_str("\"COLLABORATOR\"").unwrap();
        assert_eq!(role, UserRole::Collaborator);
    }

    // Integration tests for database operations are in tests/ at the api crate
}
