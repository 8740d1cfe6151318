/// Database models for Corkboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, global roles, and authentication data
/// - `kanban`: Boards owned by a user
/// - `membership`: Board membership set (many-to-many users/kanbans)
/// - `column`: Ordered columns within a board
/// - `card`: Ordered cards within a column
/// - `label`: Board-scoped labels shared across cards
/// - `checklist_item`: Per-card checklist entries
/// - `comment`: Per-card comments with an author
/// - `attachment`: Per-card file attachment metadata
/// - `invitation`: Single-use tokens binding an email to a board
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
/// # Ok(())
/// # }
/// ```

pub mod attachment;
pub mod card;
pub mod checklist_item;
pub mod column;
pub mod comment;
pub mod invitation;
pub mod kanban;
pub mod label;
pub mod membership;
pub mod user;
