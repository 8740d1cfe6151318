/// Authentication and authorization utilities
///
/// This module provides secure authentication primitives for Corkboard:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: JWT token generation and validation
/// - [`invite_token`]: Invitation token minting
/// - [`middleware`]: Request authentication context
/// - [`authorization`]: Role and membership checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration
/// - **Invitation Tokens**: Secure random generation (base62, 2^190 key space)
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod invite_token;
pub mod jwt;
pub mod middleware;
pub mod password;
