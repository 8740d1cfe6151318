/// Password hashing module using Argon2id
///
/// This module provides secure password hashing using the Argon2id algorithm.
/// Parameters are embedded in the PHC hash string, so verification works
/// regardless of how the stored hash was produced.
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use corkboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let password = "super_secret_password_123";
/// let hash = hash_password(password)?;
///
/// assert!(verify_password(password, &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id with secure parameters
///
/// # Returns
///
/// PHC string format hash (includes algorithm, parameters, salt, and hash),
/// e.g. `$argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$...`
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3) // 3 iterations
        .p_cost(4) // 4 parallelism
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a hash
///
/// Performs constant-time comparison to prevent timing attacks.
///
/// # Returns
///
/// `Ok(true)` if password matches, `Ok(false)` if it doesn't match
///
/// # Errors
///
/// Returns `PasswordError` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

/// Validates password strength
///
/// Checks that the password is at least 8 characters and mixes upper/lower
/// case, digits, and a special character.
///
/// # Returns
///
/// `Ok(())` if password is strong enough, `Err` with description if not
///
/// # Example
///
/// ```
/// use corkboard_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("MyP@ssw0rd!").is_ok());
/// assert!(validate_password_strength("Sh0rt!").is_err());
/// assert!(validate_password_strength("Password123").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one digit".to_string());
    }

    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "test_password_123";
        let hash = hash_password(password).expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let password = "same_password";

        let hash1 = hash_password(password).expect("Hash 1 should succeed");
        let hash2 = hash_password(password).expect("Hash 2 should succeed");

        // Different salts = different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let password = "correct_password";
        let hash = hash_password(password).expect("Hash should succeed");

        let result = verify_password(password, &hash).expect("Verify should succeed");
        assert!(result, "Correct password should verify");
    }

    #[test]
    fn test_verify_password_incorrect() {
        let password = "correct_password";
        let hash = hash_password(password).expect("Hash should succeed");

        let result = verify_password("wrong_password", &hash).expect("Verify should succeed");
        assert!(!result, "Wrong password should not verify");
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("password", "invalid_hash");
        assert!(result.is_err(), "Invalid hash should return error");
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let passwords = vec![
            "simple",
            "with spaces",
            "with-special-chars!@#$%",
            "unicode-密码-パスワード",
        ];

        for password in passwords {
            let hash = hash_password(password).expect("Hash should succeed");
            let verified = verify_password(password, &hash).expect("Verify should succeed");
            assert!(verified, "Password '{}' should verify", password);
        }
    }

    #[test]
    fn test_validate_password_strength_valid() {
        for password in ["MyP@ssw0rd!", "Str0ng!Pass", "C0mpl3x#Pwd"] {
            assert!(
                validate_password_strength(password).is_ok(),
                "Password '{}' should be valid",
                password
            );
        }
    }

    #[test]
    fn test_validate_password_strength_too_short() {
        let result = validate_password_strength("Sh0rt!");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("at least 8 characters"));
    }

    #[test]
    fn test_validate_password_strength_no_uppercase() {
        let result = validate_password_strength("lowercase1!");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("uppercase letter"));
    }

    #[test]
    fn test_validate_password_strength_no_digit() {
        let result = validate_password_strength("NoDigits!");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("digit"));
    }

    #[test]
    fn test_validate_password_strength_no_special() {
        let result = validate_password_strength("NoSpecial123");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("special character"));
    }
}
