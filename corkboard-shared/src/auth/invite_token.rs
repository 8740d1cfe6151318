/// Invitation token minting
///
/// Invitation tokens are opaque, unguessable, and single-use. They are
/// stored as minted so that re-issuing an invitation for the same (email,
/// kanban) pair can return the existing token verbatim.
///
/// # Token Format
///
/// Tokens follow the pattern `cb_{32_chars}` (35 chars total):
/// - Prefix: "cb_" (3 chars)
/// - Random part: 32 alphanumeric chars (base62: [A-Za-z0-9])
///
/// # Example
///
/// ```
/// use corkboard_shared::auth::invite_token::{generate_invite_token, validate_invite_token_format};
///
/// let token = generate_invite_token();
/// assert!(token.starts_with("cb_"));
/// assert_eq!(token.len(), 35);
/// assert!(validate_invite_token_format(&token));
/// ```

use rand::Rng;

/// Length of the random part of the token (characters)
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Invitation token prefix
const TOKEN_PREFIX: &str = "cb_";

/// Total length of an invitation token (prefix + random)
pub const INVITE_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new invitation token
///
/// # Security
///
/// - Uses `rand::thread_rng()` for cryptographic randomness
/// - Key space: 62^32 ≈ 2^190 combinations
pub fn generate_invite_token() -> String {
    format!("{}{}", TOKEN_PREFIX, generate_random_string(TOKEN_RANDOM_LENGTH))
}

/// Generates a random alphanumeric string
///
/// Uses base62 encoding (A-Z, a-z, 0-9) for URL-safe tokens.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Validates invitation token format
///
/// Checks that the token starts with "cb_", has the correct length, and
/// contains only alphanumeric characters after the prefix.
pub fn validate_invite_token_format(token: &str) -> bool {
    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    if token.len() != INVITE_TOKEN_LENGTH {
        return false;
    }

    token[TOKEN_PREFIX.len()..]
        .chars()
        .all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_invite_token_format() {
        let token = generate_invite_token();

        assert!(token.starts_with("cb_"));
        assert_eq!(token.len(), INVITE_TOKEN_LENGTH);
        assert!(validate_invite_token_format(&token));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let tokens: HashSet<String> = (0..100).map(|_| generate_invite_token()).collect();
        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn test_validate_rejects_bad_tokens() {
        assert!(!validate_invite_token_format(""));
        assert!(!validate_invite_token_format("cb_short"));
        assert!(!validate_invite_token_format("xx_0123456789abcdefghijklmnopqrstuv"));
        assert!(!validate_invite_token_format("cb_0123456789abcdef-hijklmnopqrstuv"));
    }
}
