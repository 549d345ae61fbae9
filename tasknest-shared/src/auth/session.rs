/// Session token utilities
///
/// Session tokens identify a logged-in user between requests. These work in
/// conjunction with the [`crate::models::session`] module for storage.
///
/// # Token Format
///
/// `tn_{32_chars}` — prefix plus 32 random base62 characters, 35 chars
/// total. Only the SHA-256 hex digest of a token is persisted; a leaked
/// sessions table does not yield usable credentials.
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::session::{generate_session_token, hash_session_token};
///
/// let (token, hash) = generate_session_token();
/// assert!(token.starts_with("tn_"));
/// assert_eq!(hash, hash_session_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the session token (characters)
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Session token prefix
const TOKEN_PREFIX: &str = "tn_";

/// Total length of a session token (prefix + random)
pub const SESSION_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new session token
///
/// Returns the plaintext token (handed to the client) and its SHA-256 hex
/// digest (stored in the sessions table).
pub fn generate_session_token() -> (String, String) {
    let token = format!("{}{}", TOKEN_PREFIX, random_base62(TOKEN_RANDOM_LENGTH));
    let hash = hash_session_token(&token);
    (token, hash)
}

/// Generates a random base62 string (A-Z, a-z, 0-9)
fn random_base62(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a session token with SHA-256
///
/// Deterministic, so a presented token can be looked up by digest.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates session token format
///
/// Cheap pre-check before hitting the database: correct prefix, correct
/// length, base62 random part.
pub fn validate_token_format(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH
        && token.starts_with(TOKEN_PREFIX)
        && token[TOKEN_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
}
