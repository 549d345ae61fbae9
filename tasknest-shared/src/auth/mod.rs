/// Authentication utilities
///
/// This module provides the authentication primitives for TaskNest:
///
/// # Modules
///
/// - [`password`]: pbkdf2-sha256 password hashing and verification
/// - [`session`]: session token generation and hashing
/// - [`middleware`]: bearer-token authentication for the HTTP layer
///
/// # Security Features
///
/// - **Password Hashing**: salted, iterated pbkdf2-sha256 in PHC string format
/// - **Session Tokens**: random `tn_`-prefixed tokens, stored as SHA-256 hashes
/// - **Constant-time Comparison**: verification goes through the
///   `password_hash` machinery, never string equality on secrets
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::auth::password::{hash_password, verify_password};
/// use tasknest_shared::auth::session::generate_session_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let (token, token_hash) = generate_session_token();
/// assert!(token.starts_with("tn_"));
/// # Ok(())
/// # }
/// ```

pub mod middleware;
pub mod password;
pub mod session;
