//! Authentication and authorization ports.

use uuid::Uuid;

/// Identity recovered from a verified bearer token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
}

/// Token service - issues and verifies signed bearer tokens.
///
/// Tokens bind a user identity and carry no expiry; a token stays valid
/// until the signing secret rotates.
pub trait TokenService: Send + Sync {
    /// Sign a token for the given user identity.
    fn issue_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Verify a token and recover the identity bound to it.
    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("missing authorization header")]
    MissingAuth,

    #[error("hashing error: {0}")]
    HashingError(String),
}
