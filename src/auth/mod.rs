pub mod keys;
pub mod password;
pub mod session;

pub use keys::ApiKeyService;
pub use session::{Claims, SessionConfig, SessionService};

use crate::store::StoreError;

/// Authentication failure. The client-facing variants keep their
/// messages deliberately vague: a login error never says whether the
/// username or the password was wrong, a key error never says whether
/// the key is unknown or revoked.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid API key")]
    InvalidApiKey,
    #[error("invalid or expired session")]
    InvalidSession,
    #[error("token generation failed")]
    TokenGeneration(#[source] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
