// JWT-backed admin sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::User;
use crate::store::{Store, StoreError};

use super::{password, AuthError};

/// Signing parameters for session tokens.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub jwt_secret: String,
    pub ttl_hours: i64,
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn new(user: &User, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let expires = now + Duration::hours(ttl_hours);
        Self {
            sub: user.id,
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        }
    }
}

/// Issues and verifies admin session tokens.
#[derive(Clone)]
pub struct SessionService {
    store: Store,
    config: SessionConfig,
}

impl SessionService {
    pub fn new(store: Store, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Check a username/password pair and mint a token on success.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, User), AuthError> {
        let user = self
            .store
            .find_user(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !password::verify_password(password, &user.password_hash) {
            debug!("Login rejected for user '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }
        let token = self.issue(&user)?;
        Ok((token, user))
    }

    /// Sign a token for an already-authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user, self.config.ttl_hours);
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(AuthError::TokenGeneration)
    }

    /// Decode a token and validate its signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidSession)
    }

    /// Verify a token and load the user it names. A token for a user
    /// that has since been deleted counts as expired.
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.verify(token)?;
        match self.store.get_user(claims.sub).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound(_)) => Err(AuthError::InvalidSession),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    fn config() -> SessionConfig {
        SessionConfig {
            jwt_secret: "test-secret".into(),
            ttl_hours: 24,
        }
    }

    async fn seeded_store() -> Store {
        let store = Store::open_in_memory().await.unwrap();
        let hash = hash_password("letmein").unwrap();
        store.insert_user("admin", &hash, "admin").await.unwrap();
        store
    }

    #[tokio::test]
    async fn login_round_trip() {
        let sessions = SessionService::new(seeded_store().await, config());
        let (token, user) = sessions.login("admin", "letmein").await.unwrap();
        assert_eq!(user.username, "admin");

        let resolved = sessions.resolve(&token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_read_the_same() {
        let sessions = SessionService::new(seeded_store().await, config());
        let wrong = sessions.login("admin", "nope").await.unwrap_err();
        let unknown = sessions.login("ghost", "letmein").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let sessions = SessionService::new(seeded_store().await, config());
        let (token, _) = sessions.login("admin", "letmein").await.unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(sessions.verify(&tampered).is_err());
        assert!(sessions.verify("not-a-jwt").is_err());
    }

    #[tokio::test]
    async fn token_for_a_deleted_user_is_rejected() {
        let store = seeded_store().await;
        let sessions = SessionService::new(store.clone(), config());
        let (token, user) = sessions.login("admin", "letmein").await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user.id)
            .execute(store.pool())
            .await
            .unwrap();

        let err = sessions.resolve(&token).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid or expired session");
    }
}
