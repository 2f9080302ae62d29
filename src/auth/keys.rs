// API key issuance and validation for the content API.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::model::{ApiKey, CreatedApiKey};
use crate::store::Store;

use super::AuthError;

/// Every issued key starts with this marker so keys stay recognizable
/// in config files and leaked logs.
pub const KEY_PREFIX: &str = "cabin_";

/// Length of the plaintext fragment kept for display.
const DISPLAY_PREFIX_LEN: usize = 12;

/// Hash a plaintext key the way the store records it.
pub fn hash_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

fn generate_key() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", KEY_PREFIX, hex::encode(bytes))
}

/// Issues, validates and revokes content API keys. Only the SHA-256
/// hash of a key is persisted; the plaintext leaves the server exactly
/// once, in the creation response.
#[derive(Clone)]
pub struct ApiKeyService {
    store: Store,
}

impl ApiKeyService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Mint a new key. The store keeps the hash and a short display
    /// prefix; the returned value carries the plaintext.
    pub async fn create(
        &self,
        name: &str,
        created_by: Option<i64>,
    ) -> Result<CreatedApiKey, AuthError> {
        let key = generate_key();
        let key_hash = hash_key(&key);
        let key_prefix = format!("{}...", &key[..DISPLAY_PREFIX_LEN]);
        let record = self
            .store
            .insert_api_key(name, &key_hash, &key_prefix, created_by)
            .await?;
        Ok(CreatedApiKey { record, key })
    }

    /// Look up an active key by its plaintext and stamp its last use.
    /// Revoked and unknown keys fail identically.
    pub async fn validate(&self, key: &str) -> Result<ApiKey, AuthError> {
        let record = self
            .store
            .find_active_api_key(&hash_key(key))
            .await?
            .ok_or(AuthError::InvalidApiKey)?;
        if let Err(err) = self.store.touch_api_key(record.id).await {
            debug!("Failed to stamp last_used_at for key {}: {}", record.id, err);
        }
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<ApiKey>, AuthError> {
        Ok(self.store.list_api_keys().await?)
    }

    /// Disable a key without deleting its record.
    pub async fn revoke(&self, id: i64) -> Result<(), AuthError> {
        Ok(self.store.deactivate_api_key(id).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AuthError> {
        Ok(self.store.delete_api_key(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_carry_the_marker() {
        let key = generate_key();
        assert!(key.starts_with(KEY_PREFIX));
        assert_eq!(key.len(), KEY_PREFIX.len() + 64);
        assert_ne!(key, generate_key());
    }

    #[test]
    fn hash_is_stable_sha256_hex() {
        assert_eq!(
            hash_key("cabin_test"),
            "b435691fe159e6beef8ede484a8e2f64a74749dd39fc6ee7ab80a0e37009991c"
        );
        assert_eq!(hash_key("cabin_test").len(), 64);
    }

    #[tokio::test]
    async fn create_validate_revoke_cycle() {
        let store = Store::open_in_memory().await.unwrap();
        let keys = ApiKeyService::new(store);

        let created = keys.create("deploy hook", None).await.unwrap();
        assert!(created.key.starts_with(KEY_PREFIX));
        assert_eq!(created.record.key_prefix, format!("{}...", &created.key[..12]));

        let seen = keys.validate(&created.key).await.unwrap();
        assert_eq!(seen.id, created.record.id);
        assert!(seen.is_active);

        keys.revoke(created.record.id).await.unwrap();
        let err = keys.validate(&created.key).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid API key");
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let store = Store::open_in_memory().await.unwrap();
        let keys = ApiKeyService::new(store);
        assert!(keys.validate("cabin_0000").await.is_err());
    }

    #[tokio::test]
    async fn validate_stamps_last_used() {
        let store = Store::open_in_memory().await.unwrap();
        let keys = ApiKeyService::new(store.clone());

        let created = keys.create("ci", None).await.unwrap();
        assert!(created.record.last_used_at.is_none());

        keys.validate(&created.key).await.unwrap();
        let after = store.get_api_key(created.record.id).await.unwrap();
        assert!(after.last_used_at.is_some());
    }
}
