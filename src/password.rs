// Salted PBKDF2 hashes encoded as `<iterations>$<base64 salt>$<base64 hash>`

use std::{num::NonZeroU32, sync::Arc};

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::{engine::general_purpose, Engine};
use ring::{
    pbkdf2,
    rand::{SecureRandom, SystemRandom},
};

use crate::error::ApiError;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = ring::digest::SHA256_OUTPUT_LEN;
const DUMMY_PASSWORD: &str = "no-such-user";

#[derive(Clone)]
pub struct PasswordHasher {
    iterations: NonZeroU32,
    rng: SystemRandom,
    // Checked when a login names an unknown user so both outcomes cost the same
    dummy_hash: Arc<str>,
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

fn encode(iterations: NonZeroU32, salt: &[u8], password: &str) -> String {
    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA256, iterations, salt, password.as_bytes(), &mut hash);

    format!(
        "{}${}${}",
        iterations,
        general_purpose::STANDARD.encode(salt),
        general_purpose::STANDARD.encode(hash)
    )
}

fn join_error(err: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(format!("password worker failed: {err}"))
}

impl PasswordHasher {
    pub fn new(iterations: NonZeroU32) -> Self {
        Self {
            iterations,
            rng: SystemRandom::new(),
            dummy_hash: encode(iterations, &[0u8; SALT_LEN], DUMMY_PASSWORD).into(),
            #[cfg(test)]
            verifications: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        let mut salt = [0u8; SALT_LEN];
        self.rng
            .fill(&mut salt)
            .map_err(|_| ApiError::Internal("secure random source unavailable".to_string()))?;

        Ok(encode(self.iterations, &salt, password))
    }

    // False for a wrong password and for an unreadable encoding
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::SeqCst);

        let mut parts = encoded.splitn(3, '$');
        let (Some(iterations), Some(salt), Some(hash)) = (parts.next(), parts.next(), parts.next()) else {
            return false;
        };
        let Some(iterations) = iterations.parse::<u32>().ok().and_then(NonZeroU32::new) else {
            return false;
        };
        let (Ok(salt), Ok(hash)) = (
            general_purpose::STANDARD.decode(salt),
            general_purpose::STANDARD.decode(hash),
        ) else {
            return false;
        };

        pbkdf2::verify(pbkdf2::PBKDF2_HMAC_SHA256, iterations, &salt, password.as_bytes(), &hash).is_ok()
    }

    // With no stored hash the dummy hash is verified and the result discarded
    pub fn verify_or_dummy(&self, password: &str, encoded: Option<&str>) -> bool {
        match encoded {
            Some(encoded) => self.verify(password, encoded),
            None => {
                self.verify(password, &self.dummy_hash);
                false
            }
        }
    }

    pub async fn spawn_hash(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(join_error)?
    }

    pub async fn spawn_verify(&self, password: String, encoded: Option<String>) -> Result<bool, ApiError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_or_dummy(&password, encoded.as_deref()))
            .await
            .map_err(join_error)
    }
}
