// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params as Argon2Params, Version};
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params as ScryptParams, Scrypt,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::config::AuthSettings;

/// Hash algorithm used for new credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Argon2,
    Scrypt,
}

/// Produces and checks stored password credentials.
///
/// Hashes are PHC strings, so `verify` can tell from the hash itself which
/// algorithm produced it.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password with a fresh random salt
    fn hash(&self, plain: &str) -> anyhow::Result<String>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, hash: &str, plain: &str) -> bool {
        verify_password(hash, plain)
    }
}

/// argon2id hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Argon2Params,
}

impl Argon2Hasher {
    pub fn new(memory_kib: u32, iterations: u32) -> anyhow::Result<Self> {
        let params = Argon2Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 parameters: {e}"))?;
        Ok(Self { params })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Argon2Params::default(),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("argon2 hashing failed: {e}"))?
            .to_string();
        Ok(hash)
    }
}

/// scrypt hasher
#[derive(Debug, Clone, Copy)]
pub struct ScryptHasher {
    params: ScryptParams,
}

impl ScryptHasher {
    pub fn new(log_n: u8) -> anyhow::Result<Self> {
        let params = ScryptParams::new(log_n, 8, 1, 32)
            .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;
        Ok(Self { params })
    }
}

impl CredentialHasher for ScryptHasher {
    fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| anyhow::anyhow!("scrypt hashing failed: {e}"))?
            .to_string();
        Ok(hash)
    }
}

/// Verify a password against a PHC hash produced by any supported algorithm
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    let argon2 = Argon2::default();
    let verifiers: [&dyn PasswordVerifier; 2] = [&argon2, &Scrypt];
    parsed_hash.verify_password(&verifiers, plain).is_ok()
}

/// Hash a password and zeroize the plaintext
pub fn hash_password_secure(
    hasher: &dyn CredentialHasher,
    plain: &mut String,
) -> anyhow::Result<String> {
    let hash = hasher.hash(plain);
    plain.zeroize();
    hash
}

/// Build the hasher selected in the settings
pub fn hasher_from_settings(settings: &AuthSettings) -> anyhow::Result<Arc<dyn CredentialHasher>> {
    let hasher: Arc<dyn CredentialHasher> = match settings.algorithm {
        HashAlgorithm::Argon2 => Arc::new(Argon2Hasher::new(
            settings.argon2_memory_kib,
            settings.argon2_iterations,
        )?),
        HashAlgorithm::Scrypt => Arc::new(ScryptHasher::new(settings.scrypt_log_n)?),
    };
    Ok(hasher)
}
