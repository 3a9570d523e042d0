//! Password Hashing and Verification
//!
//! Two admissible schemes, chosen once at startup and used consistently
//! for the lifetime of a deployment:
//! - `Argon2id`: memory-hard PHC-encoded hash (OWASP recommended)
//! - `Sha256Digest`: plain salted digest, for low-assurance deployments
//!
//! Both are deterministic for identical `(secret, salt)` pairs, so sign-in
//! verifies by recomputation. The salt is the account name, which keeps
//! the credential derivable from the stored user record alone.

use std::fmt;

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{constant_time_eq, sha256, to_hex};

// ============================================================================
// Constants
// ============================================================================

/// Argon2 time cost (iterations)
pub const ARGON_TIME: u32 = 4;

/// Argon2 memory cost in KiB (16 MiB)
pub const ARGON_MEMORY_KIB: u32 = 16 * 1024;

/// Argon2 parallelism (lanes)
pub const ARGON_LANES: u32 = 4;

/// Argon2 output length in bytes
pub const ARGON_OUTPUT_LEN: usize = 32;

/// The PHC salt grammar requires at least four bytes; shorter account
/// names are padded deterministically before encoding.
const MIN_SALT_BYTES: usize = 4;
const SALT_PAD_BYTE: u8 = b'.';

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; Debug output is redacted. Length/character
/// policy is enforced upstream by the validation rules, not here.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Password Scheme
// ============================================================================

/// Hashing scheme for stored credentials
///
/// A deployment picks one and sticks with it; hashes produced by one
/// scheme do not verify under the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    /// Argon2id, PHC string format (algorithm id, version, costs, salt, key)
    #[default]
    Argon2id,
    /// Hex-encoded SHA-256 over salt ‖ secret
    Sha256Digest,
}

impl PasswordScheme {
    /// Parse from a configuration value
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "argon2id" => Some(Self::Argon2id),
            "sha256" => Some(Self::Sha256Digest),
            _ => None,
        }
    }

    /// Derive the encoded credential for `(secret, salt)`
    ///
    /// Deterministic: identical inputs yield the identical encoded string.
    /// Never logs or retains the secret.
    pub fn hash(&self, secret: &str, salt: &str) -> Result<String, PasswordHashError> {
        match self {
            Self::Argon2id => {
                let salt = encode_salt(salt)?;
                let hash = argon2()?
                    .hash_password(secret.as_bytes(), &salt)
                    .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
                Ok(hash.to_string())
            }
            Self::Sha256Digest => {
                let mut data = Vec::with_capacity(salt.len() + secret.len());
                data.extend_from_slice(salt.as_bytes());
                data.extend_from_slice(secret.as_bytes());
                Ok(to_hex(&sha256(&data)))
            }
        }
    }

    /// Verify `(secret, salt)` against a stored encoded credential
    ///
    /// Recomputes the hash and compares in constant time.
    pub fn verify(
        &self,
        secret: &str,
        salt: &str,
        encoded: &str,
    ) -> Result<bool, PasswordHashError> {
        let recomputed = self.hash(secret, salt)?;
        Ok(constant_time_eq(recomputed.as_bytes(), encoded.as_bytes()))
    }
}

fn argon2() -> Result<Argon2<'static>, PasswordHashError> {
    let params = Params::new(ARGON_MEMORY_KIB, ARGON_TIME, ARGON_LANES, Some(ARGON_OUTPUT_LEN))
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn encode_salt(salt: &str) -> Result<SaltString, PasswordHashError> {
    let bytes = salt.as_bytes();
    let result = if bytes.len() >= MIN_SALT_BYTES {
        SaltString::encode_b64(bytes)
    } else {
        let mut padded = [SALT_PAD_BYTE; MIN_SALT_BYTES];
        padded[..bytes.len()].copy_from_slice(bytes);
        SaltString::encode_b64(&padded)
    };
    result.map_err(|e| PasswordHashError::HashingFailed(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
