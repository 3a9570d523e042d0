//! Session Token Generation
//!
//! Tokens are bearer credentials: anyone holding one is the owning user
//! until expiry. They carry no structure, only entropy.

use platform::crypto::{to_hex, try_random_bytes};

use crate::error::{AuthError, AuthResult};

/// Random bytes per token; hex-encoded, so tokens are twice this long
pub const TOKEN_BYTES: usize = 16;

/// Mint a fresh session token
///
/// Pulls [`TOKEN_BYTES`] from the OS random source and hex-encodes them
/// into a fixed-length cookie-safe string. Fails with
/// [`AuthError::TokenEntropy`] if the source cannot deliver the full
/// amount.
pub fn new_token() -> AuthResult<String> {
    let bytes = try_random_bytes(TOKEN_BYTES).map_err(|_| AuthError::TokenEntropy)?;
    Ok(to_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = new_token().unwrap();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = new_token().unwrap();
        let b = new_token().unwrap();
        assert_ne!(a, b);
    }
}
