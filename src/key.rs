//! Passphrase-to-seed derivation.

use sha2::{Digest, Sha256};

use crate::error::{Result, VeilError};

/// Seed material derived deterministically from a passphrase.
///
/// Identical passphrase yields an identical seed on every platform and every
/// call; a one-character change produces an unrelated digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySeed([u8; 32]);

impl KeySeed {
    /// Raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Derive seed material from a passphrase.
///
/// Rejects the empty string with [`VeilError::InvalidSecret`]; this check
/// runs before any image data is touched.
pub fn derive(secret: &str) -> Result<KeySeed> {
    if secret.is_empty() {
        return Err(VeilError::InvalidSecret);
    }

    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    Ok(KeySeed(hasher.finalize().into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(derive(""), Err(VeilError::InvalidSecret)));
    }

    #[test]
    fn test_deterministic() {
        let a = derive("correct horse").unwrap();
        let b = derive("correct horse").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_avalanche() {
        let a = derive("abc123").unwrap();
        let b = derive("abc124").unwrap();
        assert_ne!(a, b);

        // One-character edit should flip roughly half the seed bits
        let differing: u32 = a
            .as_bytes()
            .iter()
            .zip(b.as_bytes().iter())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum();
        assert!(differing > 64, "only {differing} bits differ");
    }
}
