//! Per-field value encryption
//!
//! Uses AES-256-GCM over individual textual values. The 256-bit key is
//! derived from the caller-supplied key string with SHA-256; the nonce is
//! derived from the key and the plaintext rather than drawn at random, so an
//! unchanged value always encrypts to the same stored artifact. Stable
//! artifacts matter for diff-based review of config files; the trade-off is
//! that equal plaintexts under the same key are recognizable as equal at rest.
//!
//! Stored form: base64(nonce || ciphertext).

use crate::error::{Error, Result};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;

/// Symmetric encryptor for individual field values
pub struct FieldEncryptor {
    cipher: Aes256Gcm,
    /// Raw derived key bytes, kept for nonce derivation
    key_bytes: [u8; 32],
}

impl FieldEncryptor {
    /// Create an encryptor from caller-supplied key material.
    ///
    /// The framework never invents or stores a key itself; the same key
    /// string must be supplied to decrypt what was written.
    #[must_use]
    pub fn new(key: &str) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&digest);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        Self { cipher, key_bytes }
    }

    /// Nonce derived from key + plaintext: same input, same stored bytes.
    fn nonce_for(&self, plaintext: &str) -> [u8; NONCE_LEN] {
        let mut hasher = Sha256::new();
        hasher.update(self.key_bytes);
        hasher.update([0u8]);
        hasher.update(plaintext.as_bytes());
        let digest = hasher.finalize();

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        nonce
    }

    /// Encrypt a plaintext value into its stored form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encryption`] if the cipher rejects the input.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce_bytes = self.nonce_for(plaintext);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut stored = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        stored.extend_from_slice(&nonce_bytes);
        stored.extend_from_slice(&ciphertext);

        Ok(base64::engine::general_purpose::STANDARD.encode(stored))
    }

    /// Decrypt a stored value back to plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decryption`] when the stored text is malformed or the
    /// key does not match. Callers treat this as a recoverable per-field
    /// failure, not a reason to abort the whole read.
    pub fn decrypt(&self, stored: &str) -> Result<String> {
        let raw = base64::engine::general_purpose::STANDARD
            .decode(stored.trim())
            .map_err(|e| Error::Decryption(format!("invalid base64: {e}")))?;

        if raw.len() <= NONCE_LEN {
            return Err(Error::Decryption("ciphertext too short".into()));
        }

        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| Error::Decryption("wrong key or corrupted value".into()))?;

        String::from_utf8(plaintext).map_err(|e| Error::Decryption(format!("invalid UTF-8: {e}")))
    }
}

// =============================================================================
// Tests
// =============================================================================
