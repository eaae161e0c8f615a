//! Encryption of stored document references.
//!
//! Document URLs are sealed with AES-256-GCM before they reach the store.
//! The key is the SHA-256 digest of the configured secret, and every call
//! draws a fresh 96-bit nonce. Tokens are URL-safe base64 of
//! `nonce || ciphertext || tag`.

use aes_gcm::Aes256Gcm;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LEN: usize = 12;

/// Document cipher errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// No secret was configured.
    #[error("cipher secret must not be empty")]
    EmptySecret,

    /// Sealing failed.
    #[error("encryption failed")]
    Encryption,

    /// The token is malformed, was tampered with, or was sealed with another key.
    #[error("decryption failed: {0}")]
    Decryption(&'static str),

    /// The decrypted bytes are not UTF-8.
    #[error("decrypted document reference is not valid UTF-8")]
    InvalidUtf8,
}

/// Symmetric cipher for document references.
#[derive(Clone)]
pub struct DocumentCipher {
    cipher: Aes256Gcm,
}

impl DocumentCipher {
    /// Derives the cipher key from `secret`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EmptySecret` when `secret` is empty or blank.
    pub fn new(secret: &str) -> Result<Self, CipherError> {
        if secret.trim().is_empty() {
            return Err(CipherError::EmptySecret);
        }

        let key = Sha256::digest(secret.as_bytes());
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&key));

        Ok(Self { cipher })
    }

    /// Encrypts a document reference into an opaque token.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Encryption` if the AEAD rejects the input.
    pub fn encrypt(&self, plain: &str) -> Result<String, CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let sealed = self
            .cipher
            .encrypt(GenericArray::from_slice(&nonce), plain.as_bytes())
            .map_err(|_| CipherError::Encryption)?;

        let mut token = Vec::with_capacity(NONCE_LEN + sealed.len());
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&sealed);

        Ok(base64_url::encode(&token))
    }

    /// Recovers the document reference from a token produced by [`Self::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Decryption` for malformed, tampered or
    /// foreign-key tokens, and `CipherError::InvalidUtf8` if the plaintext
    /// is not a string.
    pub fn decrypt(&self, token: &str) -> Result<String, CipherError> {
        let data =
            base64_url::decode(token).map_err(|_| CipherError::Decryption("invalid encoding"))?;

        if data.len() < NONCE_LEN {
            return Err(CipherError::Decryption("token too short"));
        }

        let (nonce, sealed) = data.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(GenericArray::from_slice(nonce), sealed)
            .map_err(|_| CipherError::Decryption("authentication failed"))?;

        String::from_utf8(plain).map_err(|_| CipherError::InvalidUtf8)
    }
}

impl std::fmt::Debug for DocumentCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
