//! Cryptographic sealing of the password database using Argon2id and AES-256-GCM.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use argon2::{password_hash::rand_core::RngCore, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that can occur during cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed")]
    DecryptionFailed,
    #[error("Invalid base64 encoding")]
    InvalidBase64,
    #[error("Invalid salt length")]
    InvalidSaltLength,
    #[error("Key derivation failed")]
    KeyDerivationFailed,
    #[error("Invalid key derivation parameters: {0}")]
    InvalidParams(String),
}

/// Largest Argon2 memory cost accepted, in KiB (1 GiB).
pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;
pub const MAX_ITERATIONS: u32 = 64;
pub const MAX_PARALLELISM: u32 = 16;

/// Argon2id cost parameters, stored alongside every sealed database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536, // 64 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Reject costs that Argon2 cannot use or that would exhaust memory.
    pub fn check(&self) -> Result<(), CryptoError> {
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(CryptoError::InvalidParams(format!(
                "parallelism {} outside 1..={MAX_PARALLELISM}",
                self.parallelism
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(CryptoError::InvalidParams(format!(
                "iterations {} outside 1..={MAX_ITERATIONS}",
                self.iterations
            )));
        }
        let min_memory = 8 * self.parallelism;
        if !(min_memory..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(CryptoError::InvalidParams(format!(
                "memory {} KiB outside {min_memory}..={MAX_MEMORY_KIB}",
                self.memory_kib
            )));
        }
        Ok(())
    }
}

/// Handles all cryptographic operations for the database file.
pub struct VaultCrypto {
    params: KdfParams,
    hash_len: usize,
    salt_len: usize,
    nonce_size: usize,
}

impl VaultCrypto {
    /// Create a VaultCrypto instance with explicit cost parameters.
    pub fn with_params(params: KdfParams) -> Self {
        Self {
            params,
            hash_len: 32, // 256 bits for AES-256
            salt_len: 16, // 128 bits
            nonce_size: 12, // 96 bits (GCM standard)
        }
    }

    /// Generate a new random salt.
    pub fn generate_salt(&self) -> Vec<u8> {
        let mut salt = vec![0u8; self.salt_len];
        OsRng.fill_bytes(&mut salt);
        salt
    }

    /// Encode bytes as base64 for storage in the database file.
    pub fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    /// Decode base64 from the database file.
    pub fn decode(value: &str) -> Result<Vec<u8>, CryptoError> {
        STANDARD.decode(value).map_err(|_| CryptoError::InvalidBase64)
    }

    /// Derive encryption key from password using Argon2id.
    /// Returns a key that will be automatically zeroed on drop.
    pub fn derive_key(&self, password: &str, salt: &[u8]) -> Result<DerivedKey, CryptoError> {
        if salt.len() != self.salt_len {
            return Err(CryptoError::InvalidSaltLength);
        }
        self.params.check()?;

        let params = Params::new(
            self.params.memory_kib,
            self.params.iterations,
            self.params.parallelism,
            Some(self.hash_len),
        )
        .map_err(|_| CryptoError::KeyDerivationFailed)?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let mut output = vec![0u8; self.hash_len];
        argon2
            .hash_password_into(password.as_bytes(), salt, &mut output)
            .map_err(|_| CryptoError::KeyDerivationFailed)?;

        Ok(DerivedKey(output))
    }

    /// Encrypt plaintext with a freshly generated salt and nonce.
    /// Returns tuple of (base64 nonce || ciphertext, salt used).
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<(String, Vec<u8>), CryptoError> {
        let salt = self.generate_salt();
        let key = self.derive_key(password, &salt)?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        // Tag is already appended by AES-GCM
        let mut combined = Vec::with_capacity(nonce.len() + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);

        Ok((STANDARD.encode(&combined), salt))
    }

    /// Decrypt base64-encoded nonce || ciphertext using the provided salt.
    pub fn decrypt(
        &self,
        ciphertext_b64: &str,
        password: &str,
        salt: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let combined = Self::decode(ciphertext_b64)?;

        if combined.len() < self.nonce_size {
            return Err(CryptoError::DecryptionFailed);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(self.nonce_size);
        let nonce = Nonce::from_slice(nonce_bytes);

        let key = self.derive_key(password, salt)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}

/// A derived key that automatically zeroes itself on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    /// Get a reference to the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_crypto() -> VaultCrypto {
        VaultCrypto::with_params(KdfParams::new(1024, 1, 1))
    }

    #[test]
    fn test_salt_generation() {
        let crypto = fast_crypto();
        let salt1 = crypto.generate_salt();
        let salt2 = crypto.generate_salt();

        assert_eq!(salt1.len(), 16);
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn test_encrypt_decrypt() {
        let crypto = fast_crypto();
        let plaintext = br#"{"entries":[]}"#;

        let (ciphertext, salt) = crypto.encrypt(plaintext, "test_password_123").unwrap();
        assert!(!ciphertext.is_empty());

        let decrypted = crypto.decrypt(&ciphertext, "test_password_123", &salt).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_decrypt_wrong_password() {
        let crypto = fast_crypto();
        let (ciphertext, salt) = crypto.encrypt(b"Secret data", "correct_password").unwrap();

        let result = crypto.decrypt(&ciphertext, "wrong_password", &salt);
        assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn test_truncated_ciphertext_is_rejected() {
        let crypto = fast_crypto();
        let salt = crypto.generate_salt();
        let short = VaultCrypto::encode(&[1, 2, 3]);

        assert!(crypto.decrypt(&short, "pw", &salt).is_err());
        assert!(matches!(
            crypto.decrypt("not base64!", "pw", &salt),
            Err(CryptoError::InvalidBase64)
        ));
    }

    #[test]
    fn test_key_derivation_depends_on_params() {
        let salt = fast_crypto().generate_salt();
        let key1 = fast_crypto().derive_key("pw", &salt).unwrap();
        let key2 = fast_crypto().derive_key("pw", &salt).unwrap();
        let key3 = VaultCrypto::with_params(KdfParams::new(2048, 1, 1))
            .derive_key("pw", &salt)
            .unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_ne!(key1.as_bytes(), key3.as_bytes());
    }

    #[test]
    fn test_kdf_params_bounds() {
        assert!(KdfParams::default().check().is_ok());
        assert!(KdfParams::new(1024, 1, 1).check().is_ok());

        for params in [
            KdfParams::new(u32::MAX, 1, 1),
            KdfParams::new(MAX_MEMORY_KIB + 1, 1, 1),
            KdfParams::new(7, 1, 1),
            KdfParams::new(1024, 0, 1),
            KdfParams::new(1024, MAX_ITERATIONS + 1, 1),
            KdfParams::new(1024, 1, 0),
            KdfParams::new(64, 1, 16),
        ] {
            assert!(
                matches!(params.check(), Err(CryptoError::InvalidParams(_))),
                "{params:?} should be rejected"
            );
        }

        let salt = fast_crypto().generate_salt();
        let oversized = VaultCrypto::with_params(KdfParams::new(u32::MAX, 1, 1));
        assert!(matches!(
            oversized.derive_key("pw", &salt),
            Err(CryptoError::InvalidParams(_))
        ));
    }
}
