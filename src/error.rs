//! Error types for passu.

use thiserror::Error;

/// Main error type for database and command operations.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Missing {0} argument")]
    MissingArgument(&'static str),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Entry already exists: {0}")]
    EntryExists(String),

    #[error("Invalid entry name '{0}': only letters, numbers and dashes are allowed")]
    InvalidName(String),

    #[error("Invalid password policy: {0}")]
    InvalidPolicy(String),

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0}")]
    Dispatch(String),

    #[error("Could not parse input: {0}")]
    Parse(String),

    #[error("Decryption failed - incorrect password or corrupted file")]
    DecryptionFailed,

    #[error("Invalid password file: {0}")]
    InvalidVaultFile(String),

    #[error("Clipboard operation failed")]
    ClipboardFailed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error("Input error: {0}")]
    Readline(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;
