//! passu: an interactive shell for an encrypted password database.

pub mod admin;
pub mod cli;
pub mod console;
pub mod crypto;
pub mod database;
pub mod entries;
pub mod error;
pub mod generator;
pub mod interactive;
pub mod models;
pub mod policy;
pub mod prompt;
pub mod router;
pub mod security;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use database::PasswordDatabase;
pub use error::{Result, VaultError};
pub use models::{PasswordEntry, PasswordPolicy};
pub use router::run_command;
pub use session::{Outcome, Session, SessionConfig};
