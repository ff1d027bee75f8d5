//! Data models for the password database.

use serde::{Deserialize, Serialize};

/// Length used when neither an entry nor the database sets one.
pub const BUILTIN_LENGTH: u32 = 32;

/// Longest password a policy may ask for.
pub const MAX_LENGTH: u32 = 1024;

/// Password generation rules. Every field is independently optional; an
/// unset field falls back to the next policy layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_lowercase: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_uppercase: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_numbers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_special: Option<bool>,
}

impl PasswordPolicy {
    /// The engine's built-in rules, with every field set.
    pub fn builtin() -> Self {
        Self {
            length: Some(BUILTIN_LENGTH),
            use_lowercase: Some(true),
            use_uppercase: Some(true),
            use_numbers: Some(true),
            use_special: Some(true),
        }
    }

    /// Check if no field is set.
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    /// Fill unset fields from `fallback`, field by field.
    pub fn or(self, fallback: PasswordPolicy) -> PasswordPolicy {
        PasswordPolicy {
            length: self.length.or(fallback.length),
            use_lowercase: self.use_lowercase.or(fallback.use_lowercase),
            use_uppercase: self.use_uppercase.or(fallback.use_uppercase),
            use_numbers: self.use_numbers.or(fallback.use_numbers),
            use_special: self.use_special.or(fallback.use_special),
        }
    }
}

/// A single named secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordEntry {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub policy_override: PasswordPolicy,
}

impl PasswordEntry {
    /// Create a new entry with an all-unset policy override.
    pub fn new(name: impl Into<String>, password: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            description: description.into(),
            policy_override: PasswordPolicy::default(),
        }
    }
}

/// The decrypted payload of a database file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultData {
    pub default_policy: PasswordPolicy,
    #[serde(default)]
    pub entries: Vec<PasswordEntry>,
}

impl Default for VaultData {
    fn default() -> Self {
        Self {
            default_policy: PasswordPolicy::builtin(),
            entries: Vec::new(),
        }
    }
}
