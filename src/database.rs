//! The encrypted password database: entries, default policy and file sealing.

use crate::crypto::{KdfParams, VaultCrypto};
use crate::error::{Result, VaultError};
use crate::generator;
use crate::models::{PasswordEntry, PasswordPolicy, VaultData};
use crate::policy;
use crate::utils;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroizing;

const FORMAT_VERSION: u32 = 1;

/// On-disk representation of a sealed database.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    kdf: KdfParams,
    salt: String,
    payload: String,
}

/// An opened password database.
pub struct PasswordDatabase {
    data: VaultData,
    passphrase: Zeroizing<String>,
    kdf: KdfParams,
    modified: bool,
}

impl std::fmt::Debug for PasswordDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordDatabase")
            .field("entries", &self.data.entries.len())
            .field("kdf", &self.kdf)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

impl PasswordDatabase {
    /// Create an empty database protected by `passphrase`.
    pub fn new(passphrase: &str) -> Self {
        Self::with_kdf(passphrase, KdfParams::default())
    }

    /// Create an empty database that will be sealed with explicit KDF costs.
    pub fn with_kdf(passphrase: &str, kdf: KdfParams) -> Self {
        Self {
            data: VaultData::default(),
            passphrase: Zeroizing::new(passphrase.to_string()),
            kdf,
            modified: false,
        }
    }

    /// Open a sealed database.
    pub fn from_data(bytes: &[u8], passphrase: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| VaultError::InvalidVaultFile(e.to_string()))?;

        if envelope.version != FORMAT_VERSION {
            return Err(VaultError::InvalidVaultFile(format!(
                "unsupported format version {}",
                envelope.version
            )));
        }

        envelope
            .kdf
            .check()
            .map_err(|e| VaultError::InvalidVaultFile(e.to_string()))?;

        let crypto = VaultCrypto::with_params(envelope.kdf);
        let salt = VaultCrypto::decode(&envelope.salt)?;
        let plaintext = Zeroizing::new(
            crypto
                .decrypt(&envelope.payload, passphrase, &salt)
                .map_err(|_| VaultError::DecryptionFailed)?,
        );

        let data: VaultData = serde_json::from_slice(&plaintext)
            .map_err(|e| VaultError::InvalidVaultFile(e.to_string()))?;

        info!(entries = data.entries.len(), "opened password database");

        Ok(Self {
            data,
            passphrase: Zeroizing::new(passphrase.to_string()),
            kdf: envelope.kdf,
            modified: false,
        })
    }

    /// Seal the database into bytes and clear the modified flag.
    pub fn save(&mut self) -> Result<Vec<u8>> {
        let crypto = VaultCrypto::with_params(self.kdf);
        let plaintext = Zeroizing::new(serde_json::to_vec(&self.data)?);
        let (payload, salt) = crypto.encrypt(&plaintext, &self.passphrase)?;

        let envelope = Envelope {
            version: FORMAT_VERSION,
            kdf: self.kdf,
            salt: VaultCrypto::encode(&salt),
            payload,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;

        self.modified = false;
        info!(bytes = bytes.len(), "sealed password database");
        Ok(bytes)
    }

    /// Change the master passphrase. Takes effect on the next save.
    pub fn set_password(&mut self, passphrase: &str) {
        self.passphrase = Zeroizing::new(passphrase.to_string());
        self.modified = true;
        info!("master password changed");
    }

    /// Check if the database changed since it was opened or last saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn entries(&self) -> &[PasswordEntry] {
        &self.data.entries
    }

    pub fn get_entry(&self, name: &str) -> Option<&PasswordEntry> {
        self.data.entries.iter().find(|entry| entry.name == name)
    }

    /// Look up an entry, failing with `EntryNotFound`.
    pub fn entry(&self, name: &str) -> Result<&PasswordEntry> {
        self.get_entry(name)
            .ok_or_else(|| VaultError::EntryNotFound(name.to_string()))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.data
            .entries
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| VaultError::EntryNotFound(name.to_string()))
    }

    /// Add a new entry. Names must be valid and unique.
    pub fn add_entry(&mut self, entry: PasswordEntry) -> Result<()> {
        utils::validate_entry_name(&entry.name)?;
        generator::check_length(entry.policy_override.length)?;
        if self.get_entry(&entry.name).is_some() {
            return Err(VaultError::EntryExists(entry.name));
        }

        debug!(name = %entry.name, "adding entry");
        self.data.entries.push(entry);
        self.modified = true;
        Ok(())
    }

    /// Replace the entry currently called `name`. The replacement may carry a
    /// new name, which must not collide with another entry.
    pub fn update_entry(&mut self, name: &str, entry: PasswordEntry) -> Result<()> {
        let idx = self.position(name)?;
        generator::check_length(entry.policy_override.length)?;

        if entry.name != name {
            utils::validate_entry_name(&entry.name)?;
            if self.get_entry(&entry.name).is_some() {
                return Err(VaultError::EntryExists(entry.name));
            }
            debug!(from = name, to = %entry.name, "renaming entry");
        }

        debug!(name = %entry.name, "updating entry");
        self.data.entries[idx] = entry;
        self.modified = true;
        Ok(())
    }

    /// Remove an entry and return it.
    pub fn remove_entry(&mut self, name: &str) -> Result<PasswordEntry> {
        let idx = self.position(name)?;
        let removed = self.data.entries.remove(idx);
        debug!(name, "removed entry");
        self.modified = true;
        Ok(removed)
    }

    pub fn default_policy(&self) -> PasswordPolicy {
        self.data.default_policy
    }

    /// Replace the default policy wholesale.
    pub fn set_default_policy(&mut self, policy: PasswordPolicy) -> Result<()> {
        generator::check_length(policy.length)?;

        self.data.default_policy = policy;
        self.modified = true;
        debug!(?policy, "default policy replaced");
        Ok(())
    }

    /// Check that generation would succeed for an entry carrying `policy_override`.
    pub fn check_generation(&self, policy_override: &PasswordPolicy) -> Result<()> {
        generator::check(&policy::effective(policy_override, &self.data.default_policy))
    }

    /// Generate and store a new password for `name` using its effective policy.
    pub fn generate_password(&mut self, name: &str) -> Result<&PasswordEntry> {
        let idx = self.position(name)?;
        let effective = policy::effective(
            &self.data.entries[idx].policy_override,
            &self.data.default_policy,
        );
        let password = generator::generate(&effective)?;

        let entry = &mut self.data.entries[idx];
        entry.password = password;
        self.modified = true;
        debug!(name, "generated password");
        Ok(&*entry)
    }
}
