//! Random password generation.

use crate::error::{Result, VaultError};
use crate::models::{PasswordPolicy, BUILTIN_LENGTH, MAX_LENGTH};
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMBERS: &str = "0123456789";
const SPECIAL: &str = "!#$%&*+-./:=?@^_~";

/// Build the candidate alphabet for a policy. Unset character classes count
/// as enabled, matching the built-in defaults.
fn charset(policy: &PasswordPolicy) -> Vec<char> {
    let mut chars = String::new();
    if policy.use_lowercase.unwrap_or(true) {
        chars.push_str(LOWERCASE);
    }
    if policy.use_uppercase.unwrap_or(true) {
        chars.push_str(UPPERCASE);
    }
    if policy.use_numbers.unwrap_or(true) {
        chars.push_str(NUMBERS);
    }
    if policy.use_special.unwrap_or(true) {
        chars.push_str(SPECIAL);
    }
    chars.chars().collect()
}

/// Reject a stored length outside `1..=MAX_LENGTH`. Unset is fine.
pub fn check_length(length: Option<u32>) -> Result<()> {
    match length {
        Some(0) => Err(VaultError::InvalidPolicy(
            "length must be greater than 0".to_string(),
        )),
        Some(length) if length > MAX_LENGTH => Err(VaultError::InvalidPolicy(format!(
            "length must be at most {MAX_LENGTH}"
        ))),
        _ => Ok(()),
    }
}

/// Check that `policy` can produce a password, without generating one.
pub fn check(policy: &PasswordPolicy) -> Result<()> {
    check_length(policy.length)?;
    if charset(policy).is_empty() {
        return Err(VaultError::InvalidPolicy(
            "no character classes enabled".to_string(),
        ));
    }
    Ok(())
}

/// Generate a password for an effective policy.
pub fn generate(policy: &PasswordPolicy) -> Result<String> {
    check(policy)?;

    let length = policy.length.unwrap_or(BUILTIN_LENGTH);
    let alphabet = charset(policy);

    let mut rng = OsRng;
    let password = (0..length)
        .filter_map(|_| alphabet.choose(&mut rng).copied())
        .collect();

    Ok(password)
}
