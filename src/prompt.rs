//! Interactive prompts for policy fields and new passphrases.

use crate::error::{Result, VaultError};
use crate::models::PasswordPolicy;
use crate::session::{LineInput, Session};
use zeroize::Zeroizing;

/// Read an optional length. A blank answer leaves the field unset; an answer
/// that is not a number also leaves it unset, with a warning.
pub fn prompt_length(session: &mut Session, prompt: &str) -> Result<Option<u32>> {
    let answer = session.ask(prompt)?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }

    match answer.parse::<u32>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            session.warn("Could not parse value. Using default");
            Ok(None)
        }
    }
}

/// Read an optional yes/no answer: `y` is true, `n` is false, anything else
/// leaves the field unset.
pub fn prompt_flag(session: &mut Session, prompt: &str) -> Result<Option<bool>> {
    let answer = session.ask(prompt)?;
    Ok(match answer.trim().to_lowercase().as_str() {
        "y" => Some(true),
        "n" => Some(false),
        _ => None,
    })
}

/// Collect a complete replacement policy. Every field is asked for and a
/// blank answer clears it, whatever `seed` held before.
pub fn prompt_policy(session: &mut Session, seed: PasswordPolicy) -> Result<PasswordPolicy> {
    let mut policy = seed;
    policy.length = prompt_length(session, "Length: ")?;
    policy.use_lowercase = prompt_flag(session, "Use Lowercase [y/n]: ")?;
    policy.use_uppercase = prompt_flag(session, "Use Uppercase [y/n]: ")?;
    policy.use_numbers = prompt_flag(session, "Use Numbers [y/n]: ")?;
    policy.use_special = prompt_flag(session, "Use Special characters [y/n]: ")?;
    Ok(policy)
}

/// Ask for a new passphrase twice. Rejects blank and mismatched answers.
pub fn read_new_passphrase(
    input: &mut dyn LineInput,
    prompt: &str,
    confirm_prompt: &str,
) -> Result<Zeroizing<String>> {
    let first = Zeroizing::new(input.read_secret(prompt)?.unwrap_or_default());
    let second = Zeroizing::new(input.read_secret(confirm_prompt)?.unwrap_or_default());

    if first.trim().is_empty() {
        return Err(VaultError::EmptyPassword);
    }
    if *first != *second {
        return Err(VaultError::PasswordMismatch);
    }

    Ok(first)
}
