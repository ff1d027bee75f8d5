//! Commands operating on individual password entries.

use crate::error::Result;
use crate::models::PasswordEntry;
use crate::policy;
use crate::prompt;
use crate::router::{optional, required};
use crate::session::{Outcome, Session};
use clap::ArgMatches;
use zeroize::Zeroizing;

const PASSWORD_PROMPT: &str = "Password (leave empty to generate): ";

pub fn list(session: &mut Session, _args: &ArgMatches) -> Result<Outcome> {
    let mut names: Vec<String> = session
        .db
        .entries()
        .iter()
        .map(|entry| entry.name.clone())
        .collect();

    if names.is_empty() {
        session.print("No entries found");
        return Ok(Outcome::Continue);
    }

    names.sort();
    for name in &names {
        session.print(name);
    }
    Ok(Outcome::Continue)
}

/// Create an entry. An empty password asks the database to generate one,
/// which is checked against the effective policy before anything is stored.
pub fn create(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    let name = required(args, "name")?;
    let description = optional(args, "description").unwrap_or_default();

    let password = Zeroizing::new(session.ask_secret(PASSWORD_PROMPT)?);
    let entry = PasswordEntry::new(name, password.as_str(), description);
    if password.is_empty() {
        session.db.check_generation(&entry.policy_override)?;
    }
    session.db.add_entry(entry)?;

    if password.is_empty() {
        session.db.generate_password(name)?;
    }

    session.print("Password added");
    Ok(Outcome::Continue)
}

/// Show an entry. Only `--pass-only` prints the secret itself.
pub fn show(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    let name = required(args, "name")?;
    let entry = session.db.entry(name)?;

    let lines = if args.get_flag("pass-only") {
        vec![entry.password.clone()]
    } else {
        let description = if entry.description.is_empty() {
            "No description".to_string()
        } else {
            format!("Description: {}", entry.description)
        };
        vec![
            format!("Name: {}", entry.name),
            format!("Password: ({} characters)", entry.password.chars().count()),
            description,
        ]
    };
    let lines = Zeroizing::new(lines);

    for line in lines.iter() {
        session.print(line);
    }
    Ok(Outcome::Continue)
}

pub fn copy(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    let name = required(args, "name")?;
    let password = Zeroizing::new(session.db.entry(name)?.password.clone());

    session.config.clipboard.copy(&password)?;
    session.print("Password copied to clipboard");
    Ok(Outcome::Continue)
}

/// Apply only the changes that were asked for. The rename is committed
/// before any password generation, so generation targets the new name.
pub fn edit(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    let name = required(args, "name")?;
    let mut entry = session.db.entry(name)?.clone();

    if let Some(new_name) = optional(args, "new-name") {
        entry.name = new_name.to_string();
    }
    if let Some(description) = optional(args, "description") {
        entry.description = description.to_string();
    }

    let change_password = args.get_flag("change-password");
    if change_password {
        entry.password = session.ask_secret(PASSWORD_PROMPT)?;
    }

    let generate = change_password && entry.password.is_empty();
    if generate {
        session.db.check_generation(&entry.policy_override)?;
    }
    let current_name = entry.name.clone();
    session.db.update_entry(name, entry)?;

    if generate {
        session.db.generate_password(&current_name)?;
    }

    session.print("Entry updated");
    Ok(Outcome::Continue)
}

pub fn delete(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    let name = required(args, "name")?;
    session.db.remove_entry(name)?;
    session.print("Entry removed");
    Ok(Outcome::Continue)
}

pub fn view_policy(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    let name = required(args, "name")?;
    let entry = session.db.entry(name)?;
    let lines = policy::describe_entry_policy(&entry.policy_override, &session.db.default_policy());

    for line in &lines {
        session.print(line);
    }
    Ok(Outcome::Continue)
}

/// Replace the entry's override with freshly prompted values. Fields left
/// blank become unset even if they were set before.
// TODO: decide whether blank answers should keep the previous override
// value, as `edit` keeps untouched fields.
pub fn change_policy(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    let name = required(args, "name")?;
    let mut entry = session.db.entry(name)?.clone();

    session.print("Enter new policy values (leave blank to use default)");
    entry.policy_override = prompt::prompt_policy(session, entry.policy_override)?;

    session.db.update_entry(name, entry)?;
    session.print("Entry policy updated");
    Ok(Outcome::Continue)
}
