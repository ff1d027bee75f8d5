//! Database-wide commands: master password, default policy, save, exit, help.

use crate::error::Result;
use crate::policy;
use crate::prompt;
use crate::router;
use crate::session::{Outcome, Session};
use clap::ArgMatches;
use tracing::info;

pub fn change_master_password(session: &mut Session, _args: &ArgMatches) -> Result<Outcome> {
    let passphrase = prompt::read_new_passphrase(
        session.config.input.as_mut(),
        "New master password: ",
        "Confirm new password: ",
    )?;

    session.db.set_password(&passphrase);
    session.print("Master password changed. Please save the database to use the new password.");
    Ok(Outcome::Continue)
}

pub fn view_default_policy(session: &mut Session, _args: &ArgMatches) -> Result<Outcome> {
    let default = session.db.default_policy();
    for line in policy::describe_default_policy(&default) {
        session.print(&line);
    }
    Ok(Outcome::Continue)
}

pub fn change_default_policy(session: &mut Session, _args: &ArgMatches) -> Result<Outcome> {
    session.print("Enter new policy values (leave blank to use the built-in value)");
    let seed = session.db.default_policy();
    let policy = prompt::prompt_policy(session, seed)?;

    session.db.set_default_policy(policy)?;
    session.print("Default policy updated");
    Ok(Outcome::Continue)
}

pub fn save(session: &mut Session, _args: &ArgMatches) -> Result<Outcome> {
    let bytes = session.db.save()?;
    session.config.store.write(&bytes)?;

    let path = session.config.file_path.display().to_string();
    info!(path = %path, "saved password database");
    session.print(&format!("Password database saved to {path}"));
    Ok(Outcome::Continue)
}

pub fn exit(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    if session.db.is_modified() && !args.get_flag("force") {
        session.print(
            "Unsaved changes detected. Please save your password database using \"save\", \
             or exit without saving using the \"-f\" option",
        );
        return Ok(Outcome::Continue);
    }
    Ok(Outcome::Exit)
}

pub fn help(session: &mut Session, args: &ArgMatches) -> Result<Outcome> {
    let path: Vec<String> = args
        .get_many::<String>("command")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    for line in router::help_text(&path)?.lines() {
        session.print(line.trim_end());
    }
    Ok(Outcome::Continue)
}
