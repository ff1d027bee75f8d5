//! Command tree and dispatch.
//!
//! The shell's commands form a `clap::Command` tree parsed without a binary
//! name. Groups require a sub-command; leaves map to a handler through their
//! canonical path, so aliases resolve before dispatch.

use crate::admin;
use crate::entries;
use crate::error::{Result, VaultError};
use crate::session::{Outcome, Session};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

pub type Handler = fn(&mut Session, &ArgMatches) -> Result<Outcome>;

fn group(name: &'static str, alias: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .visible_alias(alias)
        .about(about)
        .subcommand_required(true)
        .disable_help_subcommand(true)
}

fn entry_name() -> Arg {
    Arg::new("name").value_name("NAME").help("Name of the entry")
}

/// The full command tree of the shell.
pub fn command_tree() -> Command {
    Command::new("passu")
        .no_binary_name(true)
        .subcommand_required(true)
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("change-master-password")
                .visible_alias("cmp")
                .about("Change database password"),
        )
        .subcommand(
            group("default-policy", "dp", "View or change the default password policy")
                .subcommand(Command::new("view").visible_alias("v").about("View default policy"))
                .subcommand(Command::new("change").visible_alias("c").about("Change default policy")),
        )
        .subcommand(password_commands())
        .subcommand(Command::new("save").about("Save the password database to file"))
        .subcommand(
            Command::new("exit")
                .visible_alias("quit")
                .about("Exit prompt")
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Force exit without saving"),
                ),
        )
        .subcommand(
            Command::new("help")
                .visible_aliases(["h", "?"])
                .about("Show available commands")
                .arg(Arg::new("command").num_args(1..).value_name("COMMAND")),
        )
}

fn password_commands() -> Command {
    group("passwords", "pw", "Manage password entries")
        .subcommand(Command::new("list").visible_alias("l").about("List password entries"))
        .subcommand(
            Command::new("new")
                .visible_alias("n")
                .about("Create new password entry")
                .arg(entry_name())
                .arg(Arg::new("description").value_name("DESCRIPTION")),
        )
        .subcommand(
            Command::new("show")
                .visible_alias("s")
                .about("Show password entry")
                .arg(entry_name())
                .arg(
                    Arg::new("pass-only")
                        .short('p')
                        .long("pass-only")
                        .action(ArgAction::SetTrue)
                        .help("Only show password"),
                ),
        )
        .subcommand(
            Command::new("copy")
                .visible_alias("cp")
                .about("Copy password to clipboard")
                .arg(entry_name()),
        )
        .subcommand(
            Command::new("edit")
                .visible_alias("e")
                .about("Edit a password entry")
                .arg(entry_name())
                .arg(
                    Arg::new("new-name")
                        .short('n')
                        .long("new-name")
                        .value_name("NAME")
                        .help("Change name of entry"),
                )
                .arg(
                    Arg::new("description")
                        .short('d')
                        .long("description")
                        .value_name("TEXT")
                        .help("Change description of entry"),
                )
                .arg(
                    Arg::new("change-password")
                        .short('p')
                        .long("change-password")
                        .action(ArgAction::SetTrue)
                        .help("Change password"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .visible_alias("d")
                .about("Delete a password entry")
                .arg(entry_name()),
        )
        .subcommand(
            group("policy", "p", "View or change the password policy of an entry")
                .subcommand(
                    Command::new("view")
                        .visible_alias("v")
                        .about("Show password policy of entry")
                        .arg(entry_name()),
                )
                .subcommand(
                    Command::new("change")
                        .visible_alias("c")
                        .about("Change password policy of entry")
                        .arg(entry_name()),
                ),
        )
}

fn handler_for(path: &[&str]) -> Option<Handler> {
    let handler: Handler = match path {
        ["change-master-password"] => admin::change_master_password,
        ["default-policy", "view"] => admin::view_default_policy,
        ["default-policy", "change"] => admin::change_default_policy,
        ["passwords", "list"] => entries::list,
        ["passwords", "new"] => entries::create,
        ["passwords", "show"] => entries::show,
        ["passwords", "copy"] => entries::copy,
        ["passwords", "edit"] => entries::edit,
        ["passwords", "delete"] => entries::delete,
        ["passwords", "policy", "view"] => entries::view_policy,
        ["passwords", "policy", "change"] => entries::change_policy,
        ["save"] => admin::save,
        ["exit"] => admin::exit,
        ["help"] => admin::help,
        _ => return None,
    };
    Some(handler)
}

/// First line of a clap error, without the `error: ` prefix.
fn dispatch_error(err: clap::Error) -> VaultError {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    VaultError::Dispatch(first.trim_start_matches("error: ").to_string())
}

/// A required positional argument. Missing ones are reported by the handler
/// rather than by clap, so the error names the argument.
pub fn required<'a>(matches: &'a ArgMatches, id: &'static str) -> Result<&'a str> {
    optional(matches, id).ok_or(VaultError::MissingArgument(id))
}

pub fn optional<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a str> {
    matches.get_one::<String>(id).map(String::as_str)
}

/// Run one tokenized command against the session.
pub fn run_command(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let tree = command_tree();
    if let Some(first) = tokens.first() {
        if tree.find_subcommand(first).is_none() {
            return Err(VaultError::Dispatch(format!(
                "Unknown command '{first}'. Type 'help' for available commands."
            )));
        }
    }

    let matches = match tree.try_get_matches_from(tokens) {
        Ok(matches) => matches,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            for line in err.render().to_string().lines() {
                session.print(line.trim_end());
            }
            return Ok(Outcome::Continue);
        }
        Err(err) => return Err(dispatch_error(err)),
    };

    let mut path = Vec::new();
    let mut leaf = &matches;
    while let Some((name, sub)) = leaf.subcommand() {
        path.push(name);
        leaf = sub;
    }

    let handler = handler_for(&path)
        .ok_or_else(|| VaultError::Dispatch(format!("No handler for '{}'", path.join(" "))))?;
    debug!(command = %path.join(" "), "dispatching");
    handler(session, leaf)
}

/// Rendered help for the command named by `path`, or the whole tree.
pub fn help_text(path: &[String]) -> Result<String> {
    let mut root = command_tree();
    root.build();

    let mut command = &mut root;
    for token in path {
        command = command
            .find_subcommand_mut(token)
            .ok_or_else(|| VaultError::Dispatch(format!("Unknown command '{token}'")))?;
    }
    Ok(command.render_help().to_string())
}

/// Completion candidates for the word ending at the end of `line`.
///
/// Returns the byte offset where that word starts. Command positions complete
/// names and aliases; the entry-name position of entry commands completes
/// from `entry_names`.
pub fn completions(line: &str, entry_names: &[String]) -> (usize, Vec<String>) {
    let start = line
        .rfind(char::is_whitespace)
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let word = &line[start..];
    let before: Vec<&str> = line[..start].split_whitespace().collect();

    let tree = command_tree();
    let mut command = &tree;
    let mut rest = before.as_slice();
    while let Some((first, tail)) = rest.split_first() {
        match command.find_subcommand(first) {
            Some(sub) => {
                command = sub;
                rest = tail;
            }
            None => break,
        }
    }

    let mut candidates: Vec<String> = if command.has_subcommands() {
        if !rest.is_empty() {
            return (start, Vec::new());
        }
        command
            .get_subcommands()
            .flat_map(|sub| std::iter::once(sub.get_name()).chain(sub.get_visible_aliases()))
            .filter(|name| name.starts_with(word))
            .map(str::to_string)
            .collect()
    } else {
        let takes_entry = command.get_name() != "new"
            && command.get_arguments().any(|arg| arg.get_id() == "name");
        let positional_given = rest.iter().any(|token| !token.starts_with('-'));
        if !takes_entry || positional_given || word.starts_with('-') {
            return (start, Vec::new());
        }
        entry_names
            .iter()
            .filter(|name| name.starts_with(word))
            .cloned()
            .collect()
    };

    candidates.sort();
    candidates.dedup();
    (start, candidates)
}
