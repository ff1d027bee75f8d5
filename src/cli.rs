//! Command-line entry: open or create the database, then run one command or
//! the interactive shell.

use crate::admin;
use crate::console::{ConsoleOutput, FileStore, TerminalInput};
use crate::crypto::{KdfParams, MAX_ITERATIONS, MAX_MEMORY_KIB};
use crate::database::PasswordDatabase;
use crate::error::{Result, VaultError};
use crate::interactive::InteractiveShell;
use crate::prompt;
use crate::router;
use crate::security::{self, SystemClipboard};
use crate::session::{LineInput, Session, SessionConfig, VaultStore};
use crate::utils::{self, success, warning};
use anyhow::Context;
use clap::{ArgMatches, Parser};
use std::path::{Path, PathBuf};
use tracing::info;
use zeroize::Zeroizing;

/// Environment variable read instead of prompting for the master password.
pub const MASTER_PASSWORD_ENV: &str = "PASSU_MASTER_PASSWORD";

/// Simple password manager.
#[derive(Parser, Debug)]
#[command(name = "passu", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the password database file
    pub vault_file: PathBuf,

    /// Command to run instead of starting the interactive prompt
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Argon2 memory cost in KiB for newly created databases
    #[arg(
        long,
        default_value_t = KdfParams::default().memory_kib,
        value_parser = clap::value_parser!(u32).range(8..=MAX_MEMORY_KIB as i64)
    )]
    pub kdf_memory_kib: u32,

    /// Argon2 iterations for newly created databases
    #[arg(
        long,
        default_value_t = KdfParams::default().iterations,
        value_parser = clap::value_parser!(u32).range(1..=MAX_ITERATIONS as i64)
    )]
    pub kdf_iterations: u32,
}

impl Cli {
    fn kdf_params(&self) -> KdfParams {
        KdfParams::new(self.kdf_memory_kib, self.kdf_iterations, 1)
    }

    /// Open the database and run the requested command or the shell.
    pub fn execute(&self) -> anyhow::Result<()> {
        for warn in security::check_permissions() {
            warning(&warn);
        }

        let mut input = TerminalInput::new()?;
        let mut store = FileStore::new(&self.vault_file);
        let env_password = std::env::var(MASTER_PASSWORD_ENV).ok().map(Zeroizing::new);

        let db = open_or_create(
            &self.vault_file,
            &mut input,
            &mut store,
            env_password,
            self.kdf_params(),
        )
        .with_context(|| format!("Failed to open {}", self.vault_file.display()))?;

        let config = SessionConfig {
            file_path: self.vault_file.clone(),
            prompt_text: utils::prompt_text(&self.vault_file),
            input: Box::new(input),
            output: Box::new(ConsoleOutput),
            store: Box::new(store),
            clipboard: Box::new(SystemClipboard),
        };
        let mut session = Session::new(db, config);

        if self.command.is_empty() {
            InteractiveShell::new(session).run();
            Ok(())
        } else {
            run_once(&mut session, &self.command)?;
            Ok(())
        }
    }
}

/// Open `path` if it exists, otherwise create and persist an empty database.
///
/// `env_password` replaces the interactive prompts (and the confirmation when
/// creating). `kdf` only applies to a newly created database.
pub fn open_or_create(
    path: &Path,
    input: &mut dyn LineInput,
    store: &mut dyn VaultStore,
    env_password: Option<Zeroizing<String>>,
    kdf: KdfParams,
) -> Result<PasswordDatabase> {
    if path.exists() {
        println!("Opening password file.");
        for warn in utils::check_file_permissions(path) {
            warning(&warn);
        }

        let bytes = std::fs::read(path)?;
        let password = match env_password {
            Some(password) => password,
            None => Zeroizing::new(input.read_secret("Master password: ")?.unwrap_or_default()),
        };

        let db = PasswordDatabase::from_data(&bytes, &password)?;
        info!(path = %path.display(), "password database opened");
        return Ok(db);
    }

    println!("File does not exist. Creating new password database.");
    let password = match env_password {
        Some(password) if password.trim().is_empty() => return Err(VaultError::EmptyPassword),
        Some(password) => password,
        None => prompt::read_new_passphrase(input, "Master password: ", "Confirm password: ")?,
    };

    kdf.check()?;
    let mut db = PasswordDatabase::with_kdf(&password, kdf);
    let bytes = db.save()?;
    store.write(&bytes)?;
    info!(path = %path.display(), "password database created");
    success(&format!("Created {}", path.display()));
    Ok(db)
}

/// Run a single command. A successful command that changed the database is
/// saved before returning, since there is no later chance to `save`.
pub fn run_once(session: &mut Session, tokens: &[String]) -> Result<()> {
    router::run_command(session, tokens)?;

    if session.db.is_modified() {
        admin::save(session, &ArgMatches::default())?;
    }
    Ok(())
}
