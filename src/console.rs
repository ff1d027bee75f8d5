//! Terminal-backed implementations of the session capabilities.

use crate::error::{Result, VaultError};
use crate::router;
use crate::session::{Input, LineInput, OutputSink, VaultStore};
use crate::utils;
use colored::*;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Tab completion of command names, aliases and entry names.
#[derive(Default)]
pub struct ShellHelper {
    entry_names: Vec<String>,
}

impl Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(router::completions(&line[..pos], &self.entry_names))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Line editing with history and completion via rustyline; secrets via
/// rpassword.
pub struct TerminalInput {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl TerminalInput {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::new()
            .map_err(|e| VaultError::Readline(format!("Failed to create editor: {e}")))?;
        editor.set_helper(Some(ShellHelper::default()));
        Ok(Self { editor })
    }
}

impl LineInput for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(VaultError::Readline(err.to_string())),
        }
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        match rpassword::prompt_password(prompt) {
            Ok(secret) => Ok(Some(secret)),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(VaultError::Io(err)),
        }
    }

    fn set_entry_names(&mut self, names: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.entry_names = names;
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn close(&mut self) {
        let _ = self.editor.clear_history();
    }
}

/// Plain stdout output with colored warnings and errors.
#[derive(Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn print(&mut self, text: &str) {
        println!("{text}");
    }

    fn warn(&mut self, text: &str) {
        utils::warning(text);
    }

    fn error(&mut self, text: &str) {
        eprintln!("{} {}", "ERROR:".red(), text);
    }
}

/// Writes the sealed database to its file atomically.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VaultStore for FileStore {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Temp file in the same directory so the rename stays on one filesystem
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o600))?;
        }

        temp.persist(&self.path).map_err(|e| VaultError::Io(e.error))?;
        Ok(())
    }
}
