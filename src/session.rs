//! Session state: the open database plus the I/O capabilities commands use.

use crate::database::PasswordDatabase;
use crate::error::Result;
use std::path::PathBuf;

/// Result of reading one line from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Interrupted,
    Eof,
}

/// Line-oriented user input, including masked secret input.
pub trait LineInput {
    fn read_line(&mut self, prompt: &str) -> Result<Input>;

    /// Read a secret without echo. `None` means end of input.
    fn read_secret(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Entry names offered for completion at the next prompt.
    fn set_entry_names(&mut self, _names: Vec<String>) {}

    fn add_history(&mut self, _line: &str) {}

    /// Release the input resource when the shell stops.
    fn close(&mut self) {}
}

/// Where command output goes.
pub trait OutputSink {
    fn print(&mut self, text: &str);
    fn warn(&mut self, text: &str);
    fn error(&mut self, text: &str);
}

/// Persists the sealed database bytes.
pub trait VaultStore {
    fn write(&mut self, data: &[u8]) -> Result<()>;
}

/// Receives secrets copied by the user.
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// What the shell should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Capabilities wired in by the bootstrap.
pub struct SessionConfig {
    pub file_path: PathBuf,
    pub prompt_text: String,
    pub input: Box<dyn LineInput>,
    pub output: Box<dyn OutputSink>,
    pub store: Box<dyn VaultStore>,
    pub clipboard: Box<dyn Clipboard>,
}

/// An open database together with its configuration.
pub struct Session {
    pub db: PasswordDatabase,
    pub config: SessionConfig,
}

impl Session {
    pub fn new(db: PasswordDatabase, config: SessionConfig) -> Self {
        Self { db, config }
    }

    pub fn print(&mut self, text: &str) {
        self.config.output.print(text);
    }

    pub fn warn(&mut self, text: &str) {
        self.config.output.warn(text);
    }

    /// Read a line, treating interrupt and end of input as a blank answer.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        match self.config.input.read_line(prompt)? {
            Input::Line(line) => Ok(line),
            Input::Interrupted | Input::Eof => Ok(String::new()),
        }
    }

    /// Read a secret; end of input counts as an empty answer.
    pub fn ask_secret(&mut self, prompt: &str) -> Result<String> {
        Ok(self.config.input.read_secret(prompt)?.unwrap_or_default())
    }
}
