//! Interactive shell over an open password database.

use crate::error::VaultError;
use crate::router;
use crate::session::{Input, Outcome, Session};
use tracing::debug;

/// Consecutive failed reads tolerated before the input is treated as closed.
pub const MAX_READ_ERRORS: usize = 3;

/// Reads commands line by line until `exit` succeeds.
pub struct InteractiveShell {
    session: Session,
}

impl InteractiveShell {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Run the interactive loop.
    ///
    /// Ctrl-C behaves like typing `exit`. End of input also runs `exit`, but
    /// stops the loop even when unsaved changes make `exit` refuse. A failed
    /// read is reported and the prompt shown again; after
    /// `MAX_READ_ERRORS` failures in a row the input counts as closed.
    pub fn run(&mut self) {
        let mut read_errors = 0;
        loop {
            let names = self
                .session
                .db
                .entries()
                .iter()
                .map(|entry| entry.name.clone())
                .collect();
            self.session.config.input.set_entry_names(names);

            let prompt = self.session.config.prompt_text.clone();
            let input = match self.session.config.input.read_line(&prompt) {
                Ok(input) => {
                    read_errors = 0;
                    input
                }
                Err(e) => {
                    self.session.config.output.error(&e.to_string());
                    read_errors += 1;
                    if read_errors < MAX_READ_ERRORS {
                        continue;
                    }
                    Input::Eof
                }
            };

            match input {
                Input::Line(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.session.config.input.add_history(&line);
                    if self.execute(&line) == Outcome::Exit {
                        break;
                    }
                }
                Input::Interrupted => {
                    if self.execute("exit") == Outcome::Exit {
                        break;
                    }
                }
                Input::Eof => {
                    if self.execute("exit") == Outcome::Continue {
                        self.session
                            .warn("Input closed. Unsaved changes were discarded.");
                    }
                    break;
                }
            }
        }

        debug!("leaving interactive shell");
        self.session.config.input.close();
    }

    /// Tokenize and run one line. Errors are reported, never propagated.
    pub fn execute(&mut self, line: &str) -> Outcome {
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                let err = VaultError::Parse(e.to_string());
                self.session.config.output.error(&err.to_string());
                return Outcome::Continue;
            }
        };

        match router::run_command(&mut self.session, &tokens) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.session.config.output.error(&e.to_string());
                Outcome::Continue
            }
        }
    }
}
