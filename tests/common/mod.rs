// Shared in-memory capabilities for driving the shell in tests.
#![allow(dead_code)]

use passu::crypto::KdfParams;
use passu::session::{Clipboard, Input, LineInput, OutputSink, VaultStore};
use passu::{Outcome, PasswordDatabase, PasswordEntry, Result, Session, SessionConfig, VaultError};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;

pub const PROMPT: &str = "test> ";
pub const MASTER: &str = "testpassword";

/// A database with cheap key derivation.
pub fn fast_db() -> PasswordDatabase {
    PasswordDatabase::with_kdf(MASTER, fast_kdf())
}

pub fn fast_kdf() -> KdfParams {
    KdfParams::new(1024, 1, 1)
}

pub fn db_with_entry_named(name: &str) -> PasswordDatabase {
    let mut db = fast_db();
    db.add_entry(PasswordEntry::new(name, "mypassword", "description"))
        .unwrap();
    db
}

/// Canned user input: main prompt lines in order, fixed answers per
/// sub-prompt, and masked secrets in order.
#[derive(Default)]
pub struct Script {
    pub lines: Vec<Input>,
    pub answers: Vec<(&'static str, &'static str)>,
    pub secrets: Vec<Option<&'static str>>,
    pub clipboard_fails: bool,
    /// Main prompt reads that fail before `lines` are served.
    pub read_errors: usize,
}

impl Script {
    pub fn lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| Input::Line(l.to_string())).collect(),
            ..Default::default()
        }
    }

    pub fn secrets(secrets: &[&'static str]) -> Self {
        Self {
            secrets: secrets.iter().map(|s| Some(*s)).collect(),
            ..Default::default()
        }
    }

    pub fn answers(answers: &[(&'static str, &'static str)]) -> Self {
        Self {
            answers: answers.to_vec(),
            ..Default::default()
        }
    }
}

/// Shared views into what the session did.
#[derive(Clone, Default)]
pub struct Handles {
    pub output: Rc<RefCell<Vec<String>>>,
    pub prompts: Rc<RefCell<Vec<String>>>,
    pub history: Rc<RefCell<Vec<String>>>,
    pub stored: Rc<RefCell<Vec<Vec<u8>>>>,
    pub clipboard: Rc<RefCell<Option<String>>>,
    pub closed: Rc<Cell<bool>>,
    /// Entry names offered for completion before each main prompt.
    pub completion_names: Rc<RefCell<Vec<Vec<String>>>>,
}

impl Handles {
    pub fn output(&self) -> String {
        self.output.borrow().join("\n")
    }

    pub fn clear_output(&self) {
        self.output.borrow_mut().clear();
    }
}

struct ScriptedInput {
    lines: VecDeque<Input>,
    answers: HashMap<&'static str, &'static str>,
    secrets: VecDeque<Option<&'static str>>,
    read_errors: usize,
    handles: Handles,
}

impl LineInput for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        self.handles.prompts.borrow_mut().push(prompt.to_string());
        if prompt == PROMPT {
            if self.read_errors > 0 {
                self.read_errors -= 1;
                return Err(VaultError::Readline("terminal went away".to_string()));
            }
            return Ok(self.lines.pop_front().unwrap_or(Input::Eof));
        }
        let answer = self.answers.get(prompt).copied().unwrap_or_default();
        Ok(Input::Line(answer.to_string()))
    }

    fn read_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        self.handles.prompts.borrow_mut().push(prompt.to_string());
        Ok(self
            .secrets
            .pop_front()
            .flatten()
            .map(|secret| secret.to_string()))
    }

    fn set_entry_names(&mut self, names: Vec<String>) {
        self.handles.completion_names.borrow_mut().push(names);
    }

    fn add_history(&mut self, line: &str) {
        self.handles.history.borrow_mut().push(line.to_string());
    }

    fn close(&mut self) {
        self.handles.closed.set(true);
    }
}

struct CapturedOutput(Handles);

impl OutputSink for CapturedOutput {
    fn print(&mut self, text: &str) {
        self.0.output.borrow_mut().push(text.to_string());
    }

    fn warn(&mut self, text: &str) {
        self.0.output.borrow_mut().push(format!("Warning: {text}"));
    }

    fn error(&mut self, text: &str) {
        self.0.output.borrow_mut().push(format!("ERROR: {text}"));
    }
}

struct MemoryStore(Handles);

impl VaultStore for MemoryStore {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.0.stored.borrow_mut().push(data.to_vec());
        Ok(())
    }
}

struct MemoryClipboard {
    handles: Handles,
    fails: bool,
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        if self.fails {
            return Err(VaultError::ClipboardFailed);
        }
        *self.handles.clipboard.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub session: Session,
    pub io: Handles,
}

impl Harness {
    pub fn new(db: PasswordDatabase, script: Script) -> Self {
        let io = Handles::default();
        let input = ScriptedInput {
            lines: script.lines.into_iter().collect(),
            answers: script.answers.into_iter().collect(),
            secrets: script.secrets.into_iter().collect(),
            read_errors: script.read_errors,
            handles: io.clone(),
        };
        let config = SessionConfig {
            file_path: PathBuf::from("/tmp/test.db"),
            prompt_text: PROMPT.to_string(),
            input: Box::new(input),
            output: Box::new(CapturedOutput(io.clone())),
            store: Box::new(MemoryStore(io.clone())),
            clipboard: Box::new(MemoryClipboard {
                handles: io.clone(),
                fails: script.clipboard_fails,
            }),
        };
        Self {
            session: Session::new(db, config),
            io,
        }
    }

    /// Run one command, as in one-shot mode without the final save.
    pub fn run(&mut self, tokens: &[&str]) -> Result<Outcome> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        passu::run_command(&mut self.session, &tokens)
    }

    pub fn output(&self) -> String {
        self.io.output()
    }
}
