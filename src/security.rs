//! Security features including clipboard operations.

use crate::error::{Result, VaultError};
use crate::session::Clipboard;
use copypasta::{ClipboardContext, ClipboardProvider};

/// The desktop clipboard.
#[derive(Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn context() -> Result<ClipboardContext> {
        ClipboardContext::new().map_err(|_| VaultError::ClipboardFailed)
    }

    #[cfg(test)]
    fn get_contents(&self) -> Result<String> {
        Self::context()?
            .get_contents()
            .map_err(|_| VaultError::ClipboardFailed)
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        Self::context()?
            .set_contents(text.to_string())
            .map_err(|_| VaultError::ClipboardFailed)
    }
}

/// Check if running with appropriate permissions.
pub fn check_permissions() -> Vec<String> {
    let mut warnings = Vec::new();

    #[cfg(unix)]
    {
        if unsafe { libc::geteuid() } == 0 {
            warnings.push("Running as root is not recommended".to_string());
        }
    }

    warnings
}
