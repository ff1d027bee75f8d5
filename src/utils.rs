//! Utility functions shared by the shell and the database.

use crate::error::{Result, VaultError};
use colored::*;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

#[cfg(unix)]
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

lazy_static! {
    static ref ENTRY_NAME: Regex = Regex::new(r"^[A-Za-z0-9\-]+$").expect("valid regex");
}

/// Validate an entry name: letters, numbers and dashes only.
pub fn validate_entry_name(name: &str) -> Result<()> {
    if ENTRY_NAME.is_match(name) {
        Ok(())
    } else {
        Err(VaultError::InvalidName(name.to_string()))
    }
}

/// Prompt text for the interactive shell, e.g. `vault.db> `.
pub fn prompt_text(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("{base}> ")
}

/// Check file permissions and return warnings.
pub fn check_file_permissions(path: &Path) -> Vec<String> {
    let mut warnings = Vec::new();

    #[cfg(unix)]
    {
        if let Ok(metadata) = fs::metadata(path) {
            let mode = metadata.permissions().mode();

            // Group or others have any permissions
            if mode & 0o077 != 0 {
                warnings.push(format!(
                    "File has insecure permissions: {:o}. Run 'chmod 600 {}' to fix.",
                    mode & 0o777,
                    path.display()
                ));
            }
        }
    }

    warnings
}

/// Print an error message and exit.
pub fn error_exit(message: &str, code: i32) -> ! {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
    std::process::exit(code);
}

/// Print a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message.
pub fn warning(message: &str) {
    println!("{} {}", "Warning:".yellow(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_entry_name() {
        assert!(validate_entry_name("github").is_ok());
        assert!(validate_entry_name("work-email-2").is_ok());

        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("with space").is_err());
        assert!(validate_entry_name("dots.are.out").is_err());
        assert!(validate_entry_name("ümlaut").is_err());
    }

    #[test]
    fn test_prompt_text_uses_file_name() {
        assert_eq!(prompt_text(&PathBuf::from("/tmp/data/pw.db")), "pw.db> ");
        assert_eq!(prompt_text(&PathBuf::from("local")), "local> ");
    }

    #[cfg(unix)]
    #[test]
    fn test_check_file_permissions() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(check_file_permissions(file.path()).len(), 1);

        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o600)).unwrap();
        assert!(check_file_permissions(file.path()).is_empty());
    }
}
