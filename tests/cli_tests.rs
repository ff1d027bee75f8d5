// End-to-end runs of the passu binary in one-shot mode.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MASTER: &str = "clipassword";

fn passu(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("passu").unwrap();
    cmd.current_dir(dir.path())
        .env("PASSU_MASTER_PASSWORD", MASTER)
        .args(["--no-color", "--kdf-memory-kib", "1024", "--kdf-iterations", "1"]);
    cmd
}

#[test]
fn test_requires_vault_file() {
    Command::cargo_bin("passu")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_creates_database_and_lists_nothing() {
    let dir = TempDir::new().unwrap();

    passu(&dir)
        .args(["vault.db", "pw", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating new password database"))
        .stdout(predicate::str::contains("No entries found"));

    assert!(dir.path().join("vault.db").exists());
}

#[test]
fn test_default_policy_of_new_database() {
    let dir = TempDir::new().unwrap();

    passu(&dir)
        .args(["vault.db", "dp", "view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Length: 32"))
        .stdout(predicate::str::contains(
            "Characters: lowercase, uppercase, numbers, special characters",
        ));
}

#[test]
fn test_wrong_password_fails() {
    let dir = TempDir::new().unwrap();
    passu(&dir).args(["vault.db", "pw", "list"]).assert().success();

    passu(&dir)
        .env("PASSU_MASTER_PASSWORD", "not-the-password")
        .args(["vault.db", "pw", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));
}

#[test]
fn test_unknown_command_fails() {
    let dir = TempDir::new().unwrap();

    passu(&dir)
        .args(["vault.db", "frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command 'frobnicate'"));
}

#[test]
fn test_missing_entry_fails() {
    let dir = TempDir::new().unwrap();

    passu(&dir)
        .args(["vault.db", "pw", "delete", "nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry not found: nothing"));
}

#[test]
fn test_one_shot_changes_are_saved() {
    let dir = TempDir::new().unwrap();
    passu(&dir).args(["vault.db", "pw", "list"]).assert().success();

    passu(&dir)
        .args(["vault.db", "dp", "change"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Password database saved to"));

    passu(&dir)
        .args(["vault.db", "dp", "view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Length: 32\n"));
}
