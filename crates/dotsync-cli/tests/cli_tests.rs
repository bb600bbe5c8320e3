use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Roots {
    repo: TempDir,
    home: TempDir,
}

impl Roots {
    fn new(manifest: &str) -> Self {
        let repo = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(repo.path().join(".dotpublish"), manifest).unwrap();
        Self { repo, home }
    }

    fn write_repo(&self, rel_path: &str, content: &str) {
        write(&self.repo.path().join(rel_path), content);
    }

    fn write_home(&self, rel_path: &str, content: &str) {
        write(&self.home.path().join(rel_path), content);
    }

    /// `dotsync` pointed at these roots with config files disabled
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dotsync").unwrap();
        cmd.env_remove("DOTSYNC_REPOSITORY")
            .env_remove("DOTSYNC_HOME")
            .env_remove("RUST_LOG")
            .arg("--no-config")
            .arg("--repository")
            .arg(self.repo.path())
            .arg("--home")
            .arg(self.home.path());
        cmd
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Make `newer` strictly newer than `older`
fn age(older: &Path, newer: &Path) {
    let now = SystemTime::now();
    fs::File::open(older)
        .unwrap()
        .set_modified(now - Duration::from_secs(3600))
        .unwrap();
    fs::File::open(newer).unwrap().set_modified(now).unwrap();
}

#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dotfile Synchronization Tool"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("pull"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("diff"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_for_subcommands() {
    for subcommand in &["push", "pull", "status", "diff", "config"] {
        let mut cmd = Command::cargo_bin("dotsync").unwrap();
        cmd.args([subcommand, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

#[test]
fn test_unknown_subcommand() {
    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.arg("unknown")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_no_subcommand() {
    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_force_and_skip_existing_conflict() {
    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.args(["push", "--force", "--skip-existing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_pull_has_no_skip_existing() {
    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.args(["pull", "--skip-existing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn test_config_and_no_config_conflict() {
    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.args(["--config", "dotsync.toml", "--no-config", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_push_publishes_entries() {
    let roots = Roots::new("# tracked dotfiles\nbashrc\nconfig/nvim\n");
    roots.write_repo("bashrc", "export EDITOR=nvim\n");
    roots.write_repo("config/nvim/init.lua", "vim.o.number = true\n");

    roots
        .cmd()
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied:    2"))
        .stdout(predicate::str::contains("✓ Success"));

    assert_eq!(
        fs::read_to_string(roots.home.path().join(".bashrc")).unwrap(),
        "export EDITOR=nvim\n"
    );
    assert!(roots.home.path().join(".config/nvim/init.lua").is_file());
}

#[test]
fn test_push_conflict_exits_nonzero() {
    let roots = Roots::new("bashrc\n");
    roots.write_repo("bashrc", "repo version\n");
    roots.write_home(".bashrc", "local edits\n");
    age(
        &roots.repo.path().join("bashrc"),
        &roots.home.path().join(".bashrc"),
    );

    roots
        .cmd()
        .arg("push")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Conflicts: 1"))
        .stdout(predicate::str::contains("--skip-existing"));

    assert_eq!(
        fs::read_to_string(roots.home.path().join(".bashrc")).unwrap(),
        "local edits\n"
    );
}

#[test]
fn test_push_force_overwrites() {
    let roots = Roots::new("bashrc\n");
    roots.write_repo("bashrc", "repo version\n");
    roots.write_home(".bashrc", "local edits\n");
    age(
        &roots.repo.path().join("bashrc"),
        &roots.home.path().join(".bashrc"),
    );

    roots
        .cmd()
        .args(["push", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replaced:  1"));

    assert_eq!(
        fs::read_to_string(roots.home.path().join(".bashrc")).unwrap(),
        "repo version\n"
    );
}

#[test]
fn test_pull_captures_home_edits() {
    let roots = Roots::new("vimrc\n");
    roots.write_repo("vimrc", "set number\n");
    roots.write_home(".vimrc", "set number\nset hidden\n");
    age(
        &roots.repo.path().join("vimrc"),
        &roots.home.path().join(".vimrc"),
    );

    roots.cmd().arg("pull").assert().success();

    assert_eq!(
        fs::read_to_string(roots.repo.path().join("vimrc")).unwrap(),
        "set number\nset hidden\n"
    );
}

#[test]
fn test_dry_run_changes_nothing() {
    let roots = Roots::new("bashrc\n");
    roots.write_repo("bashrc", "export A=1\n");

    roots
        .cmd()
        .args(["--dry-run", "push"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(dry run)"))
        .stdout(predicate::str::contains("Copied:    1"));

    assert!(!roots.home.path().join(".bashrc").exists());
}

#[test]
fn test_missing_manifest_fails() {
    let roots = Roots::new("");
    fs::remove_file(roots.repo.path().join(".dotpublish")).unwrap();

    roots
        .cmd()
        .arg("push")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest not found"));
}

#[test]
fn test_status_lists_entries() {
    let roots = Roots::new("bashrc\nvimrc\n");
    roots.write_repo("bashrc", "same\n");
    roots.write_home(".bashrc", "same\n");
    roots.write_repo("vimrc", "set number\n");

    roots
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("in sync"))
        .stdout(predicate::str::contains("destination missing"))
        .stdout(predicate::str::contains("2 entries, 1 out of sync"));

    assert!(!roots.home.path().join(".vimrc").exists());
}

#[test]
fn test_diff_shows_changed_lines() {
    let roots = Roots::new("bashrc\n");
    roots.write_repo("bashrc", "export EDITOR=nvim\n");
    roots.write_home(".bashrc", "export EDITOR=vim\n");

    roots
        .cmd()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== bashrc ==="))
        .stdout(predicate::str::contains("-export EDITOR=vim"))
        .stdout(predicate::str::contains("+export EDITOR=nvim"));
}

#[test]
fn test_diff_lists_directory_changes() {
    let roots = Roots::new("config/nvim\n");
    roots.write_repo("config/nvim/init.lua", "-- new\n");
    roots.write_repo("config/nvim/lua/plugins.lua", "return {}\n");
    roots.write_home(".config/nvim/init.lua", "-- old\n");

    roots
        .cmd()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== config/nvim ==="))
        .stdout(predicate::str::contains("paths differ"))
        .stdout(predicate::str::contains("~ init.lua"));
}

#[test]
fn test_diff_without_changes() {
    let roots = Roots::new("bashrc\n");
    roots.write_repo("bashrc", "same\n");
    roots.write_home(".bashrc", "same\n");

    roots
        .cmd()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("No differences"));
}

#[test]
fn test_config_prints_resolved_locations() {
    let roots = Roots::new("");

    roots
        .cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("repository ="))
        .stdout(predicate::str::contains("manifest = \".dotpublish\""));
}

#[test]
fn test_config_file_overrides_manifest_name() {
    let roots = Roots::new("");
    fs::write(roots.repo.path().join("dotfiles.list"), "bashrc\n").unwrap();
    roots.write_repo("bashrc", "export A=1\n");
    let config = roots.repo.path().join("dotsync.toml");
    fs::write(&config, "manifest = \"dotfiles.list\"\n").unwrap();

    let mut cmd = Command::cargo_bin("dotsync").unwrap();
    cmd.env_remove("DOTSYNC_REPOSITORY")
        .env_remove("DOTSYNC_HOME")
        .arg("--config")
        .arg(&config)
        .arg("--repository")
        .arg(roots.repo.path())
        .arg("--home")
        .arg(roots.home.path())
        .arg("push")
        .assert()
        .success();

    assert!(roots.home.path().join(".bashrc").is_file());
}
