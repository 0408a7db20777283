use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use gitk_graph::git::log_format;
use gitk_graph::GraphConfig;

/// Config reading `|`-separated logs, as written by [`log_line`].
pub fn pipe_config() -> GraphConfig {
    GraphConfig {
        delimiter: '|',
        ..GraphConfig::default()
    }
}

/// One `|`-separated record.
pub fn log_line(hash: &str, parents: &[&str], author: &str, timestamp: i64, subject: &str, refs: &str) -> String {
    format!("{}|{}|{}|{}|{}|{}", hash, parents.join(" "), author, timestamp, subject, refs)
}

/// A feature branch merged back into main:
///
/// ```text
/// m    merge (main)
/// |\
/// | f2
/// | f1 (feature)
/// b  |
/// |/
/// a    root
/// ```
pub fn merged_feature_log() -> String {
    [
        log_line("m", &["b", "f2"], "alice", 500, "Merge feature", "HEAD -> main, origin/main"),
        log_line("f2", &["f1"], "bob", 400, "Finish feature", ""),
        log_line("f1", &["a"], "bob", 300, "Start feature", "feature"),
        log_line("b", &["a"], "alice", 200, "Fix typo", ""),
        log_line("a", &[], "alice", 100, "Initial commit", "tag: v0.1"),
    ]
    .join("\n")
}

pub fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(repo_path: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(["-c", "user.name=Test User", "-c", "user.email=test@example.com", "-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(repo_path)
        .output()?;
    anyhow::ensure!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?)
}

/// Create a test commit in the repository
pub fn create_test_commit(repo_path: &Path, message: &str) -> anyhow::Result<()> {
    std::fs::write(repo_path.join("test.txt"), format!("Test content for {}", message))?;
    git(repo_path, &["add", "test.txt"])?;
    git(repo_path, &["commit", "-m", message])?;
    Ok(())
}

/// Repository with a feature branch merged into `main`
pub fn create_merged_repo() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "-q"])?;
    git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    create_test_commit(&repo_path, "Initial commit")?;

    git(&repo_path, &["checkout", "-q", "-b", "feature/test"])?;
    std::fs::write(repo_path.join("feature.txt"), "feature")?;
    git(&repo_path, &["add", "feature.txt"])?;
    git(&repo_path, &["commit", "-m", "Add feature functionality"])?;

    git(&repo_path, &["checkout", "-q", "main"])?;
    create_test_commit(&repo_path, "Update main")?;
    git(&repo_path, &["merge", "-q", "--no-ff", "--no-edit", "feature/test"])?;

    Ok((temp_dir, repo_path))
}

/// `git log` output in the format the parser expects
pub fn read_git_log(repo_path: &Path, config: &GraphConfig) -> anyhow::Result<String> {
    git(repo_path, &["log", "--all", "--topo-order", &log_format(config.delimiter)])
}
