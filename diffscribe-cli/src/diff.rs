//! Diff acquisition: staged git changes or stdin.

use std::io::Read;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Output of `git diff --cached` in the current directory.
pub fn staged_git_diff() -> Result<String> {
    let output = Command::new("git")
        .args(["diff", "--cached"])
        .output()
        .context("failed to run `git diff --cached`")?;

    if !output.status.success() {
        bail!(
            "`git diff --cached` exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    String::from_utf8(output.stdout).context("git diff output was not valid UTF-8")
}

/// Everything on stdin until EOF.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read diff from stdin")?;
    Ok(buffer)
}
