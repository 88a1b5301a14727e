//! Developer task runner for the diffscribe workspace.
//!
//! # Usage
//!
//! ```text
//! cargo xtask check          # re-run `cargo check` on file change
//! cargo xtask clippy         # re-run clippy on file change
//! cargo xtask fmt            # re-check formatting on file change
//! cargo xtask lints-inplace  # rewrite formatting, apply clippy fixes
//! cargo xtask install-dev    # install diffscribe into a workspace-local root
//! ```
//!
//! Every task is a one-shot delegation to an external tool with fixed
//! arguments; exit codes and output are the delegated tool's own.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use std::process::{Command, ExitCode, ExitStatus};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "xtask", about = "Developer convenience tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Watch the workspace and re-run `cargo check` on every change.
    Check,
    /// Watch the workspace and re-run clippy on every change.
    Clippy,
    /// Watch the workspace and re-check formatting on every change.
    Fmt,
    /// Rewrite files in place: rustfmt, then clippy autofixes.
    LintsInplace,
    /// Install the diffscribe binary into the workspace-local cargo root.
    InstallDev,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let root = workspace_root();

    let status = match cli.task {
        Task::Check => run(&root, &["watch", "-x", "check --workspace --all-targets"])?,
        Task::Clippy => run(&root, &["watch", "-x", "clippy --workspace --all-targets"])?,
        Task::Fmt => run(&root, &["watch", "-x", "fmt --all -- --check"])?,
        Task::LintsInplace => {
            let fmt = run(&root, &["fmt", "--all"])?;
            if !fmt.success() {
                return Ok(ExitCode::FAILURE);
            }
            run(
                &root,
                &[
                    "clippy",
                    "--workspace",
                    "--fix",
                    "--allow-dirty",
                    "--allow-staged",
                ],
            )?
        }
        Task::InstallDev => install_dev(&root)?,
    };

    Ok(if status.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn run<S: AsRef<OsStr>>(root: &Path, args: &[S]) -> Result<ExitStatus> {
    Command::new("cargo")
        .args(args)
        .current_dir(root)
        .status()
        .with_context(|| {
            let rendered: Vec<_> = args
                .iter()
                .map(|arg| arg.as_ref().to_string_lossy().into_owned())
                .collect();
            format!("failed to run `cargo {}`", rendered.join(" "))
        })
}

/// Install the CLI from source into the resolved install root, refusing to
/// touch anything outside the workspace.
fn install_dev(root: &Path) -> Result<ExitStatus> {
    let install_root = resolve_install_root(
        env::var_os("CARGO_INSTALL_ROOT"),
        env::var_os("CARGO_HOME"),
        dirs::home_dir(),
    );
    ensure_local_install_root(&install_root, root)?;

    let install_root = install_root
        .to_str()
        .context("install root path is not valid UTF-8")?;
    run(root, &install_args(install_root))
}

/// Arguments passed to `cargo` for a development install: the CLI crate
/// from source, debug profile, into an explicit root.
fn install_args(install_root: &str) -> Vec<String> {
    vec![
        "install".to_owned(),
        "--path".to_owned(),
        "diffscribe-cli".to_owned(),
        "--debug".to_owned(),
        "--root".to_owned(),
        install_root.to_owned(),
    ]
}

/// The root `cargo install` would write to: `CARGO_INSTALL_ROOT` wins, then
/// `CARGO_HOME`, then the user-wide default.
fn resolve_install_root(
    cargo_install_root: Option<OsString>,
    cargo_home: Option<OsString>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(root) = cargo_install_root {
        return PathBuf::from(root);
    }
    if let Some(home) = cargo_home {
        return PathBuf::from(home);
    }
    home.unwrap_or_else(|| PathBuf::from(".")).join(".cargo")
}

/// `install-dev` must never install into a shared system-wide root.
///
/// The root usually does not exist yet (`cargo install` creates it), so the
/// check cannot rely on `canonicalize()` alone: a raw `starts_with` over a
/// path like `<workspace>/sub/../../elsewhere` would pass lexically while
/// resolving outside the workspace. Non-canonicalizable paths are therefore
/// normalized component by component before the prefix check.
fn ensure_local_install_root(install_root: &Path, workspace: &Path) -> Result<()> {
    let workspace = workspace
        .canonicalize()
        .unwrap_or_else(|_| normalize_lexically(workspace));
    let resolved = resolve_for_check(install_root, &workspace);

    if !resolved.starts_with(&workspace) {
        bail!(
            "install root {} is outside the workspace {}; set CARGO_INSTALL_ROOT \
             to a directory inside the workspace before running install-dev",
            resolved.display(),
            workspace.display()
        );
    }
    Ok(())
}

/// The path the guard compares: canonical when the root exists, otherwise
/// lexically normalized (relative roots count from the workspace).
fn resolve_for_check(install_root: &Path, workspace: &Path) -> PathBuf {
    let absolute = if install_root.is_absolute() {
        install_root.to_path_buf()
    } else {
        workspace.join(install_root)
    };
    absolute
        .canonicalize()
        .unwrap_or_else(|_| normalize_lexically(&absolute))
}

/// Fold `.` and `..` components without touching the filesystem. A `..`
/// that would climb past the path's start is kept, which makes the
/// subsequent prefix check fail closed.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
