//! diffscribe — draft source-control commit messages from a diff.
//!
//! # Usage
//!
//! ```text
//! git diff --cached | diffscribe
//! diffscribe --git
//! diffscribe --git -4 --temperature 0.2
//! diffscribe --git --prompt "Write a changelog entry for:" --quiet
//! ```

mod diff;
mod logging;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use diffscribe_core::{commit_message, prompt, wrap};
use diffscribe_llm::{Llm, ModelKind, OpenAi};

/// Column width for the printed message.
const WRAP_WIDTH: usize = 70;

/// Anything shorter than this cannot be a meaningful diff.
const MIN_DIFF_LEN: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "diffscribe",
    version,
    about = "Use an LLM to draft source control commit messages",
    long_about = "Use an LLM to draft source control commit messages.\n\n\
                  Unless --git is passed, the diff is read from stdin."
)]
struct Cli {
    /// Use staged git changes instead of stdin.
    #[arg(short, long)]
    git: bool,

    /// Use GPT-4 (slower, costs more money).
    #[arg(short = '4', long = "gpt4")]
    gpt4: bool,

    /// Sampling temperature between 0 and 2. Higher values like 0.8 make the
    /// output more random; lower values like 0.2 keep it focused and
    /// deterministic.
    #[arg(
        short,
        long,
        value_name = "0-2",
        value_parser = parse_temperature,
        default_value_t = 0.0
    )]
    temperature: f32,

    /// Custom prompt placed in front of the diff.
    #[arg(short, long)]
    prompt: Option<String>,

    /// Print verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress the request/cache counter line.
    #[arg(short, long)]
    quiet: bool,

    /// Append diagnostics to this file (a leading `~` expands to home).
    #[arg(short, long, value_name = "PATH")]
    logfile: Option<String>,
}

fn parse_temperature(value: &str) -> Result<f32, String> {
    let temperature: f32 = value
        .parse()
        .map_err(|_| format!("temperature must be a number, not '{value}'"))?;
    if (0.0..=2.0).contains(&temperature) {
        Ok(temperature)
    } else {
        Err(format!("temperature must be between 0 and 2, not {value}"))
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.logfile.as_deref())?;
    tracing::info!(?cli, "parsed arguments");

    let diff = if cli.git {
        diff::staged_git_diff()?
    } else {
        diff::read_stdin()?
    };
    if diff.len() < MIN_DIFF_LEN {
        println!("Empty diff.");
        return Ok(ExitCode::FAILURE);
    }

    let model = if cli.gpt4 {
        ModelKind::Gpt4
    } else {
        ModelKind::Gpt35Turbo
    };
    let prompt = cli
        .prompt
        .unwrap_or_else(|| prompt::COMMIT_PROMPT.to_owned());

    let backend = OpenAi::new(model, cli.temperature)?;
    let llm = Llm::new(backend);

    let message =
        commit_message(&llm, &diff, &prompt).context("commit message generation failed")?;
    tracing::info!(reply = %message, "model reply");

    println!("{}", wrap::wrap_paragraphs(&message, WRAP_WIDTH));
    if !cli.quiet {
        println!("({})", llm.counter_string());
    }

    Ok(ExitCode::SUCCESS)
}
