//! prpush - push a commit and converge its pull request

mod cli;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cli::batch::{BatchOptions, run_batch};
use cli::entry::PublishEntry;
use cli::push::{PushOptions, run_push};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "prpush", version)]
#[command(about = "Push a commit and open or update its GitHub pull request")]
struct Cli {
    /// Config file (default: <config dir>/prpush/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Push HEAD to a branch and converge its pull request
    Push {
        /// Repository owner
        #[arg(long)]
        owner: String,

        /// Repository name
        #[arg(long)]
        repo: String,

        /// Branch to push to
        #[arg(long)]
        branch: String,

        /// Commit message; the first line becomes the PR title
        #[arg(short, long, conflicts_with = "message_file", required_unless_present = "message_file")]
        message: Option<String>,

        /// Read the commit message from a file
        #[arg(long)]
        message_file: Option<PathBuf>,

        /// PR body, replacing the commit message remainder
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the PR body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,

        /// Login to assign the PR to
        #[arg(long)]
        assignee: Option<String>,

        /// Git checkout holding the commit
        #[arg(long, default_value = ".")]
        repo_dir: PathBuf,

        /// Directory relative message/body files resolve against (default: repo dir)
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish every entry of a manifest concurrently
    Batch {
        /// TOML manifest with [[publish]] entries
        manifest: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check GitHub credentials
    Auth,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pr_push=debug,prpush=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Push {
            owner,
            repo,
            branch,
            message,
            message_file,
            body,
            body_file,
            assignee,
            repo_dir,
            work_dir,
            json,
        } => {
            let entry = PublishEntry {
                owner,
                repo,
                branch: branch.clone(),
                message,
                message_file,
                body,
                body_file,
                assignee,
                repo_dir: Some(repo_dir),
                work_dir,
            };
            run_push(config, entry, PushOptions { json })
                .await
                .with_context(|| format!("failed to publish {branch}"))?;
        }
        Commands::Batch { manifest, json } => {
            run_batch(config, &manifest, BatchOptions { json })
                .await
                .with_context(|| format!("batch {} failed", manifest.display()))?;
        }
        Commands::Auth => {
            cli::auth::run_auth(config)
                .await
                .context("GitHub authentication check failed")?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
