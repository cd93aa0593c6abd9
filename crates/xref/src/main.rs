//! xref CLI - reference linking for rendered HTML.
//!
//! Provides commands for:
//! - `render`: Link references in rendered markdown
//! - `commit`: Link references in a rendered commit message
//! - `describe`: Link bare URLs in a repository description

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CommitArgs, DescribeArgs, RenderArgs};
use output::Output;

/// xref - reference linking for rendered HTML.
#[derive(Parser)]
#[command(name = "xref", version, about)]
struct Cli {
    /// Enable verbose output (log lookups and processing summaries).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post-process rendered markdown.
    Render(RenderArgs),
    /// Post-process a rendered commit message.
    Commit(CommitArgs),
    /// Post-process a repository description.
    Describe(DescribeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Commit(args) => args.execute(),
        Commands::Describe(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
