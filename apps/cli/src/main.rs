//! contribsync CLI — contributor snapshot tool for the docs site.
//!
//! Aggregates the repository's contributor list via the GitHub API and
//! bakes it into the JSON snapshot the contributors page renders.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
