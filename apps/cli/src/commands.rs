//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use contribsync_core::{Aggregator, ProgressReporter, SnapshotSource, SyncReport};
use contribsync_shared::{AppConfig, SyncConfig, init_config, load_config};
use contribsync_snapshot::SnapshotStore;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// contribsync — bake the contributor list into the docs site.
#[derive(Parser)]
#[command(
    name = "contribsync",
    version,
    about = "Aggregate repository contributors into a JSON snapshot for the docs site.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Refresh (or serve) the contributor snapshot.
    Sync {
        /// Run as a build step: always refresh, even if a snapshot exists.
        #[arg(long, env = "CONTRIBSYNC_BUILD")]
        build: bool,

        /// Repository slug (owner/name), overriding the config file.
        #[arg(short, long)]
        repo: Option<String>,

        /// Snapshot file path, overriding the config file.
        #[arg(short, long)]
        snapshot: Option<String>,
    },

    /// Print contributors from the stored snapshot.
    Show {
        /// Snapshot file path, overriding the config file.
        #[arg(short, long)]
        snapshot: Option<String>,

        /// Only print the first N contributors.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "contribsync=info",
        1 => "contribsync=debug",
        _ => "contribsync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync {
            build,
            repo,
            snapshot,
        } => cmd_sync(build, repo.as_deref(), snapshot.as_deref()).await,
        Command::Show { snapshot, limit } => cmd_show(snapshot.as_deref(), limit).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_sync(build: bool, repo: Option<&str>, snapshot: Option<&str>) -> Result<()> {
    let mut config = load_config()?;

    // CLI flags override config file values.
    if let Some(repo) = repo {
        config.github.repo = repo.to_string();
    }
    if let Some(snapshot) = snapshot {
        config.snapshot.path = snapshot.to_string();
    }

    let sync_config = SyncConfig::from_config(&config, build);

    info!(
        repo = %sync_config.repo,
        build,
        snapshot = %sync_config.snapshot_path.display(),
        "starting contributor aggregation"
    );

    let aggregator = Aggregator::new(sync_config.clone())?
        .with_progress(Box::new(CliProgress::new()));
    let report = aggregator.sync().await;

    // Print summary
    println!();
    println!("  Contributor snapshot ready!");
    println!("  Repo:     {}", sync_config.repo);
    println!("  Count:    {}", report.contributors.len());
    println!("  Source:   {}", source_label(report.source));
    println!("  Snapshot: {}", sync_config.snapshot_path.display());
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Human-readable label for the path that produced the result.
fn source_label(source: SnapshotSource) -> &'static str {
    match source {
        SnapshotSource::Refreshed => "live refresh",
        SnapshotSource::Cache => "cached snapshot",
        SnapshotSource::Fallback => "fallback to previous snapshot",
        SnapshotSource::Empty => "empty (no snapshot available)",
    }
}

async fn cmd_show(snapshot: Option<&str>, limit: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let path = snapshot
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.snapshot.path));

    let store = SnapshotStore::new(&path);
    if !store.exists() {
        return Err(eyre!(
            "no snapshot found at '{}' — run `contribsync sync` first",
            path.display()
        ));
    }

    let contributors = store.read().await?;
    let limit = limit.unwrap_or(contributors.len());

    println!("{:>6}  {:<24} NAME", "COMMITS", "LOGIN");
    for c in contributors.iter().take(limit) {
        println!(
            "{:>6}  {:<24} {}",
            c.contributor.contributions, c.contributor.login, c.name
        );
    }
    println!();
    println!(
        "  {} of {} contributors ({})",
        limit.min(contributors.len()),
        contributors.len(),
        path.display()
    );

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _report: &SyncReport) {
        self.spinner.finish_and_clear();
    }
}
