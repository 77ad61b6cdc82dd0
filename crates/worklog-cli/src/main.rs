mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, key::KeySubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "worklog",
    about = "Keep a running log of work wins, organized and summarized by a language model",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data directory (default: ~/.worklog)
    #[arg(long, global = true, env = "WORKLOG_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add up to three new entries to the worklog
    Add {
        /// One achievement per argument
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Print the current worklog
    Show,

    /// Restore the worklog as it was before the last change
    Undo,

    /// Generate a report for a date range
    Report {
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// executive, detailed, chronological, or accomplishments
        #[arg(long, default_value = "executive")]
        style: String,
        /// Write the report to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage the language model API key
    Key {
        #[command(subcommand)]
        subcommand: KeySubcommand,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the HTTP API
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3141")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Add { entries } => cmd::add::run(&root, &entries, cli.json),
        Commands::Show => cmd::show::run(&root, cli.json),
        Commands::Undo => cmd::undo::run(&root, cli.json),
        Commands::Report {
            from,
            to,
            style,
            output,
        } => cmd::report::run(&root, &from, &to, &style, output.as_deref(), cli.json),
        Commands::Key { subcommand } => cmd::key::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
