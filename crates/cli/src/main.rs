//! RecordPilot CLI: the main entry point.
//!
//! Commands:
//! - `run`        Send one operator command to the agent
//! - `analyze`    Explain an error log entry
//! - `interview`  Answer one knowledge-grounded question and get a grade
//! - `stats`      Print a dashboard view as JSON
//! - `doctor`     Check configuration and instance connectivity
//! - `serve`      Start the HTTP gateway
//! - `config`     Print the default configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::stats::StatsKind;

#[derive(Parser)]
#[command(
    name = "recordpilot",
    about = "RecordPilot: natural-language operator agent for ITSM record stores",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one operator command
    Run {
        /// The command text, e.g. "Find the user with email admin@example.com"
        #[arg(short, long)]
        message: String,

        /// Target instance (defaults to platform.default_instance)
        #[arg(short, long)]
        instance: Option<String>,

        /// JSON file holding the prior conversation turns
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Explain an error log entry
    Analyze {
        /// The error text to analyze
        error: String,

        /// Target instance (defaults to platform.default_instance)
        #[arg(short, long)]
        instance: Option<String>,
    },

    /// Answer one interview question on a topic and get a grade
    Interview {
        /// The topic, matched against knowledge article short descriptions
        topic: String,

        /// Target instance (defaults to platform.default_instance)
        #[arg(short, long)]
        instance: Option<String>,
    },

    /// Print a dashboard view
    Stats {
        #[arg(short, long, value_enum, default_value_t = StatsKind::Instance)]
        kind: StatsKind,

        /// Target instance (defaults to platform.default_instance)
        #[arg(short, long)]
        instance: Option<String>,
    },

    /// Check configuration and instance connectivity
    Doctor {
        /// Target instance (defaults to platform.default_instance)
        #[arg(short, long)]
        instance: Option<String>,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the default configuration file
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            message,
            instance,
            history,
        } => commands::run::run(message, instance, history).await?,
        Commands::Analyze { error, instance } => commands::analyze::run(error, instance).await?,
        Commands::Interview { topic, instance } => {
            commands::interview::run(topic, instance).await?
        }
        Commands::Stats { kind, instance } => commands::stats::run(kind, instance).await?,
        Commands::Doctor { instance } => commands::doctor::run(instance).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Config => commands::config_cmd::run(),
    }

    Ok(())
}
