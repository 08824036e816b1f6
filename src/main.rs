mod cli;

use anyhow::Result;
use aura_memory::{config, server};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "aura-memory",
    version,
    about = "Memory and emotional-pattern engine for a personal companion"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server
    Serve {
        /// Transport to serve on; defaults to the configured one
        #[arg(long, value_enum)]
        transport: Option<Transport>,
    },
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Semantic search over a user's memories
    Search {
        #[arg(long)]
        user: String,
        #[arg(long)]
        query: String,
        /// Number of results (1-20)
        #[arg(short = 'n', long)]
        n: Option<usize>,
    },
    /// Summarize a user's emotional patterns
    Analyze {
        #[arg(long)]
        user: String,
        /// Window length in days
        #[arg(long)]
        days: Option<u32>,
    },
    /// Show a user's memory statistics
    Stats {
        #[arg(long)]
        user: String,
    },
    /// Export a user's memories and pattern summary as JSON
    Export {
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding model to ~/.aura/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::AuraConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            let transport = match transport {
                Some(t) => t,
                None if config.server.transport == "http" => Transport::Http,
                None => Transport::Stdio,
            };
            match transport {
                Transport::Stdio => server::serve_stdio(config).await?,
                Transport::Http => server::serve_http(config).await?,
            }
        }
        Command::Model { action } => match action {
            ModelAction::Download => {
                cli::model_download(&config.embedding).await?;
            }
        },
        Command::Search { user, query, n } => {
            cli::search::search(&config, &user, &query, n).await?;
        }
        Command::Analyze { user, days } => {
            cli::analyze::analyze(&config, &user, days).await?;
        }
        Command::Stats { user } => {
            cli::stats::stats(&config, &user).await?;
        }
        Command::Export { user } => {
            cli::export::export(&config, &user).await?;
        }
    }

    Ok(())
}
