//! lexgate CLI: the main entry point.
//!
//! Commands:
//! - `gateway`: Start the HTTP API server
//! - `status`: Show configuration and LIVE/DEGRADED mode
//! - `generate`: Draft a legal document
//! - `search`: Answer a legal question from the document store
//! - `chat`: Single-message or interactive chat

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "lexgate",
    about = "lexgate: legal document, research, and chat assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "LEXGATE_JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration and answer mode
    Status,

    /// Generate a legal document
    Generate {
        /// Document type (e.g. contract, demand_letter)
        document_type: String,

        /// Template parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = commands::generate::parse_param)]
        params: Vec<(String, serde_json::Value)>,
    },

    /// Ask a legal question
    Search {
        question: String,

        /// Extra background for the question
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so command output stays clean
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Generate {
            document_type,
            params,
        } => commands::generate::run(document_type, params).await?,
        Commands::Search { question, context } => {
            commands::search::run(question, context).await?
        }
        Commands::Chat { message } => commands::chat::run(message).await?,
    }

    Ok(())
}
