//! NLSearch CLI
//!
//! Translate plain-English log search sentences into OpenSearch query
//! documents, and optionally execute them against a cluster.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nlsearch",
    version,
    about = "Natural language log search",
    long_about = "Translate plain-English sentences like\n\
                  \"errors in last 5 minutes for checkout-service\"\n\
                  into OpenSearch query documents, and optionally execute\n\
                  them against a cluster."
)]
struct Cli {
    /// Backend URL, e.g. https://localhost:9200
    #[arg(short, long, env = "NLQ_URL")]
    url: Option<String>,

    /// Username for basic authentication
    #[arg(long, env = "NLQ_USERNAME")]
    username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "NLQ_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Skip TLS certificate verification (development clusters only)
    #[arg(long)]
    insecure: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a sentence and print the generated query document
    Parse {
        /// The sentence to translate
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Translate a sentence and execute it against the cluster
    Query {
        /// The sentence to translate and execute
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,

        /// Index pattern to search
        #[arg(short, long, env = "NLQ_INDEX", default_value = "logs-*")]
        index: String,

        /// Print the generated document instead of executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show cluster health
    Health,

    /// Interactive loop: type sentences, get query documents
    Repl,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let connection = commands::Connection {
        url: cli.url,
        username: cli.username,
        password: cli.password,
        insecure: cli.insecure,
    };

    match cli.command {
        Commands::Parse { query, pretty } => commands::parse(&query.join(" "), pretty),
        Commands::Query {
            query,
            index,
            dry_run,
        } => commands::query(&connection, &query.join(" "), &index, dry_run).await,
        Commands::Health => commands::health(&connection).await,
        Commands::Repl => commands::repl(),
    }
}
