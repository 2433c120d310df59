use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use relog_cli::{OutputFormat, commands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relog")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Summarize structured HTTP response logs by URL pattern",
    long_about = "Relog aggregates the JSON log lines emitted by its response-logging \
                  middleware, grouping requests by HTTP method and normalized URL pattern \
                  (numeric IDs and UUIDs collapsed to placeholders) and reporting the \
                  count, total, and average latency of each group."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a response log into per-pattern summary rows
    Summarize {
        /// Path to the newline-delimited JSON log file (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Run a demo server wrapped in the response-logging middleware
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:1234")]
        addr: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Summarize { file } => commands::summarize::execute(file.as_deref(), cli.format),
        Commands::Serve { addr } => commands::serve::execute(&addr),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("relog_cli=debug,relog_core=debug,relog_http=debug")
    } else {
        EnvFilter::new("relog_cli=info")
    };

    // Diagnostics go to stderr; stdout is reserved for report output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
