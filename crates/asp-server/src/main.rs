//! Agent Spreadsheet Protocol server — entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use asp_server::config::resolve_data_dir;
use asp_server::protocol::ProtocolHandler;
use asp_server::tools::ToolCatalog;
use asp_server::transport::StdioTransport;
use asp_sheets::{CsvBackend, SpreadsheetBackend};

#[derive(Parser)]
#[command(
    name = "asp-server",
    about = "Agent Spreadsheet Protocol server — read-only spreadsheet tools for LLM agents",
    version
)]
struct Cli {
    /// Directory of .csv sheet files.
    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the ASP server over HTTP (default).
    #[cfg(feature = "http")]
    Serve {
        /// Listen address (host:port). Also reads ASP_ADDR.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Start the ASP server over stdio (one JSON request per line).
    ServeStdio,

    /// Print server capabilities and the tool catalog as JSON.
    Info,

    /// Validate the tool catalog and the sheet directory.
    Validate,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   asp-server completions bash > ~/.local/share/bash-completion/completions/asp-server
    ///   asp-server completions zsh > ~/.zfunc/_asp-server
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = resolve_data_dir(cli.data_dir.as_deref());

    #[cfg(feature = "http")]
    let default_command = Commands::Serve { addr: None };
    #[cfg(not(feature = "http"))]
    let default_command = Commands::ServeStdio;

    match cli.command.unwrap_or(default_command) {
        #[cfg(feature = "http")]
        Commands::Serve { addr } => {
            use asp_server::config::resolve_addr;
            use asp_server::transport::HttpTransport;

            let addr = resolve_addr(addr.as_deref());
            tracing::info!("ASP server v{}", env!("CARGO_PKG_VERSION"));
            tracing::info!("Data dir: {}", data_dir.display());
            let handler = ProtocolHandler::with_backend(Arc::new(CsvBackend::new(&data_dir)))?;
            let transport = HttpTransport::new(handler);
            transport.run(&addr).await?;
        }

        Commands::ServeStdio => {
            let handler = ProtocolHandler::with_backend(Arc::new(CsvBackend::new(&data_dir)))?;
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        Commands::Info => {
            let handler = ProtocolHandler::with_backend(Arc::new(CsvBackend::new(&data_dir)))?;
            let info = handler.server_info();
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Validate => {
            let catalog = match ToolCatalog::builtin() {
                Ok(catalog) => catalog,
                Err(e) => {
                    eprintln!("Invalid tool catalog: {e}");
                    std::process::exit(1);
                }
            };
            let backend = CsvBackend::new(&data_dir);
            match backend.list_tables() {
                Ok(sheets) => {
                    println!("Valid sheet directory: {}", data_dir.display());
                    println!("  Tools:  {}", catalog.len());
                    println!("  Sheets: {}", sheets.len());
                    for sheet in &sheets {
                        println!("    {sheet}");
                    }
                }
                Err(e) => {
                    eprintln!("Invalid sheet directory {}: {e}", data_dir.display());
                    std::process::exit(1);
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "asp-server", &mut std::io::stdout());
        }

        Commands::Repl => {
            asp_server::repl::run(data_dir)?;
        }
    }

    Ok(())
}
