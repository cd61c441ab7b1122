//! context-index-mcp: MCP server exposing a source tree as read-only resources
//!
//! Indexes the context root once at startup, then answers `resources/list`
//! and `resources/read` requests on stdin/stdout until the input closes.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use context_index_mcp::catalog::{self, UriScheme};
use context_index_mcp::config;
use context_index_mcp::mcp::protocol::SERVER_NAME;
use context_index_mcp::mcp::McpServer;

/// MCP server exposing a service-grouped source tree as read-only resources.
///
/// The context root is taken from the `MCP_CONTEXT_PATH` environment
/// variable, the configuration file, or `./context-index`.
#[derive(Parser, Debug)]
#[command(name = "context-index-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber. Logs go to stderr; stdout is the protocol channel.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the context-index-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if let Some(default_path) = config::default_config_path() {
                eprintln!("\nDefault config location: {}", default_path.display());
            }
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        server = SERVER_NAME,
        version = env!("CARGO_PKG_VERSION"),
        "Starting server"
    );

    let context_path = config::resolve_context_path(&cfg);
    let scheme = UriScheme::new(&cfg.scheme);

    info!(
        context_path = %context_path.display(),
        scheme = scheme.name(),
        "Scanning context root"
    );

    let report = catalog::scan(&context_path);
    info!(
        services = report.catalog.service_count(),
        files = report.catalog.file_count(),
        skipped = report.issues.len(),
        "Loaded {} services with context",
        report.catalog.service_count()
    );

    let mut server = McpServer::stdio(report.catalog, scheme);

    info!("MCP server ready, waiting for requests...");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(server.run());

    // The blocking stdin read cannot be cancelled; do not wait for it.
    runtime.shutdown_background();

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
