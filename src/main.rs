// Main entry point for the removebg-web application.
// Parses configuration, prepares the inference cache directory, builds the
// background remover and the Axum router, and starts the HTTP server.

mod cache_dir;
mod remover;
mod shutdown_signal;
mod web;

use clap::Parser;
use remover::CommandRemover;
use shutdown_signal::shutdown_signal;
use std::{path::PathBuf, sync::Arc};
use tracing::Level;

/// Command line arguments for removebg-web
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "REMOVEBG_WEB_HOST", default_value = "localhost", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "REMOVEBG_WEB_PORT", default_value_t = 8000)]
    port: u16,

    /// Writable cache directory for the inference runtime.
    /// Defaults to `.numba_cache` next to the executable.
    #[arg(long, env = "NUMBA_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Program that reads an image on stdin and writes the background-removed PNG to stdout.
    #[arg(long, env = "REMOVEBG_WEB_REMOVER_PROGRAM", default_value = "rembg")]
    remover_program: String,

    /// Arguments passed to the remover program. May be repeated.
    #[arg(
        long = "remover-arg",
        env = "REMOVEBG_WEB_REMOVER_ARGS",
        value_delimiter = ' ',
        allow_hyphen_values = true,
        default_values_t = ["i".to_string(), "-".to_string(), "-".to_string()]
    )]
    remover_args: Vec<String>,
}

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting removebg-web...");

    // --- One-time cache directory setup ---
    // Must happen before the remover is constructed; request handlers never touch the filesystem.
    let cache_dir = match cache_dir::prepare_cache_dir(config.cache_dir.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("FATAL: Failed to prepare cache directory: {}", e);
            eprintln!("FATAL: Could not prepare cache directory. Error: {}. Exiting.", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Inference cache directory set to: {}", cache_dir.display());

    let remover = CommandRemover::new(config.remover_program, config.remover_args)
        .with_cache_dir(cache_dir);
    tracing::info!("Background remover configured: {}", remover);

    let app = web::create_app(Arc::new(remover));

    tracing::info!("Axum router configured.");

    // --- Start HTTP Server ---
    let listener = match web::create_listener(&config.host, config.port).await {
        Ok((addr, l)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            eprintln!("FATAL: Could not bind server. Error: {}. Exiting.", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {}", e);
    }

    tracing::info!("removebg-web has shut down.");
}
