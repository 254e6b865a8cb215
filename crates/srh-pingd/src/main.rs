//! Segment Routing Ping Server
//!
//! Main entry point for srh-pingd.
//! Builds the routing header from the segment file, then serves one client.

use clap::Parser;
use srh_pingd::{load_header, log_header, Args, PingServer, PingdError, Result, Settings};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("srh-pingd: {e}");
        return ExitCode::FAILURE;
    }

    info!("srh-pingd: Starting segment routing ping server");

    match run_server(args).await {
        Ok(()) => {
            info!("srh-pingd: Exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "srh-pingd: Exiting with error");
            ExitCode::FAILURE
        }
    }
}

/// Initialize structured logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| PingdError::Config(format!("Invalid log level '{}': {}", level, e)))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PingdError::Config(format!("Failed to set logger: {}", e)))?;

    Ok(())
}

async fn run_server(args: Args) -> Result<()> {
    let settings = Settings::from_args(&args)?;
    info!(
        address = %settings.listen.ip(),
        port = settings.listen.port(),
        "srh-pingd: Listen options"
    );

    let header = load_header(
        &settings.server.segments_file,
        settings.server.max_line_length,
    )?;
    log_header(&header);

    let shutdown = setup_signal_handlers();
    PingServer::new(settings, &header).run(shutdown).await
}

/// Setup signal handlers for graceful shutdown
fn setup_signal_handlers() -> Arc<AtomicBool> {
    let shutdown_flag = Arc::new(AtomicBool::new(false));
    let shutdown_flag_clone = shutdown_flag.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("srh-pingd: Received SIGINT");
            shutdown_flag_clone.store(true, Ordering::Relaxed);
        }
    });

    shutdown_flag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_handler_flag_starts_clear() {
        let shutdown = setup_signal_handlers();
        assert!(!shutdown.load(Ordering::Relaxed));
        assert_eq!(Arc::strong_count(&shutdown), 2);
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(matches!(
            init_logging("srh_pingd=verbose"),
            Err(PingdError::Config(_))
        ));
    }
}
