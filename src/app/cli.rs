use std::future::Future;
use std::io;

use tracing::info;

use super::error::AppError;

/// Farewell printed when the operator stops the collector
pub const FAREWELL: &str = "Bye...";

/// Process runner for the collector binary.
///
/// Handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP; Ctrl+C elsewhere)
/// - Buffered stdout for the record echo
/// - Exit codes (0 = stopped by the operator, 1 = fatal error)
pub struct CliApp {
    name: String,
}

impl CliApp {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the application until it fails or a signal arrives.
    ///
    /// Creates a buffered stdout writer and passes it to the main function.
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(tokio::io::BufWriter<tokio::io::Stdout>) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let writer = tokio::io::BufWriter::new(tokio::io::stdout());
        info!(app = %self.name, "Starting");

        tokio::select! {
            result = main_fn(writer) => {
                std::process::exit(exit_code(&result));
            }
            signal = wait_for_signal() => {
                match signal {
                    Ok(name) => {
                        info!(app = %self.name, signal = name, "Stopping");
                        println!("\n{FAREWELL}");
                        std::process::exit(0);
                    }
                    Err(e) => {
                        eprintln!("Error: cannot install signal handlers: {e}");
                        std::process::exit(1);
                    }
                }
            }
        }
    }
}

/// Exit code for a main function that returned on its own
fn exit_code(result: &Result<(), AppError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

/// Wait for SIGINT, SIGTERM or SIGHUP and return its name
async fn wait_for_signal() -> io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sighup = signal(SignalKind::hangup())?;

        tokio::select! {
            _ = sigterm.recv() => Ok("SIGTERM"),
            _ = sigint.recv() => Ok("SIGINT"),
            _ = sighup.recv() => Ok("SIGHUP"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok("Ctrl+C")
    }
}
