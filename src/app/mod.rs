pub mod cli;
pub mod error;
pub mod logging;

use std::path::PathBuf;

// Re-export commonly used types
pub use cli::{CliApp, FAREWELL};
pub use error::AppError;
pub use logging::init_tracing;

/// Directory holding the running executable; configuration and logs live beside it
pub fn install_dir() -> Result<PathBuf, AppError> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or_else(|| AppError::InstallDir(exe.display().to_string()))
}
