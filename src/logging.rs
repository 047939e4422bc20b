/// File logging.
///
/// Stdout belongs to the terminal UI, so records go to the file named by
/// `COMINGSOON_LOG`. Without it, logging stays off. The level filter comes
/// from `RUST_LOG` (default `info`).

use std::fs::OpenOptions;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::error::AppError;

pub const LOG_PATH_VAR: &str = "COMINGSOON_LOG";

/// Returns the log file path when logging was enabled.
pub fn init() -> Result<Option<PathBuf>, AppError> {
    let Some(path) = std::env::var_os(LOG_PATH_VAR).map(PathBuf::from) else {
        return Ok(None);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| AppError::LogFile { path: path.clone(), source })?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();

    Ok(Some(path))
}
