/// Errors at the program's edges. The page itself cannot fail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal init failed: {0}")]
    TerminalInit(#[source] io::Error),

    #[error("terminal output failed: {0}")]
    Render(#[source] io::Error),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
