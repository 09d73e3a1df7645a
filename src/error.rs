use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a counting run.
#[derive(Debug, Error)]
pub enum CountError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unable to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("a counting task panicked")]
    TaskPanicked,

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A file that could not be read. Recovered locally: the batch carries on.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct FileReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
