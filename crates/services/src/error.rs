//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::MalformedQuizFile;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Malformed(#[from] MalformedQuizFile),
    #[error("could not read quiz file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
