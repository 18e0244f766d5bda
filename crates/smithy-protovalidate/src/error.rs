//! Errors surfaced by an injection run.
//!
//! Every variant is fatal: the run stops at the first failing file.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = InjectError> = std::result::Result<T, E>;
