use std::path::PathBuf;

use thiserror::Error;

use crate::{collector::ValidationError, parsers::gocover::ProfileParseError};

pub type Result<T, E = CovpkgError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum CovpkgError {
    #[error(transparent)]
    ValidationError(#[from] ValidationError),

    // Parse failures are reported against the file they came from
    #[error("{}: {source}", .path.display())]
    ProfileError {
        path: PathBuf,
        source: ProfileParseError,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    ProfileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("io error: '{0}'")]
    IOError(#[from] std::io::Error),

    #[error("json error: '{0}'")]
    Json(#[from] serde_json::Error),
}
