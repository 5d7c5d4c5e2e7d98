use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Artifact extraction errors.
///
/// Only file-level failures are errors. A metric that never matches inside a
/// readable artifact resolves to zero instead of failing the run.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("artifact not found: {0}")]
    ArtifactMissing(PathBuf),
    #[error("failed to read artifact {path}: {source}")]
    ArtifactUnreadable { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
