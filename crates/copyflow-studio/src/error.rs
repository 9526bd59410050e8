//! Façade errors.

use copyflow_providers::GenerationError;
use thiserror::Error;

/// Which artifact a generation was for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Artifact {
    Topics,
    Script,
    Copy,
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Artifact::Topics => "topics",
            Artifact::Script => "script",
            Artifact::Copy => "copy",
        })
    }
}

#[derive(Debug, Error)]
pub enum StudioError {
    /// A required input was absent or blank. No prompt was built.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The model answered valid JSON of the wrong shape.
    #[error("{artifact} answer does not match the expected shape: {source}")]
    SchemaMismatch {
        artifact: Artifact,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
