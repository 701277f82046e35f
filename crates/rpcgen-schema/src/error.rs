//! Errors raised while loading, validating and emitting definitions.

use std::path::PathBuf;

/// Every failure of the pipeline. None of them is recovered locally: the
/// first one aborts the batch and nothing is written.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0} is a reserved keyword or has reserved suffix 'Params', use a different name")]
    ReservedName(String),

    #[error("duplicate field name (first letter is case insensitive): {name} ({normalized})")]
    DuplicateField { name: String, normalized: String },

    #[error("duplicate model name: {0}")]
    DuplicateModel(String),

    #[error("{0} needs at least one argument or 'return'")]
    EmptyMethod(String),

    #[error("could not parse type: {0}")]
    UnparseableType(String),

    #[error("missing open or close bracket: {0}")]
    MissingBracket(String),

    #[error("not a base type: {0}")]
    NotBaseType(String),

    #[error("unable to format generated code: {0}")]
    Emit(String),
}

pub type Result<T> = std::result::Result<T, Error>;
