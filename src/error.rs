use crate::host::DType;

use imvdb_storage::{ArchiveError, MetaError, ParseGridClassError};

/// Everything that can go wrong at the adapter boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("expected an array of {expected}, found {found}")]
    TypeMismatch { expected: DType, found: DType },
    #[error("bad array shape: {0}")]
    Shape(String),
    #[error("grid has no \"{0}\" metadata")]
    MissingMetadata(String),
    #[error(transparent)]
    Metadata(MetaError),
    #[error("unknown grid class \"{0}\"")]
    InvalidGridClass(String),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<MetaError> for Error {
    fn from(e: MetaError) -> Self {
        match e {
            MetaError::Missing(key) => Error::MissingMetadata(key),
            e => Error::Metadata(e),
        }
    }
}

impl From<ParseGridClassError> for Error {
    fn from(e: ParseGridClassError) -> Self {
        Error::InvalidGridClass(e.0)
    }
}
