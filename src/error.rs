//! Custom error types and result handling for cbz2epub operations.
//!
//! Every fallible operation in the crate returns a [`Result<T>`], a type alias for
//! `std::result::Result<T, Error>`. The three container errors ([`Error::Open`],
//! [`Error::Read`], [`Error::Write`]) carry the path they relate to so callers can
//! report them without extra context.
//!
use std::path::PathBuf;

/// Type alias for Results with cbz2epub errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all cbz2epub operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The input container is missing, unreadable, or not a valid zip archive
    #[error("Failed to open archive '{path:?}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    /// An entry exists in the container but its data cannot be read
    #[error("Failed to read entry '{entry}' from '{path:?}': {source}")]
    Read {
        path: PathBuf,
        entry: String,
        #[source]
        source: std::io::Error,
    },
    /// The output container or one of its entries cannot be created or written
    #[error("Failed to write '{path:?}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// I/O errors from the standard library
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A blocking conversion task panicked or was cancelled
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    ConverterBuilder(#[from] crate::converter::ConverterConfigBuilderError),
    /// Merge or convert was requested without any input file
    #[error("No input files specified")]
    NoInputs,
}

impl Error {
    /// Wraps a zip-level write failure into [`Error::Write`] for `path`.
    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<WriteSource>) -> Self {
        Error::Write {
            path: path.into(),
            source: source.into().0,
        }
    }
}

/// Normalizes the two error types a `ZipWriter` can produce into an `io::Error`.
pub(crate) struct WriteSource(std::io::Error);

impl From<std::io::Error> for WriteSource {
    fn from(error: std::io::Error) -> Self {
        WriteSource(error)
    }
}

impl From<zip::result::ZipError> for WriteSource {
    fn from(error: zip::result::ZipError) -> Self {
        match error {
            zip::result::ZipError::Io(io) => WriteSource(io),
            other => WriteSource(std::io::Error::other(other)),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
