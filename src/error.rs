use std::path::PathBuf;

/// Error types for the geofeedcheck library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reference dataset file was not found at the expected path.
    #[error("reference dataset not found: {path}")]
    ReferenceNotFound { path: PathBuf },

    /// Reference dataset could not be parsed as CSV.
    #[error("malformed reference dataset: {path}")]
    ReferenceParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Reference dataset parsed but contained no usable rows.
    #[error("reference dataset is empty: {path}")]
    ReferenceEmpty { path: PathBuf },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
