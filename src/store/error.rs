use std::path::PathBuf;

/// Errors that can occur while reading or writing a container store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the ZIP container library
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error serializing/deserializing a metadata document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Path does not carry a recognized container extension
    #[error("not a recognized container path (expected .nc or .zarr): {0}")]
    UnrecognizedPath(PathBuf),

    /// Structurally invalid container contents
    #[error("invalid container: {0}")]
    InvalidContainer(String),

    /// A requested group is not present in the container
    #[error("group '{group}' not found in {container}")]
    GroupNotFound {
        /// Container the lookup ran against
        container: PathBuf,
        /// Label of the missing group
        group: String,
    },
}
