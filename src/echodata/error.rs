use std::path::PathBuf;

/// Errors raised while resolving a path specification.
///
/// A path error is local to the pointer it was raised on; other pointers of
/// the same session are unaffected, and the failing pointer keeps its
/// previous resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The specification is neither a recognized container path, a
    /// directory, nor an explicit ordered list
    #[error("unsupported path specification: {0}")]
    UnsupportedPathSpec(String),

    /// A directory specification could not be listed
    #[error("cannot list directory {path}: {source}")]
    DirectoryList {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}
