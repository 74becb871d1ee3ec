use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::StoreError;

/// The two persisted container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// Single-file hierarchical container (`.nc`)
    SingleFile,
    /// Directory-chunked store (`.zarr`)
    Chunked,
}

impl SaveFormat {
    /// Detect the format from a path's extension, the sole authority for
    /// format dispatch (a `.zarr` store is a directory on disk, but callers
    /// may name one that does not exist yet).
    pub fn from_path(path: &Path) -> Option<SaveFormat> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("nc") => Some(SaveFormat::SingleFile),
            Some("zarr") => Some(SaveFormat::Chunked),
            _ => None,
        }
    }

    /// Canonical file extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::SingleFile => "nc",
            SaveFormat::Chunked => "zarr",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            SaveFormat::SingleFile => "single-file hierarchical",
            SaveFormat::Chunked => "directory-chunked",
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derive the combined-output path from the first input path by inserting a
/// `__combined` marker before the extension.
///
/// ```rust
/// use std::path::Path;
/// use echomerge::store::combined_output_path;
///
/// let out = combined_output_path(Path::new("survey/leg1.nc"));
/// assert_eq!(out, Path::new("survey/leg1__combined.nc").to_path_buf());
/// ```
pub fn combined_output_path(first_input: &Path) -> PathBuf {
    let stem = first_input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match first_input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}__combined.{ext}"),
        None => format!("{stem}__combined"),
    };
    first_input.with_file_name(name)
}

/// Delete a container: recursively for a directory-chunked store, as a single
/// file otherwise. Deleting per-file inputs after a combine is always an
/// explicit, separate call, never automatic.
pub fn remove_container(path: &Path) -> Result<(), StoreError> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}
