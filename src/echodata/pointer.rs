use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::store::SaveFormat;

use super::error::PathError;
use super::product::LogicalProduct;
use super::view::CombinedView;

/// User-supplied path input: a single string-like path or an explicit
/// ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathInput {
    /// A path string: resolved as a single container or a directory
    Path(PathBuf),
    /// An explicit ordered list, preserved verbatim
    List(Vec<PathBuf>),
}

impl From<&str> for PathInput {
    fn from(s: &str) -> Self {
        PathInput::Path(PathBuf::from(s))
    }
}

impl From<String> for PathInput {
    fn from(s: String) -> Self {
        PathInput::Path(PathBuf::from(s))
    }
}

impl From<&Path> for PathInput {
    fn from(p: &Path) -> Self {
        PathInput::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for PathInput {
    fn from(p: PathBuf) -> Self {
        PathInput::Path(p)
    }
}

impl From<Vec<PathBuf>> for PathInput {
    fn from(paths: Vec<PathBuf>) -> Self {
        PathInput::List(paths)
    }
}

/// The resolved shape of a path specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    /// A single container file or store
    File(PathBuf),
    /// An explicit ordered list
    Files(Vec<PathBuf>),
    /// A directory whose container children were listed lexically
    Directory(PathBuf),
}

/// One logical product's pointer record: path specification, resolved
/// ordered file list, and lazily-opened combined view.
///
/// All mutation goes through [`ProductPointer::set_path`]; the view is
/// recomputed, never mutated in place.
#[derive(Debug)]
pub struct ProductPointer {
    product: LogicalProduct,
    spec: Option<PathSpec>,
    resolved: Vec<PathBuf>,
    view: Option<CombinedView>,
}

impl ProductPointer {
    /// A pointer with no path assigned.
    pub fn new(product: LogicalProduct) -> Self {
        ProductPointer {
            product,
            spec: None,
            resolved: Vec::new(),
            view: None,
        }
    }

    /// The product this pointer serves.
    pub fn product(&self) -> LogicalProduct {
        self.product
    }

    /// The current path specification, if any.
    pub fn spec(&self) -> Option<&PathSpec> {
        self.spec.as_ref()
    }

    /// The resolved ordered file list.
    pub fn resolved(&self) -> &[PathBuf] {
        &self.resolved
    }

    /// Whether the product currently points at any data.
    pub fn is_available(&self) -> bool {
        !self.resolved.is_empty()
    }

    /// Assign, replace, or clear (`None`) the path specification.
    ///
    /// Resolution rules: a path with a recognized container extension is a
    /// single file; a path with no extension is a directory whose immediate
    /// children with recognized extensions become the ordered list, lexical
    /// order; an explicit list is preserved exactly. Anything else is
    /// [`PathError::UnsupportedPathSpec`]. On success the previous resolved
    /// list and view are discarded; on failure the pointer is unchanged.
    pub fn set_path(&mut self, input: Option<PathInput>) -> Result<(), PathError> {
        let (spec, resolved) = match input {
            None => (None, Vec::new()),
            Some(PathInput::List(paths)) => (Some(PathSpec::Files(paths.clone())), paths),
            Some(PathInput::Path(path)) => {
                if SaveFormat::from_path(&path).is_some() {
                    (Some(PathSpec::File(path.clone())), vec![path])
                } else if path.extension().is_none() {
                    let listed = list_directory(&path)?;
                    (Some(PathSpec::Directory(path)), listed)
                } else {
                    return Err(PathError::UnsupportedPathSpec(
                        path.display().to_string(),
                    ));
                }
            }
        };
        self.spec = spec;
        self.resolved = resolved;
        self.view = None;
        Ok(())
    }

    /// The lazily-opened combined view over the resolved files, `None` when
    /// no data is pointed at (an expected state before calibration, not an
    /// error). No container bytes are read until the view is first used.
    pub fn view(&mut self) -> Option<&CombinedView> {
        if self.resolved.is_empty() {
            info!("{}: {}", self.product, self.product.absent_hint());
            return None;
        }
        if self.view.is_none() {
            self.view = Some(CombinedView::new(self.resolved.clone()));
        }
        self.view.as_ref()
    }
}

/// Immediate container children of a directory, lexical order.
fn list_directory(path: &Path) -> Result<Vec<PathBuf>, PathError> {
    let entries = fs::read_dir(path).map_err(|source| PathError::DirectoryList {
        path: path.to_path_buf(),
        source,
    })?;
    let mut listed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PathError::DirectoryList {
            path: path.to_path_buf(),
            source,
        })?;
        let child = entry.path();
        if SaveFormat::from_path(&child).is_some() {
            listed.push(child);
        }
    }
    listed.sort();
    Ok(listed)
}
