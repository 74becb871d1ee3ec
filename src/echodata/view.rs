use std::path::PathBuf;

use crate::combine::{concat_axes_for, concat_group, CombineError, CombinePolicy};
use crate::container::Group;
use crate::schema::{GroupName, SonarModel};
use crate::store::ContainerReader;

/// A read-only combined view over one or more container files.
///
/// Constructing a view reads nothing; containers are opened on each group
/// access and groups spanning multiple files are combined on the fly with
/// ordered-concatenation semantics along whatever time axes the group
/// carries. The view is never mutated in place; when the underlying files
/// change, the owning pointer recomputes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedView {
    paths: Vec<PathBuf>,
}

impl CombinedView {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        CombinedView { paths }
    }

    /// The resolved ordered file list backing the view.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Sonar model recorded in the first backing container.
    pub fn sonar_model(&self) -> Result<SonarModel, CombineError> {
        let reader = ContainerReader::open(&self.paths[0])
            .map_err(|e| CombineError::from_store(None, e))?;
        Ok(reader.sonar_model())
    }

    /// Root-level fields and attributes, combined across the backing files.
    pub fn toplevel(&self) -> Result<Option<Group>, CombineError> {
        self.group(GroupName::TopLevel)
    }

    /// Read one group across the backing files.
    ///
    /// `Ok(None)` when no backing file carries the group (derived products
    /// hold no Beam group, for example). With several backing files the
    /// group is concatenated along its time axes; groups without time axes
    /// are taken from the first file after the others are checked to carry
    /// them too.
    pub fn group(&self, name: GroupName) -> Result<Option<Group>, CombineError> {
        let mut readers = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let reader =
                ContainerReader::open(path).map_err(|e| CombineError::from_store(None, e))?;
            readers.push(reader);
        }

        let mut present = Vec::with_capacity(readers.len());
        for reader in readers.iter_mut() {
            present.push(
                reader
                    .has_group(name)
                    .map_err(|e| CombineError::from_store(Some(name), e))?,
            );
        }
        if present.iter().all(|p| !p) {
            return Ok(None);
        }
        if !present.iter().all(|p| *p) {
            return Err(CombineError::SchemaMismatch {
                group: Some(name),
                detail: format!("'{name}' group present in only some of the backing files"),
            });
        }

        if readers.len() == 1 {
            let group = readers[0]
                .read_group(name)
                .map_err(|e| CombineError::from_store(Some(name), e))?;
            return Ok(Some(group));
        }

        let meta = readers[0]
            .read_group_meta(name)
            .map_err(|e| CombineError::from_store(Some(name), e))?;
        let axes = concat_axes_for(&meta);
        if axes.is_empty() {
            let group = readers[0]
                .read_group(name)
                .map_err(|e| CombineError::from_store(Some(name), e))?;
            return Ok(Some(group));
        }
        let group = concat_group(
            name,
            CombinePolicy::ConcatOrdered { axes: &[] },
            &mut readers,
            &axes,
            true,
        )?;
        Ok(Some(group))
    }
}
