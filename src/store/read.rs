use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::container::{ArrayData, DataField, Group};
use crate::schema::{GroupName, SonarModel};

use super::codec;
use super::format::SaveFormat;
use super::layout::{ContainerDoc, FieldDoc, GroupDoc, CONTAINER_DOC, GROUP_DOC};
use super::StoreError;

/// Internal source abstraction mirroring [`super::write::ContainerWriter`]'s
/// sink.
enum ReaderSource {
    /// Directory-chunked store
    Directory { root: PathBuf },
    /// Single-file hierarchical container
    Container { archive: ZipArchive<BufReader<File>> },
}

/// Reader over one converted or combined container.
///
/// Opening a container reads only `container.json`. Group metadata documents
/// (with their inline axes) and field chunk payloads are fetched on demand,
/// so a field's bytes are touched only when the field is materialized for
/// concatenation or inspection.
pub struct ContainerReader {
    source: ReaderSource,
    doc: ContainerDoc,
    path: PathBuf,
    format: SaveFormat,
}

impl std::fmt::Debug for ContainerReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerReader")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

impl ContainerReader {
    /// Open a container, detecting the format from the path extension.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let format = SaveFormat::from_path(path)
            .ok_or_else(|| StoreError::UnrecognizedPath(path.to_path_buf()))?;
        let mut source = match format {
            SaveFormat::Chunked => ReaderSource::Directory {
                root: path.to_path_buf(),
            },
            SaveFormat::SingleFile => {
                let file = File::open(path)?;
                ReaderSource::Container {
                    archive: ZipArchive::new(BufReader::new(file))?,
                }
            }
        };
        let doc_bytes = read_bytes(&mut source, CONTAINER_DOC)?.ok_or_else(|| {
            StoreError::InvalidContainer(format!("{} missing {CONTAINER_DOC}", path.display()))
        })?;
        let doc: ContainerDoc = serde_json::from_slice(&doc_bytes)?;
        Ok(ContainerReader {
            source,
            doc,
            path: path.to_path_buf(),
            format,
        })
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detected save format.
    pub fn save_format(&self) -> SaveFormat {
        self.format
    }

    /// Sonar model recorded in the container document.
    pub fn sonar_model(&self) -> SonarModel {
        self.doc.sonar_model
    }

    /// Whether the named group exists in this container.
    pub fn has_group(&mut self, name: GroupName) -> Result<bool, StoreError> {
        match name.storage_path() {
            None => Ok(true),
            Some(path) => {
                let rel = format!("{path}/{GROUP_DOC}");
                Ok(read_bytes(&mut self.source, &rel)?.is_some())
            }
        }
    }

    /// Read a group's metadata document: inline axes, attributes, and field
    /// descriptions. Never touches field payload bytes.
    pub fn read_group_meta(&mut self, name: GroupName) -> Result<GroupDoc, StoreError> {
        match name.storage_path() {
            None => Ok(self.doc.toplevel.clone()),
            Some(path) => {
                let rel = format!("{path}/{GROUP_DOC}");
                let bytes = read_bytes(&mut self.source, &rel)?.ok_or_else(|| {
                    StoreError::GroupNotFound {
                        container: self.path.clone(),
                        group: name.label().to_string(),
                    }
                })?;
                Ok(serde_json::from_slice(&bytes)?)
            }
        }
    }

    /// Materialize one field by assembling its chunk payloads.
    pub fn read_field(
        &mut self,
        name: GroupName,
        field: &FieldDoc,
    ) -> Result<ArrayData, StoreError> {
        let prefix = match name.storage_path() {
            Some(p) => format!("{p}/"),
            None => String::new(),
        };
        let eff_shape = codec::effective_shape(&field.shape);
        let elem = codec::element_size(field.dtype, field.text_width.unwrap_or(0));
        let total: usize = eff_shape.iter().product();
        let mut full = vec![0u8; total * elem];
        for idx in codec::chunk_indices(&codec::chunk_counts(&eff_shape, &field.chunks)) {
            let rel = format!("{prefix}{}/{}", field.name, codec::chunk_key(&idx));
            let payload = read_bytes(&mut self.source, &rel)?.ok_or_else(|| {
                StoreError::InvalidContainer(format!(
                    "{}: missing chunk {rel}",
                    self.path.display()
                ))
            })?;
            let raw = codec::decompress(payload, field.compression)?;
            let ranges = codec::chunk_ranges(&eff_shape, &field.chunks, &idx);
            codec::place_chunk(&mut full, &eff_shape, elem, &ranges, &raw)?;
        }
        codec::decode_array(field.dtype, field.text_width, field.shape.clone(), &full)
    }

    /// Read a whole group: metadata plus every field payload.
    pub fn read_group(&mut self, name: GroupName) -> Result<Group, StoreError> {
        let meta = self.read_group_meta(name)?;
        self.group_from_meta(name, &meta)
    }

    /// Materialize a group from a metadata document previously obtained with
    /// [`ContainerReader::read_group_meta`].
    pub fn group_from_meta(
        &mut self,
        name: GroupName,
        meta: &GroupDoc,
    ) -> Result<Group, StoreError> {
        let mut fields = Vec::with_capacity(meta.fields.len());
        for doc in &meta.fields {
            let data = self.read_field(name, doc)?;
            fields.push(DataField {
                name: doc.name.clone(),
                dims: doc.dims.clone(),
                data,
                attrs: doc.attrs.clone(),
            });
        }
        Ok(Group {
            axes: meta.axes.clone(),
            fields,
            attrs: meta.attrs.clone(),
        })
    }
}

/// Fetch one entry's bytes, `None` if the entry does not exist.
fn read_bytes(source: &mut ReaderSource, rel: &str) -> Result<Option<Vec<u8>>, StoreError> {
    match source {
        ReaderSource::Directory { root } => {
            let path = root.join(rel);
            if !path.is_file() {
                return Ok(None);
            }
            Ok(Some(fs::read(path)?))
        }
        ReaderSource::Container { archive } => match archive.by_name(rel) {
            Ok(mut entry) => {
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut bytes)?;
                Ok(Some(bytes))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        },
    }
}
