use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::container::{ArrayData, Group};
use crate::schema::{GroupName, SonarModel, CONTAINER_FORMAT_VERSION, CONTAINER_MIMETYPE};

use super::codec;
use super::format::{remove_container, SaveFormat};
use super::layout::{
    ContainerDoc, Dtype, EncodingPlan, FieldDoc, GroupDoc, CONTAINER_DOC, GROUP_DOC,
    MIMETYPE_ENTRY,
};
use super::StoreError;

/// Internal sink abstraction for writing to either a directory store or a
/// single-file ZIP container.
enum WriterSink {
    /// Directory-chunked store: one file per document or chunk
    Directory { root: PathBuf },
    /// Single-file hierarchical container: entries in a ZIP archive
    Container { zip: ZipWriter<BufWriter<File>> },
}

/// Writer for one output container.
///
/// Created once per combine call; groups are appended strictly in combine
/// order and [`ContainerWriter::finish`] seals the container by writing the
/// container-level document. Dropping the writer without finishing leaves a
/// partial container on disk, which is the documented mid-combine failure
/// behavior.
pub struct ContainerWriter {
    sink: WriterSink,
    doc: ContainerDoc,
    path: PathBuf,
    format: SaveFormat,
}

impl ContainerWriter {
    /// Create a new container at `path`, replacing any existing one
    /// (the first group is written in "create" mode, the rest append).
    pub fn create(
        path: &Path,
        format: SaveFormat,
        sonar_model: SonarModel,
    ) -> Result<Self, StoreError> {
        if path.exists() {
            log::debug!("replacing existing container at {}", path.display());
            remove_container(path)?;
        }
        let sink = match format {
            SaveFormat::Chunked => {
                fs::create_dir_all(path)?;
                WriterSink::Directory {
                    root: path.to_path_buf(),
                }
            }
            SaveFormat::SingleFile => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                let file = File::create(path)?;
                let mut zip = ZipWriter::new(BufWriter::new(file));
                // MIME marker must be the first entry and Stored so readers
                // can sniff it without inflating anything.
                zip.start_file(
                    MIMETYPE_ENTRY,
                    SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
                )?;
                zip.write_all(CONTAINER_MIMETYPE.as_bytes())?;
                WriterSink::Container { zip }
            }
        };
        Ok(ContainerWriter {
            sink,
            doc: ContainerDoc {
                format_version: CONTAINER_FORMAT_VERSION.to_string(),
                sonar_model,
                toplevel: GroupDoc::default(),
            },
            path: path.to_path_buf(),
            format,
        })
    }

    /// Output path of the container being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format of the container being written.
    pub fn save_format(&self) -> SaveFormat {
        self.format
    }

    /// Append one group. Field payloads are chunked and compressed per the
    /// supplied encoding plan; the group's metadata document is written
    /// immediately (the root group's document is held back for
    /// `container.json` at finish time).
    pub fn write_group(
        &mut self,
        name: GroupName,
        group: &Group,
        plan: &EncodingPlan,
    ) -> Result<(), StoreError> {
        let prefix = match name.storage_path() {
            Some(p) => format!("{p}/"),
            None => String::new(),
        };

        let mut field_docs = Vec::with_capacity(group.fields.len());
        for field in &group.fields {
            // Fixed-width text on disk: pin un-coerced text fields to the
            // widest value they carry.
            let mut data = field.data.clone();
            if let ArrayData::Text { width: None, .. } = data {
                let widest = match &data {
                    ArrayData::Text { values, .. } => {
                        values.iter().map(|v| v.len()).max().unwrap_or(0)
                    }
                    _ => 0,
                };
                data.coerce_text_width(widest);
            }

            let encoding = plan.fields.get(&field.name);
            let shape = data.shape().to_vec();
            let eff_shape = codec::effective_shape(&shape);
            let chunks: Vec<usize> = eff_shape
                .iter()
                .enumerate()
                .map(|(d, len)| {
                    let planned = field
                        .dims
                        .get(d)
                        .and_then(|dim| encoding.and_then(|e| e.chunks.get(dim)))
                        .copied()
                        .unwrap_or(*len);
                    planned.clamp(1, (*len).max(1))
                })
                .collect();
            let compression = encoding.and_then(|e| e.compression);

            let doc = FieldDoc {
                name: field.name.clone(),
                dims: field.dims.clone(),
                dtype: Dtype::of(&data),
                shape: shape.clone(),
                text_width: data.text_width(),
                chunks: chunks.clone(),
                compression,
                attrs: field.attrs.clone(),
            };

            let elem = codec::element_size(doc.dtype, doc.text_width.unwrap_or(0));
            let full = codec::encode_elements(&data)?;
            for idx in codec::chunk_indices(&codec::chunk_counts(&eff_shape, &chunks)) {
                let ranges = codec::chunk_ranges(&eff_shape, &chunks, &idx);
                let raw = codec::extract_chunk(&full, &eff_shape, elem, &ranges);
                let payload = codec::compress(raw, compression)?;
                let rel = format!("{prefix}{}/{}", field.name, codec::chunk_key(&idx));
                self.write_bytes(&rel, &payload, CompressionMethod::Stored)?;
            }
            field_docs.push(doc);
        }

        let doc = GroupDoc {
            axes: group.axes.clone(),
            fields: field_docs,
            attrs: group.attrs.clone(),
        };
        if name == GroupName::TopLevel {
            self.doc.toplevel = doc;
        } else {
            let rel = format!("{prefix}{GROUP_DOC}");
            let json = serde_json::to_vec_pretty(&doc)?;
            self.write_bytes(&rel, &json, CompressionMethod::Deflated)?;
        }
        Ok(())
    }

    /// Seal the container: write `container.json` and, for the single-file
    /// format, the ZIP central directory.
    pub fn finish(mut self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&self.doc)?;
        self.write_bytes(CONTAINER_DOC, &json, CompressionMethod::Deflated)?;
        match self.sink {
            WriterSink::Directory { .. } => {}
            WriterSink::Container { zip } => {
                zip.finish()?.flush()?;
            }
        }
        Ok(())
    }

    fn write_bytes(
        &mut self,
        rel: &str,
        bytes: &[u8],
        method: CompressionMethod,
    ) -> Result<(), StoreError> {
        match &mut self.sink {
            WriterSink::Directory { root } => {
                let path = root.join(rel);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, bytes)?;
            }
            WriterSink::Container { zip } => {
                zip.start_file(
                    rel,
                    SimpleFileOptions::default().compression_method(method),
                )?;
                zip.write_all(bytes)?;
            }
        }
        Ok(())
    }
}
