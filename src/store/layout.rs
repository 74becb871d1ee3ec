use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::container::{ArrayData, AttrMap, Axis};
use crate::schema::SonarModel;

/// File name of the container-level metadata document.
pub(super) const CONTAINER_DOC: &str = "container.json";
/// File name of a group's metadata document, under the group's storage path.
pub(super) const GROUP_DOC: &str = "group.json";
/// Name of the leading uncompressed entry of the single-file format.
pub(super) const MIMETYPE_ENTRY: &str = "mimetype";

/// Element type of a persisted field payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dtype {
    /// Little-endian `f64`
    Float64,
    /// Little-endian `i64`
    Int64,
    /// Fixed-width UTF-8 text, space-padded
    Text,
    /// Little-endian `i64` microseconds since the Unix epoch
    Timestamps,
}

impl Dtype {
    /// The dtype of an in-memory array payload.
    pub fn of(data: &ArrayData) -> Dtype {
        match data {
            ArrayData::Float64 { .. } => Dtype::Float64,
            ArrayData::Int64 { .. } => Dtype::Int64,
            ArrayData::Text { .. } => Dtype::Text,
            ArrayData::Timestamps { .. } => Dtype::Timestamps,
        }
    }
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Dtype::Float64 => "float64",
            Dtype::Int64 => "int64",
            Dtype::Text => "text",
            Dtype::Timestamps => "timestamps",
        };
        f.write_str(label)
    }
}

/// Chunk payload compression codec and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "codec", rename_all = "snake_case")]
pub enum Compression {
    /// DEFLATE at the given level (0-9)
    Deflate {
        /// Compression level
        level: u32,
    },
}

/// Persisted description of one data field: everything a reader needs to
/// locate and decode its chunk payloads without touching them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDoc {
    /// Field name
    pub name: String,
    /// Names of the axes indexing the field, outermost first
    pub dims: Vec<String>,
    /// Element type
    pub dtype: Dtype,
    /// True dimension lengths (empty for a scalar)
    pub shape: Vec<usize>,
    /// Fixed byte width of text elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_width: Option<usize>,
    /// Per-dimension chunk shape over the effective (scalar-normalized) shape
    pub chunks: Vec<usize>,
    /// Chunk payload compression, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<Compression>,
    /// Field attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: AttrMap,
}

/// Persisted metadata of one group. Coordinate axes are stored inline so a
/// group open never reads field bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupDoc {
    /// Coordinate axes, values inline
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub axes: Vec<Axis>,
    /// Field descriptions; payloads live in chunk files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDoc>,
    /// Group-level attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: AttrMap,
}

impl GroupDoc {
    /// Look up an axis by name.
    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.name == name)
    }

    /// Look up a field description by name.
    pub fn field(&self, name: &str) -> Option<&FieldDoc> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Container-level metadata document, stored at the container root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDoc {
    /// On-disk layout version
    pub format_version: String,
    /// Sonar model the converted data came from
    pub sonar_model: SonarModel,
    /// Root-level fields and attributes
    #[serde(default)]
    pub toplevel: GroupDoc,
}

/// Per-field chunk sizes and compression settings for one group write,
/// produced by the chunk planner. Built from the field list of the group
/// being written, so fields absent from a group never receive an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodingPlan {
    /// Encoding per field, keyed by field name
    pub fields: BTreeMap<String, FieldEncoding>,
}

impl EncodingPlan {
    /// A plan with no chunking overrides and no compression; every field is
    /// written as a single uncompressed chunk.
    pub fn none() -> Self {
        EncodingPlan::default()
    }
}

/// Chunk sizes and compression for a single field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldEncoding {
    /// Chunk size per dimension name; dimensions without an entry are written
    /// as one full-length chunk
    pub chunks: BTreeMap<String, usize>,
    /// Payload compression, if any
    pub compression: Option<Compression>,
}
