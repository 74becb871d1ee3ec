//! Chunk/encoding planning.
//!
//! Downstream readers perform ping-indexed random access; chunk sizes trade
//! memory footprint against read amplification. The Beam group (largest,
//! range-indexed) takes a wide range-bin chunk with a narrow ping chunk to
//! bound working-set size during incremental computation. The sizes are
//! tunable defaults, not invariants.

use crate::container::Group;
use crate::schema::{axes, GroupName};
use crate::store::{Compression, EncodingPlan, FieldEncoding, SaveFormat};

/// Chunk length along `range_bin`.
pub const RANGE_BIN_CHUNK: usize = 25_000;
/// Chunk length along `ping_time` for environment-scale groups.
pub const ENVIRONMENT_TIME_CHUNK: usize = 2_500;
/// Chunk length along `ping_time` for beam/platform-scale groups, and along
/// `location_time`/`mru_time` everywhere.
pub const NAV_TIME_CHUNK: usize = 100;

/// Compression applied to the single-file hierarchical format.
pub const SINGLE_FILE_COMPRESSION: Compression = Compression::Deflate { level: 4 };
/// Compression applied to the directory-chunked format.
pub const CHUNKED_COMPRESSION: Compression = Compression::Deflate { level: 9 };

/// Chunk length for one dimension of one group, `None` when the dimension is
/// written as a single full-length chunk.
pub fn chunk_size_for(group: GroupName, dim: &str) -> Option<usize> {
    if dim == axes::RANGE_BIN {
        Some(RANGE_BIN_CHUNK)
    } else if dim == axes::PING_TIME {
        if group == GroupName::Environment {
            Some(ENVIRONMENT_TIME_CHUNK)
        } else {
            Some(NAV_TIME_CHUNK)
        }
    } else if dim == axes::LOCATION_TIME || dim == axes::MRU_TIME {
        Some(NAV_TIME_CHUNK)
    } else {
        None
    }
}

/// Build the encoding plan for one group about to be persisted. The plan is
/// keyed by field name and built from the field list of this group, so fields
/// absent from the group never receive a spurious entry; the compression
/// settings of the two formats are independent.
pub fn plan_group(name: GroupName, group: &Group, format: SaveFormat) -> EncodingPlan {
    let compression = match format {
        SaveFormat::SingleFile => SINGLE_FILE_COMPRESSION,
        SaveFormat::Chunked => CHUNKED_COMPRESSION,
    };
    let mut plan = EncodingPlan::default();
    for field in &group.fields {
        let mut encoding = FieldEncoding {
            chunks: Default::default(),
            compression: Some(compression),
        };
        for dim in &field.dims {
            if let Some(size) = chunk_size_for(name, dim) {
                encoding.chunks.insert(dim.clone(), size);
            }
        }
        plan.fields.insert(field.name.clone(), encoding);
    }
    plan
}
