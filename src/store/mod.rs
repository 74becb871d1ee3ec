//! # Container Store
//!
//! Reading and writing the two persisted container formats:
//!
//! - **Single-file hierarchical** (`.nc`): a ZIP archive whose first entry is
//!   an uncompressed `mimetype` marker, followed by per-group metadata
//!   documents and binary chunk payloads.
//! - **Directory-chunked** (`.zarr`): the same logical layout as a directory
//!   tree, one file per metadata document or chunk.
//!
//! ```text
//! <container root>
//! ├── mimetype                    # single-file format only
//! ├── container.json              # ContainerDoc: model, version, root group
//! ├── <Group>/group.json          # GroupDoc: axes (inline), attrs, field docs
//! └── <Group>/<field>/<i.j.k>     # one payload per chunk-grid cell
//! ```
//!
//! Group metadata documents inline the coordinate axes; field payloads are
//! encoded row-major, split on the per-dimension chunk grid recorded in the
//! field's [`FieldDoc`], and optionally Deflate-compressed per the
//! [`EncodingPlan`] the chunk planner supplies. Reads mirror this: opening a
//! container or a group touches only metadata, and field bytes are fetched
//! chunk-by-chunk when a field is actually materialized.
//!
//! Writers follow "create on first group, append thereafter" semantics: the
//! combination engine writes each group before processing the next, so a
//! partially written container exists on mid-combine failure. Cleanup of such
//! partial output is the caller's job, via [`remove_container`].

mod codec;
mod error;
mod format;
mod layout;
mod read;
mod write;


pub use error::StoreError;
pub use format::{combined_output_path, remove_container, SaveFormat};
pub use layout::{
    Compression, ContainerDoc, Dtype, EncodingPlan, FieldDoc, FieldEncoding, GroupDoc,
};
pub use read::ContainerReader;
pub use write::ContainerWriter;
