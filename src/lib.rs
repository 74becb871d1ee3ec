//! # echomerge - Multi-File Combination for Converted Echosounder Data
//!
//! `echomerge` combines N already-converted, schema-conformant echosounder
//! containers (one per raw instrument file, e.g. one per survey leg) into a
//! single consistent, time-ordered, chunk-encoded container, and provides the
//! logical dataset pointers that let downstream processing address "the raw
//! data" or "the calibrated data" without caring whether it is one file, a
//! list of files, or a directory of files.
//!
//! ## Key Features
//!
//! - **Declarative combine policies**: every `(sonar model, group)` pair maps
//!   to exactly one merge algorithm (take-first, ordered concatenation,
//!   identical-required merge, no-conflict merge, or synthesis) in a closed
//!   policy table, with no per-instrument control flow.
//!
//! - **Two container formats**: a single-file hierarchical container (`.nc`, a
//!   ZIP archive with a leading `mimetype` entry) and a directory-chunked
//!   store (`.zarr`), sharing one logical layout.
//!
//! - **Chunk-encoded output**: per-dimension chunk sizes and per-format
//!   Deflate settings are planned before each group is persisted, sized for
//!   ping-indexed random access by downstream readers.
//!
//! - **Time normalization**: absolute ping/location/MRU timestamps are
//!   rewritten to `f64` seconds since 1900-01-01 before writing, losslessly to
//!   microsecond precision.
//!
//! - **Provenance**: every combined output records the tool name/version, a
//!   UTC creation timestamp, and the exact ordered source file list.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use echomerge::combine::combine;
//! use echomerge::schema::SonarModel;
//! use echomerge::store::{combined_output_path, SaveFormat};
//!
//! let inputs = vec![PathBuf::from("leg1.nc"), PathBuf::from("leg2.nc")];
//! let output = combined_output_path(&inputs[0]); // "leg1__combined.nc"
//! combine(SonarModel::Ek60, &inputs, &output, SaveFormat::SingleFile)?;
//! # Ok::<(), echomerge::combine::CombineError>(())
//! ```
//!
//! ## Logical Dataset Pointers
//!
//! ```rust,no_run
//! use echomerge::echodata::EchoData;
//! use echomerge::schema::GroupName;
//!
//! let mut ed = EchoData::open_raw("converted")?; // directory, list, or file
//! if let Some(raw) = ed.raw() {
//!     let _beam = raw.group(GroupName::Beam)?;
//! }
//! // Derived products are absent until calibration writes them; this is a
//! // normal state, not an error.
//! assert!(ed.sv().is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Container Layout
//!
//! Both formats share one logical layout:
//!
//! ```text
//! survey__combined.nc / survey__combined.zarr
//! ├── mimetype                  # single-file format only (first entry, Stored)
//! ├── container.json            # sonar model, format version, root group
//! ├── Sonar/group.json
//! ├── Provenance/group.json
//! ├── Environment/group.json
//! ├── Beam/group.json
//! │   └── backscatter_r/0.0.0   # binary chunk files, one per chunk-grid cell
//! ├── Platform/group.json
//! ├── Platform/NMEA/group.json
//! └── Vendor/group.json
//! ```
//!
//! Group metadata documents (`group.json`) inline the coordinate axes, so
//! opening a group never touches field bytes; field payloads are read
//! chunk-by-chunk only when a field is consumed for concatenation or writing.
//!
//! ## Architecture
//!
//! - [`schema`]: sonar models, group names, combine order, axis constants
//! - [`container`]: in-memory groups, axes, fields, and attribute values
//! - [`store`]: reading/writing both persisted container formats
//! - [`combine`]: the policy table and the combination engine
//! - [`echodata`]: logical dataset pointers over raw and derived products

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod combine;
pub mod container;
pub mod echodata;
pub mod schema;
pub mod store;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::combine::{
        combine, combine_with_progress, CombineError, CombineEvent, CombinePolicy,
    };
    pub use crate::container::{ArrayData, AttrValue, Axis, DataField, Group, GroupBuilder};
    pub use crate::echodata::{CombinedView, EchoData, LogicalProduct, PathError, PathInput};
    pub use crate::schema::{GroupName, SonarModel, CONTAINER_FORMAT_VERSION, CONTAINER_MIMETYPE};
    pub use crate::store::{
        combined_output_path, remove_container, ContainerReader, ContainerWriter, SaveFormat,
        StoreError,
    };
}
