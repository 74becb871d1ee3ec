//! # Group Schema
//!
//! The fixed vocabulary a converted container must expose: the sonar model
//! family, the closed set of named subgroups with their storage paths and
//! combine order, and the coordinate-axis names shared across the format
//! family. Everything here is data-only; the combine behavior attached to
//! each `(SonarModel, GroupName)` pair lives in [`crate::combine::policy`].

pub mod axes;
pub mod fields;

mod groups;
mod model;

#[cfg(test)]
mod tests;

pub use groups::GroupName;
pub use model::{SonarModel, UnknownSonarModel};

/// Version string of the on-disk container layout.
pub const CONTAINER_FORMAT_VERSION: &str = "1.0";

/// MIME type stored as the first (uncompressed) entry of the single-file
/// hierarchical container.
pub const CONTAINER_MIMETYPE: &str = "application/vnd.echomerge";
