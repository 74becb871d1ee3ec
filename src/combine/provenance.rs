//! Provenance synthesis.
//!
//! The combined output's `Provenance` group is never read from the inputs; it
//! is produced fresh on every combine call and records how the output was
//! made. Attribute names are fixed by the format family.

use std::path::PathBuf;

use chrono::Utc;

use crate::container::Group;

/// Name of the tool that produced the combined container.
pub const CONVERSION_SOFTWARE_NAME: &str = "conversion_software_name";
/// Version of the tool that produced the combined container.
pub const CONVERSION_SOFTWARE_VERSION: &str = "conversion_software_version";
/// UTC creation timestamp, second precision, trailing `Z`.
pub const CONVERSION_TIME: &str = "conversion_time";
/// Ordered list of source paths exactly as provided.
pub const SRC_FILENAMES: &str = "src_filenames";

/// Build the provenance group for a combine over `source_paths`. Always
/// succeeds; the source list is recorded verbatim, with no canonicalization.
pub fn synthesize(source_paths: &[PathBuf]) -> Group {
    let sources: Vec<String> = source_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    Group::builder()
        .attr(CONVERSION_SOFTWARE_NAME, env!("CARGO_PKG_NAME"))
        .attr(CONVERSION_SOFTWARE_VERSION, env!("CARGO_PKG_VERSION"))
        .attr(
            CONVERSION_TIME,
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        )
        .attr(SRC_FILENAMES, sources)
        .build()
}
