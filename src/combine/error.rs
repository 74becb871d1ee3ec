use crate::schema::GroupName;
use crate::store::StoreError;

use super::policy::CombinePolicy;

/// Errors raised by the combination engine.
///
/// Every failure reflects a caller or input defect, not a transient
/// condition, so the engine never retries; on any group failure it aborts,
/// leaving the partially written output on disk for the caller to clean up.
#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    /// The ordered input list was empty
    #[error("no input containers were provided")]
    NoInputs,

    /// Inputs disagree on sonar model, channel set, or group shape
    #[error("schema mismatch: {detail}")]
    SchemaMismatch {
        /// Offending group, when the mismatch is group-local
        group: Option<GroupName>,
        /// What disagreed
        detail: String,
    },

    /// A concat axis is not non-decreasing within an input or across the
    /// given input order
    #[error("time ordering violation in {group} group along '{axis}'")]
    TimeOrderingViolation {
        /// Offending group
        group: GroupName,
        /// Offending axis
        axis: String,
    },

    /// An identical-required or no-conflicts merge saw differing values
    #[error("conflicting metadata in {group} group ({policy}): '{key}' differs between inputs")]
    ConflictingMetadata {
        /// Offending group
        group: GroupName,
        /// Policy that rejected the conflict
        policy: CombinePolicy,
        /// Axis, field, or attribute that disagreed
        key: String,
    },

    /// Output or input container format is not supported
    #[error("unsupported container format: {0}")]
    UnsupportedFormat(String),

    /// Underlying container store failure
    #[error("container store failure: {source}")]
    Store {
        /// Group being processed when the store failed, if any
        group: Option<GroupName>,
        /// Store error
        #[source]
        source: StoreError,
    },
}

impl CombineError {
    /// Wrap a store error with the group being processed, promoting
    /// unrecognized-path failures to the format taxonomy.
    pub(crate) fn from_store(group: Option<GroupName>, source: StoreError) -> Self {
        match source {
            StoreError::UnrecognizedPath(path) => {
                CombineError::UnsupportedFormat(path.display().to_string())
            }
            source => CombineError::Store { group, source },
        }
    }
}
