use std::path::PathBuf;

use crate::schema::GroupName;

/// Progress events emitted by the combination engine.
///
/// The engine reports through a caller-supplied callback and the `log`
/// facade; it never depends on a particular output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineEvent {
    /// The combine call started
    Started {
        /// Number of input containers
        inputs: usize,
    },
    /// One group was combined and appended to the output
    GroupWritten {
        /// The group just written
        group: GroupName,
    },
    /// The output container was sealed
    Completed {
        /// Path of the combined output
        output: PathBuf,
    },
}
