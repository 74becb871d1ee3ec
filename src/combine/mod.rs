//! # Combination Engine
//!
//! Merges N converted containers into one consistent, time-ordered,
//! chunk-encoded output, group by group in a fixed order: Top-level, Sonar,
//! Provenance, Environment, Beam, Platform, Platform/NMEA (when the model
//! carries it), Vendor. Each group is written to the output before the next
//! is processed, so a partially written output exists on mid-combine failure;
//! there is no rollback, and cleanup is the caller's job via
//! [`crate::store::remove_container`].
//!
//! Model-specific behavior is never control flow: every `(sonar model,
//! group)` pair resolves through the [`policy`] table to exactly one
//! [`CombinePolicy`] plus its text coercions. The engine executes the policy,
//! runs the [`datetime`] normalizer over any time-like axes, asks the
//! [`plan`] module for per-field chunk sizes and compression, and appends the
//! result to the output container.
//!
//! Every failure is tagged with the offending group and policy, and progress
//! is reported through a caller-supplied [`CombineEvent`] callback rather
//! than any particular output sink.

pub mod datetime;
pub mod plan;
pub mod policy;
pub mod provenance;

mod apply;
mod engine;
mod error;
mod progress;


pub use engine::{combine, combine_with_progress};
pub use error::CombineError;
pub use policy::{plan_for, CombinePolicy, GroupPlan, TextCoercion};
pub use progress::CombineEvent;

pub(crate) use apply::{concat_axes_for, concat_group, merge_group, MergeMode};
