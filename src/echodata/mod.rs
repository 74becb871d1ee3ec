//! # Logical Dataset Pointers
//!
//! Downstream processing addresses data by role (raw backscatter, calibrated
//! Sv, cleaned Sv, target strength, aggregated MVBS), not by file path. Each
//! [`LogicalProduct`] is backed by a [`ProductPointer`]: an explicit record
//! of the user-supplied path specification (single path, ordered list, or
//! directory), the resolved ordered file list, and a lazily-opened combined
//! read-only view. Mutation goes through a single entry point,
//! [`ProductPointer::set_path`]; reassigning a path discards the previous
//! resolution and view, and clearing it empties both.
//!
//! Absence of derived data before calibration is a normal state, not an
//! error: accessing an unset product yields `None` plus a log hint, never a
//! failure.

mod error;
mod pointer;
mod product;
mod session;
mod view;


pub use error::PathError;
pub use pointer::{PathInput, PathSpec, ProductPointer};
pub use product::LogicalProduct;
pub use session::EchoData;
pub use view::CombinedView;
