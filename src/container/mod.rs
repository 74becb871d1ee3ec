//! # In-Memory Data Model
//!
//! A converted container is a set of named groups; a group holds ordered
//! coordinate axes, data fields indexed by those axes, and group-level
//! attributes. This module defines those types plus [`GroupBuilder`], the
//! shape converter collaborators feed when producing per-file containers.
//!
//! Array payloads are carried by [`ArrayData`], a small closed set of element
//! types: `f64`, `i64`, fixed-width text, and absolute timestamps. The
//! timestamp form exists in memory only, before normalization; persisted
//! containers hold epoch-offset seconds instead (see
//! [`crate::combine::datetime`]).

mod array;
mod attrs;
mod group;


pub use array::ArrayData;
pub use attrs::{AttrMap, AttrValue};
pub use group::{Axis, DataField, Group, GroupBuilder};

pub(crate) use array::OrderKey;
