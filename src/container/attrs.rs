use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered attribute map attached to groups, axes and fields.
///
/// `BTreeMap` keeps serialization deterministic: re-combining the same inputs
/// must produce identical documents apart from the provenance timestamp.
pub type AttrMap = BTreeMap<String, AttrValue>;

/// A single attribute value.
///
/// The format family restricts attributes to scalars and flat lists; unit and
/// long-name strings, valid ranges, and source-file lists all fit here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Integer scalar
    Int(i64),
    /// Floating-point scalar
    Float(f64),
    /// String scalar
    Text(String),
    /// Flat list of floats (e.g. `valid_range`)
    FloatList(Vec<f64>),
    /// Flat list of strings (e.g. `src_filenames`)
    TextList(Vec<String>),
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        AttrValue::FloatList(v)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(v: Vec<String>) -> Self {
        AttrValue::TextList(v)
    }
}

impl AttrValue {
    /// The value as a string slice, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}
