use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shaped array payload, row-major.
///
/// `shape` is the dimension-length list; a scalar has an empty shape and
/// exactly one value. Text arrays carry an optional fixed byte width: once a
/// width is set every value is at most `width` bytes and the on-disk encoding
/// pads to exactly `width` (container formats reject variable-width text
/// arrays spanning files).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", rename_all = "snake_case")]
pub enum ArrayData {
    /// 64-bit floats
    Float64 {
        /// Dimension lengths, row-major
        shape: Vec<usize>,
        /// Flattened values
        values: Vec<f64>,
    },
    /// 64-bit signed integers
    Int64 {
        /// Dimension lengths, row-major
        shape: Vec<usize>,
        /// Flattened values
        values: Vec<i64>,
    },
    /// Text values, optionally pinned to a fixed byte width
    Text {
        /// Dimension lengths, row-major
        shape: Vec<usize>,
        /// Fixed byte width, set by coercion or at encode time
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<usize>,
        /// Flattened values
        values: Vec<String>,
    },
    /// Absolute UTC timestamps (pre-normalization time axes)
    Timestamps {
        /// Dimension lengths, row-major
        shape: Vec<usize>,
        /// Flattened values
        values: Vec<DateTime<Utc>>,
    },
}

/// Scalar ordering key used for monotonicity checks on concat axes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub(crate) enum OrderKey {
    Float(f64),
    Int(i64),
    Time(i64),
}

impl ArrayData {
    /// One-dimensional float array.
    pub fn f64_1d(values: Vec<f64>) -> Self {
        ArrayData::Float64 {
            shape: vec![values.len()],
            values,
        }
    }

    /// One-dimensional integer array.
    pub fn i64_1d(values: Vec<i64>) -> Self {
        ArrayData::Int64 {
            shape: vec![values.len()],
            values,
        }
    }

    /// One-dimensional text array with no fixed width.
    pub fn text_1d<S: Into<String>>(values: Vec<S>) -> Self {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        ArrayData::Text {
            shape: vec![values.len()],
            width: None,
            values,
        }
    }

    /// One-dimensional timestamp array.
    pub fn timestamps_1d(values: Vec<DateTime<Utc>>) -> Self {
        ArrayData::Timestamps {
            shape: vec![values.len()],
            values,
        }
    }

    /// Scalar float (empty shape).
    pub fn scalar_f64(value: f64) -> Self {
        ArrayData::Float64 {
            shape: Vec::new(),
            values: vec![value],
        }
    }

    /// Multi-dimensional float array.
    pub fn f64_nd(shape: Vec<usize>, values: Vec<f64>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        ArrayData::Float64 { shape, values }
    }

    /// Dimension lengths, row-major.
    pub fn shape(&self) -> &[usize] {
        match self {
            ArrayData::Float64 { shape, .. }
            | ArrayData::Int64 { shape, .. }
            | ArrayData::Text { shape, .. }
            | ArrayData::Timestamps { shape, .. } => shape,
        }
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Float64 { values, .. } => values.len(),
            ArrayData::Int64 { values, .. } => values.len(),
            ArrayData::Text { values, .. } => values.len(),
            ArrayData::Timestamps { values, .. } => values.len(),
        }
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short dtype label used in messages and documents.
    pub fn dtype_label(&self) -> &'static str {
        match self {
            ArrayData::Float64 { .. } => "float64",
            ArrayData::Int64 { .. } => "int64",
            ArrayData::Text { .. } => "text",
            ArrayData::Timestamps { .. } => "timestamps",
        }
    }

    /// Whether the payload is absolute timestamps.
    pub fn is_timestamps(&self) -> bool {
        matches!(self, ArrayData::Timestamps { .. })
    }

    /// Fixed text width, if this is a text array with one assigned.
    pub fn text_width(&self) -> Option<usize> {
        match self {
            ArrayData::Text { width, .. } => *width,
            _ => None,
        }
    }

    /// Pin a text array to a fixed byte width, truncating longer values on a
    /// character boundary. No-op for non-text payloads.
    pub fn coerce_text_width(&mut self, new_width: usize) {
        if let ArrayData::Text { width, values, .. } = self {
            for v in values.iter_mut() {
                if v.len() > new_width {
                    *v = truncate_to_width(v, new_width);
                }
            }
            *width = Some(new_width);
        }
    }

    /// Bit-identical comparison: shapes, widths and element bits must all
    /// agree. Unlike `PartialEq`, float NaNs compare equal to themselves, so
    /// fill values do not break identical-required merges.
    pub fn identical(&self, other: &ArrayData) -> bool {
        match (self, other) {
            (
                ArrayData::Float64 { shape: s1, values: v1 },
                ArrayData::Float64 { shape: s2, values: v2 },
            ) => {
                s1 == s2
                    && v1.len() == v2.len()
                    && v1
                        .iter()
                        .zip(v2.iter())
                        .all(|(a, b)| a.to_bits() == b.to_bits())
            }
            (
                ArrayData::Int64 { shape: s1, values: v1 },
                ArrayData::Int64 { shape: s2, values: v2 },
            ) => s1 == s2 && v1 == v2,
            (
                ArrayData::Text { shape: s1, width: w1, values: v1 },
                ArrayData::Text { shape: s2, width: w2, values: v2 },
            ) => s1 == s2 && w1 == w2 && v1 == v2,
            (
                ArrayData::Timestamps { shape: s1, values: v1 },
                ArrayData::Timestamps { shape: s2, values: v2 },
            ) => s1 == s2 && v1 == v2,
            _ => false,
        }
    }

    /// Ordering key for the element at flat index `i`, for monotonicity
    /// checks. `None` for text payloads, which have no meaningful order.
    pub(crate) fn order_key(&self, i: usize) -> Option<OrderKey> {
        match self {
            ArrayData::Float64 { values, .. } => values.get(i).map(|v| OrderKey::Float(*v)),
            ArrayData::Int64 { values, .. } => values.get(i).map(|v| OrderKey::Int(*v)),
            ArrayData::Timestamps { values, .. } => {
                values.get(i).map(|v| OrderKey::Time(v.timestamp_micros()))
            }
            ArrayData::Text { .. } => None,
        }
    }

    /// Concatenate parts along `axis`. All parts must share dtype and rank,
    /// and every dimension except `axis` must agree.
    pub fn concat(parts: &[&ArrayData], axis: usize) -> Result<ArrayData, String> {
        let first = parts.first().ok_or("nothing to concatenate")?;
        match first {
            ArrayData::Float64 { .. } => {
                let slices = collect_parts(parts, |p| match p {
                    ArrayData::Float64 { shape, values } => Some((values.as_slice(), shape)),
                    _ => None,
                })?;
                let (values, shape) = concat_values(&slices, axis)?;
                Ok(ArrayData::Float64 { shape, values })
            }
            ArrayData::Int64 { .. } => {
                let slices = collect_parts(parts, |p| match p {
                    ArrayData::Int64 { shape, values } => Some((values.as_slice(), shape)),
                    _ => None,
                })?;
                let (values, shape) = concat_values(&slices, axis)?;
                Ok(ArrayData::Int64 { shape, values })
            }
            ArrayData::Text { .. } => {
                let slices = collect_parts(parts, |p| match p {
                    ArrayData::Text { shape, values, .. } => Some((values.as_slice(), shape)),
                    _ => None,
                })?;
                let (values, shape) = concat_values(&slices, axis)?;
                // A width pinned on any part survives; the widest wins.
                let width = parts.iter().filter_map(|p| p.text_width()).max();
                Ok(ArrayData::Text { shape, width, values })
            }
            ArrayData::Timestamps { .. } => {
                let slices = collect_parts(parts, |p| match p {
                    ArrayData::Timestamps { shape, values } => Some((values.as_slice(), shape)),
                    _ => None,
                })?;
                let (values, shape) = concat_values(&slices, axis)?;
                Ok(ArrayData::Timestamps { shape, values })
            }
        }
    }
}

fn collect_parts<'a, T>(
    parts: &[&'a ArrayData],
    extract: impl Fn(&'a ArrayData) -> Option<(&'a [T], &'a Vec<usize>)>,
) -> Result<Vec<(&'a [T], &'a [usize])>, String> {
    parts
        .iter()
        .map(|p| {
            extract(p)
                .map(|(v, s)| (v, s.as_slice()))
                .ok_or_else(|| format!("dtype mismatch: expected uniform parts, got {}", p.dtype_label()))
        })
        .collect()
}

fn concat_values<T: Clone>(
    parts: &[(&[T], &[usize])],
    axis: usize,
) -> Result<(Vec<T>, Vec<usize>), String> {
    let (_, first_shape) = parts[0];
    if axis >= first_shape.len() {
        return Err(format!(
            "concat axis {} out of range for rank {}",
            axis,
            first_shape.len()
        ));
    }
    let mut out_shape = first_shape.to_vec();
    out_shape[axis] = 0;
    for (_, shape) in parts {
        if shape.len() != first_shape.len() {
            return Err("rank mismatch between parts".to_string());
        }
        for (d, (a, b)) in shape.iter().zip(first_shape.iter()).enumerate() {
            if d != axis && a != b {
                return Err(format!(
                    "dimension {} disagrees between parts ({} vs {})",
                    d, a, b
                ));
            }
        }
        out_shape[axis] += shape[axis];
    }

    let outer: usize = first_shape[..axis].iter().product();
    let inner: usize = first_shape[axis + 1..].iter().product();
    let total: usize = out_shape.iter().product();
    let mut out = Vec::with_capacity(total);
    for o in 0..outer {
        for (values, shape) in parts {
            let block = shape[axis] * inner;
            let start = o * block;
            out.extend_from_slice(&values[start..start + block]);
        }
    }
    Ok((out, out_shape))
}

fn truncate_to_width(s: &str, width: usize) -> String {
    let mut end = width;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}
