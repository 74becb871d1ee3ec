//! Chunk payload codec: row-major element encoding, chunk-grid slicing, and
//! optional Deflate compression.

use std::io::{Cursor, Read, Write};
use std::ops::Range;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::container::ArrayData;

use super::layout::{Compression, Dtype};
use super::StoreError;

/// Scalars are stored as rank-1, length-1 arrays.
pub(super) fn effective_shape(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        vec![1]
    } else {
        shape.to_vec()
    }
}

/// Bytes per element for a dtype.
pub(super) fn element_size(dtype: Dtype, text_width: usize) -> usize {
    match dtype {
        Dtype::Float64 | Dtype::Int64 | Dtype::Timestamps => 8,
        Dtype::Text => text_width,
    }
}

/// Number of chunks along each dimension.
pub(super) fn chunk_counts(shape: &[usize], chunks: &[usize]) -> Vec<usize> {
    shape
        .iter()
        .zip(chunks.iter())
        .map(|(dim, chunk)| {
            let chunk = (*chunk).max(1);
            if *dim == 0 {
                0
            } else {
                (dim + chunk - 1) / chunk
            }
        })
        .collect()
}

/// All chunk index tuples of a grid, odometer order.
pub(super) fn chunk_indices(counts: &[usize]) -> Vec<Vec<usize>> {
    if counts.iter().any(|&c| c == 0) {
        return Vec::new();
    }
    let total: usize = counts.iter().product();
    let mut out = Vec::with_capacity(total);
    let mut idx = vec![0usize; counts.len()];
    for _ in 0..total {
        out.push(idx.clone());
        for d in (0..counts.len()).rev() {
            idx[d] += 1;
            if idx[d] < counts[d] {
                break;
            }
            idx[d] = 0;
        }
    }
    out
}

/// Storage key of a chunk: dot-joined indices, `"0"` for a scalar grid.
pub(super) fn chunk_key(idx: &[usize]) -> String {
    if idx.is_empty() {
        return "0".to_string();
    }
    idx.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Element ranges covered by a chunk (edge chunks are clipped to the shape).
pub(super) fn chunk_ranges(shape: &[usize], chunks: &[usize], idx: &[usize]) -> Vec<Range<usize>> {
    shape
        .iter()
        .zip(chunks.iter())
        .zip(idx.iter())
        .map(|((dim, chunk), i)| {
            let chunk = (*chunk).max(1);
            let start = i * chunk;
            start..(start + chunk).min(*dim)
        })
        .collect()
}

/// Visit every contiguous innermost-dimension run of a chunk. `f` receives
/// (offset into full array, offset into chunk buffer, run length), all in
/// elements.
fn visit_runs(shape: &[usize], ranges: &[Range<usize>], mut f: impl FnMut(usize, usize, usize)) {
    let rank = shape.len();
    let chunk_dims: Vec<usize> = ranges.iter().map(|r| r.end - r.start).collect();
    if chunk_dims.iter().any(|&c| c == 0) {
        return;
    }
    let mut full_strides = vec![1usize; rank];
    let mut chunk_strides = vec![1usize; rank];
    for d in (0..rank.saturating_sub(1)).rev() {
        full_strides[d] = full_strides[d + 1] * shape[d + 1];
        chunk_strides[d] = chunk_strides[d + 1] * chunk_dims[d + 1];
    }
    let run = chunk_dims[rank - 1];
    let mut idx = vec![0usize; rank - 1];
    'grid: loop {
        let mut full_off = ranges[rank - 1].start;
        let mut chunk_off = 0usize;
        for d in 0..rank - 1 {
            full_off += (ranges[d].start + idx[d]) * full_strides[d];
            chunk_off += idx[d] * chunk_strides[d];
        }
        f(full_off, chunk_off, run);
        for d in (0..rank - 1).rev() {
            idx[d] += 1;
            if idx[d] < chunk_dims[d] {
                continue 'grid;
            }
            idx[d] = 0;
        }
        break;
    }
}

/// Copy a chunk's elements out of the full row-major byte buffer.
pub(super) fn extract_chunk(
    full: &[u8],
    shape: &[usize],
    elem: usize,
    ranges: &[Range<usize>],
) -> Vec<u8> {
    let chunk_elems: usize = ranges.iter().map(|r| r.end - r.start).product();
    let mut out = vec![0u8; chunk_elems * elem];
    visit_runs(shape, ranges, |full_off, chunk_off, run| {
        let src = full_off * elem..(full_off + run) * elem;
        let dst = chunk_off * elem..(chunk_off + run) * elem;
        out[dst].copy_from_slice(&full[src]);
    });
    out
}

/// Copy a chunk's elements into the full row-major byte buffer.
pub(super) fn place_chunk(
    full: &mut [u8],
    shape: &[usize],
    elem: usize,
    ranges: &[Range<usize>],
    chunk: &[u8],
) -> Result<(), StoreError> {
    let chunk_elems: usize = ranges.iter().map(|r| r.end - r.start).product();
    if chunk.len() != chunk_elems * elem {
        return Err(StoreError::InvalidContainer(format!(
            "chunk payload is {} bytes, expected {}",
            chunk.len(),
            chunk_elems * elem
        )));
    }
    visit_runs(shape, ranges, |full_off, chunk_off, run| {
        let dst = full_off * elem..(full_off + run) * elem;
        let src = chunk_off * elem..(chunk_off + run) * elem;
        full[dst].copy_from_slice(&chunk[src]);
    });
    Ok(())
}

/// Encode an array's elements row-major. Text arrays must have a fixed width
/// assigned before encoding.
pub(super) fn encode_elements(data: &ArrayData) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::with_capacity(data.len() * 8);
    match data {
        ArrayData::Float64 { values, .. } => {
            for v in values {
                buf.write_f64::<LittleEndian>(*v)?;
            }
        }
        ArrayData::Int64 { values, .. } => {
            for v in values {
                buf.write_i64::<LittleEndian>(*v)?;
            }
        }
        ArrayData::Timestamps { values, .. } => {
            for v in values {
                buf.write_i64::<LittleEndian>(v.timestamp_micros())?;
            }
        }
        ArrayData::Text { values, width, .. } => {
            let width = width.ok_or_else(|| {
                StoreError::InvalidContainer(
                    "text payload has no fixed width assigned".to_string(),
                )
            })?;
            for v in values {
                let bytes = v.as_bytes();
                if bytes.len() > width {
                    return Err(StoreError::InvalidContainer(format!(
                        "text value exceeds fixed width {width}: {v:?}"
                    )));
                }
                buf.extend_from_slice(bytes);
                buf.resize(buf.len() + (width - bytes.len()), b' ');
            }
        }
    }
    Ok(buf)
}

/// Decode a full row-major byte buffer back into an array payload.
pub(super) fn decode_array(
    dtype: Dtype,
    text_width: Option<usize>,
    shape: Vec<usize>,
    bytes: &[u8],
) -> Result<ArrayData, StoreError> {
    let count: usize = effective_shape(&shape).iter().product();
    let mut cursor = Cursor::new(bytes);
    match dtype {
        Dtype::Float64 => {
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(cursor.read_f64::<LittleEndian>()?);
            }
            Ok(ArrayData::Float64 { shape, values })
        }
        Dtype::Int64 => {
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(cursor.read_i64::<LittleEndian>()?);
            }
            Ok(ArrayData::Int64 { shape, values })
        }
        Dtype::Timestamps => {
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                let micros = cursor.read_i64::<LittleEndian>()?;
                let ts: DateTime<Utc> =
                    DateTime::from_timestamp_micros(micros).ok_or_else(|| {
                        StoreError::InvalidContainer(format!(
                            "timestamp out of range: {micros} us"
                        ))
                    })?;
                values.push(ts);
            }
            Ok(ArrayData::Timestamps { shape, values })
        }
        Dtype::Text => {
            let width = text_width.ok_or_else(|| {
                StoreError::InvalidContainer("text field has no recorded width".to_string())
            })?;
            let mut values = Vec::with_capacity(count);
            for i in 0..count {
                let cell = bytes.get(i * width..(i + 1) * width).ok_or_else(|| {
                    StoreError::InvalidContainer("text payload shorter than shape".to_string())
                })?;
                let text = String::from_utf8_lossy(cell);
                values.push(text.trim_end_matches(' ').to_string());
            }
            Ok(ArrayData::Text {
                shape,
                width: Some(width),
                values,
            })
        }
    }
}

/// Compress a chunk payload per its encoding entry.
pub(super) fn compress(raw: Vec<u8>, compression: Option<Compression>) -> Result<Vec<u8>, StoreError> {
    match compression {
        None => Ok(raw),
        Some(Compression::Deflate { level }) => {
            let mut encoder =
                DeflateEncoder::new(Vec::new(), flate2::Compression::new(level.min(9)));
            encoder.write_all(&raw)?;
            Ok(encoder.finish()?)
        }
    }
}

/// Decompress a chunk payload per its encoding entry.
pub(super) fn decompress(
    payload: Vec<u8>,
    compression: Option<Compression>,
) -> Result<Vec<u8>, StoreError> {
    match compression {
        None => Ok(payload),
        Some(Compression::Deflate { .. }) => {
            let mut decoder = DeflateDecoder::new(payload.as_slice());
            let mut out = Vec::new();
            decoder.read_to_end(&mut out)?;
            Ok(out)
        }
    }
}
