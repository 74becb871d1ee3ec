//! Datetime normalization.
//!
//! The persisted container formats cannot round-trip absolute timestamps
//! without ambiguity, so every time-like coordinate is rewritten to an `f64`
//! count of seconds since 1900-01-01T00:00:00 UTC before writing. Downstream
//! readers recover absolute time by applying [`from_epoch_seconds`], the
//! documented inverse. The conversion is lossless to microsecond precision
//! for any timestamp between 1900-01-01 and 2100-01-01: total microseconds
//! over that span stay below 2^53 and therefore inside `f64`'s exact integer
//! range.

use chrono::{DateTime, Utc};

use crate::container::{ArrayData, AttrValue, Group};

/// Units string recorded on normalized time axes.
pub const EPOCH_UNITS: &str = "seconds since 1900-01-01";

/// Seconds from the 1900-01-01 reference epoch to the Unix epoch.
pub const SECONDS_1900_TO_UNIX: i64 = 2_208_988_800;

/// Seconds elapsed since 1900-01-01T00:00:00 UTC.
pub fn to_epoch_seconds(ts: &DateTime<Utc>) -> f64 {
    let micros = ts.timestamp_micros() + SECONDS_1900_TO_UNIX * 1_000_000;
    micros as f64 / 1e6
}

/// Inverse of [`to_epoch_seconds`]: recover the absolute timestamp, rounded
/// to the nearest microsecond. `None` outside chrono's representable range.
///
/// The whole-second and sub-second parts are split before scaling; a single
/// `secs * 1e6` multiplication would lose up to a microsecond near the top of
/// the supported range.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc();
    let frac = secs - whole;
    let micros = (whole as i64)
        .checked_mul(1_000_000)?
        .checked_add((frac * 1e6).round() as i64)?;
    let unix_micros = micros.checked_sub(SECONDS_1900_TO_UNIX * 1_000_000)?;
    DateTime::from_timestamp_micros(unix_micros)
}

/// Normalize one array: timestamps become epoch-offset seconds, everything
/// else passes through unchanged.
pub fn normalize_array(data: &ArrayData) -> ArrayData {
    match data {
        ArrayData::Timestamps { shape, values } => ArrayData::Float64 {
            shape: shape.clone(),
            values: values.iter().map(to_epoch_seconds).collect(),
        },
        other => other.clone(),
    }
}

/// Rewrite every timestamp-valued axis and field of a group to epoch-offset
/// seconds, updating the `units` attribute and preserving all other
/// attributes (calendar, long name, standard name).
pub fn normalize_group(group: &mut Group) {
    for axis in &mut group.axes {
        if axis.values.is_timestamps() {
            axis.values = normalize_array(&axis.values);
            axis.attrs
                .insert("units".to_string(), AttrValue::Text(EPOCH_UNITS.to_string()));
        }
    }
    for field in &mut group.fields {
        if field.data.is_timestamps() {
            field.data = normalize_array(&field.data);
            field
                .attrs
                .insert("units".to_string(), AttrValue::Text(EPOCH_UNITS.to_string()));
        }
    }
}
