//! Coordinate-axis names shared across the format family.

/// Timestamp of each ping
pub const PING_TIME: &str = "ping_time";
/// Timestamps for NMEA position datagrams
pub const LOCATION_TIME: &str = "location_time";
/// Timestamps for motion-reference-unit datagrams (EK80/EA640)
pub const MRU_TIME: &str = "mru_time";
/// Transducer frequency in Hz; doubles as the channel coordinate
pub const FREQUENCY: &str = "frequency";
/// Along-range sample index
pub const RANGE_BIN: &str = "range_bin";
/// Transceiver quadrant for complex/broadband beam data
pub const QUADRANT: &str = "quadrant";
/// Index into the vendor pulse-length calibration tables
pub const PULSE_LENGTH_BIN: &str = "pulse_length_bin";

/// The time-like axes: their values are absolute timestamps in converter
/// output and epoch-offset seconds once persisted.
pub const TIME_AXES: [&str; 3] = [PING_TIME, LOCATION_TIME, MRU_TIME];

/// Whether the named axis carries timestamps.
pub fn is_time_axis(name: &str) -> bool {
    TIME_AXES.contains(&name)
}
