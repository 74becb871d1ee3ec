//! Field names the combination engine addresses directly.
//!
//! The full per-group field vocabulary is owned by the converter
//! collaborators; only the fields the combiner must touch by name (channel
//! identity checks and fixed-width text coercion) are named here.

/// Transceiver channel identifier string (Beam group)
pub const CHANNEL_ID: &str = "channel_id";
/// GPT firmware version string (EK60 Beam group)
pub const GPT_SOFTWARE_VERSION: &str = "gpt_software_version";
/// Raw NMEA sentence payload (Platform/NMEA group)
pub const NMEA_DATAGRAM: &str = "NMEA_datagram";
