use std::fmt;

use super::SonarModel;

/// The closed set of named subgroups a converted container exposes.
///
/// Group names, their nesting (`Platform/NMEA` lives under `Platform`) and
/// their metadata strings are fixed by the format family and must be
/// reproduced verbatim for interoperability with existing readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupName {
    /// Root-level fields and attributes of the container
    TopLevel,
    /// Sonar system description
    Sonar,
    /// Conversion/combination provenance
    Provenance,
    /// Environmental parameters (sound speed, absorption)
    Environment,
    /// Per-ping backscatter and transducer configuration
    Beam,
    /// Platform attitude and position
    Platform,
    /// Raw NMEA datagrams, nested under Platform
    PlatformNmea,
    /// Instrument-vendor specific tables (filter coefficients, calibration)
    Vendor,
}

impl GroupName {
    /// Fixed processing order of the combination engine. Each group is
    /// written to the output container before the next is processed.
    pub const COMBINE_ORDER: [GroupName; 8] = [
        GroupName::TopLevel,
        GroupName::Sonar,
        GroupName::Provenance,
        GroupName::Environment,
        GroupName::Beam,
        GroupName::Platform,
        GroupName::PlatformNmea,
        GroupName::Vendor,
    ];

    /// Storage path of the group inside a container, `None` for the root
    /// group (whose fields and attributes live in `container.json`).
    pub fn storage_path(&self) -> Option<&'static str> {
        match self {
            GroupName::TopLevel => None,
            GroupName::Sonar => Some("Sonar"),
            GroupName::Provenance => Some("Provenance"),
            GroupName::Environment => Some("Environment"),
            GroupName::Beam => Some("Beam"),
            GroupName::Platform => Some("Platform"),
            GroupName::PlatformNmea => Some("Platform/NMEA"),
            GroupName::Vendor => Some("Vendor"),
        }
    }

    /// Human-facing label, used in log lines and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            GroupName::TopLevel => "Top-level",
            GroupName::Sonar => "Sonar",
            GroupName::Provenance => "Provenance",
            GroupName::Environment => "Environment",
            GroupName::Beam => "Beam",
            GroupName::Platform => "Platform",
            GroupName::PlatformNmea => "Platform/NMEA",
            GroupName::Vendor => "Vendor",
        }
    }

    /// Whether this group exists for the given sonar model. AZFP deployments
    /// carry no NMEA stream, so their containers have no `Platform/NMEA`.
    pub fn present_for(&self, model: SonarModel) -> bool {
        match self {
            GroupName::PlatformNmea => matches!(model, SonarModel::Ek60 | SonarModel::Ek80),
            _ => true,
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
