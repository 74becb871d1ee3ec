use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sonar instrument families this format family covers.
///
/// EA640 single-beam systems record through the EK80 software stack and share
/// its group layout in every respect that matters for combining, so they fold
/// into [`SonarModel::Ek80`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SonarModel {
    /// Simrad EK60 narrowband echosounder
    #[serde(rename = "EK60")]
    Ek60,
    /// Simrad EK80 broadband echosounder (also EA640)
    #[serde(rename = "EK80")]
    Ek80,
    /// ASL Environmental Sciences AZFP profiler
    #[serde(rename = "AZFP")]
    Azfp,
}

impl SonarModel {
    /// Canonical label used in container attributes and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SonarModel::Ek60 => "EK60",
            SonarModel::Ek80 => "EK80",
            SonarModel::Azfp => "AZFP",
        }
    }
}

impl fmt::Display for SonarModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sonar model label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sonar model: {0}")]
pub struct UnknownSonarModel(pub String);

impl FromStr for SonarModel {
    type Err = UnknownSonarModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EK60" => Ok(SonarModel::Ek60),
            "EK80" | "EA640" => Ok(SonarModel::Ek80),
            "AZFP" => Ok(SonarModel::Azfp),
            other => Err(UnknownSonarModel(other.to_string())),
        }
    }
}
