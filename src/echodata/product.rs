use std::fmt;

/// The named datasets a downstream consumer addresses by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalProduct {
    /// Converted raw backscatter and instrument settings
    Raw,
    /// Calibrated volume backscattering strength
    Sv,
    /// Noise-cleaned volume backscattering strength
    SvClean,
    /// Calibrated target strength
    TargetStrength,
    /// Mean volume backscattering strength aggregated over depth/time bins
    Mvbs,
}

impl LogicalProduct {
    /// Every logical product, in session order.
    pub const ALL: [LogicalProduct; 5] = [
        LogicalProduct::Raw,
        LogicalProduct::Sv,
        LogicalProduct::SvClean,
        LogicalProduct::TargetStrength,
        LogicalProduct::Mvbs,
    ];

    /// Conventional short label.
    pub fn label(&self) -> &'static str {
        match self {
            LogicalProduct::Raw => "raw",
            LogicalProduct::Sv => "Sv",
            LogicalProduct::SvClean => "Sv_clean",
            LogicalProduct::TargetStrength => "TS",
            LogicalProduct::Mvbs => "MVBS",
        }
    }

    /// Hint logged when the product is accessed before any path is set.
    /// Missing derived data simply means calibration has not run yet.
    pub fn absent_hint(&self) -> &'static str {
        match self {
            LogicalProduct::Raw => "no raw backscatter data available",
            _ => "data has not been calibrated; derived product not yet available",
        }
    }
}

impl fmt::Display for LogicalProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
