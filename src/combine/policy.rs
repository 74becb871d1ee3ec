//! The combine policy table: one merge algorithm per `(SonarModel,
//! GroupName)` pair, fully declarative. The engine resolves this table at
//! combine time; no instrument-specific control flow exists anywhere else.

use std::fmt;

use crate::schema::{axes, fields, GroupName, SonarModel};

/// Beam software-version strings are pinned to 10 bytes before writing.
pub const SOFTWARE_VERSION_WIDTH: usize = 10;
/// Beam channel-identifier strings are pinned to 50 bytes before writing.
pub const CHANNEL_ID_WIDTH: usize = 50;

/// The merge algorithm applied to one group across all input containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinePolicy {
    /// Copy the group verbatim from the first container; others are ignored.
    TakeFirst,
    /// Concatenate along the named axes, in input order. Values along each
    /// axis must be non-decreasing within every input and across the input
    /// order. Fields not indexed by a concat axis must be identical across
    /// inputs and are stored once.
    ConcatOrdered {
        /// Axes concatenated jointly (e.g. `location_time` + `mru_time`)
        axes: &'static [&'static str],
    },
    /// Union variables across containers; every overlapping key must be
    /// bit-identical or the combine fails.
    MergeIdenticalRequired,
    /// Union variables across containers; overlapping keys must agree where
    /// both are defined, but each container may define a disjoint subset.
    MergeNoConflict,
    /// Not read from inputs; produced by the provenance synthesizer.
    Synthesize,
}

impl fmt::Display for CombinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CombinePolicy::TakeFirst => "take-first",
            CombinePolicy::ConcatOrdered { .. } => "concat-ordered",
            CombinePolicy::MergeIdenticalRequired => "merge-identical-required",
            CombinePolicy::MergeNoConflict => "merge-no-conflicts",
            CombinePolicy::Synthesize => "synthesize",
        };
        f.write_str(label)
    }
}

/// Pin one named text field to a fixed byte width after combining. Differing
/// widths across files would otherwise raise an encoding error at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCoercion {
    /// Field to coerce
    pub field: &'static str,
    /// Fixed byte width
    pub width: usize,
}

/// One row of the policy table: the policy plus its post-combine coercions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPlan {
    /// Merge algorithm for the group
    pub policy: CombinePolicy,
    /// Named fixed-width text coercions applied after combining
    pub coerce: &'static [TextCoercion],
    /// Pin every text field to the widest value it carries (NMEA datagrams)
    pub coerce_all_text: bool,
}

impl GroupPlan {
    const fn of(policy: CombinePolicy) -> GroupPlan {
        GroupPlan {
            policy,
            coerce: &[],
            coerce_all_text: false,
        }
    }
}

const PING: &[&str] = &[axes::PING_TIME];
const LOCATION: &[&str] = &[axes::LOCATION_TIME];
const LOCATION_PING: &[&str] = &[axes::LOCATION_TIME, axes::PING_TIME];
const LOCATION_MRU: &[&str] = &[axes::LOCATION_TIME, axes::MRU_TIME];

/// EK60 transceiver metadata is text of instrument-chosen length; pin it so
/// files recorded with different firmware strings concatenate cleanly.
const EK60_BEAM_COERCIONS: &[TextCoercion] = &[
    TextCoercion {
        field: fields::GPT_SOFTWARE_VERSION,
        width: SOFTWARE_VERSION_WIDTH,
    },
    TextCoercion {
        field: fields::CHANNEL_ID,
        width: CHANNEL_ID_WIDTH,
    },
];

/// Resolve the policy-table row for a `(model, group)` pair. `None` means the
/// group does not exist for the model (AZFP has no `Platform/NMEA`).
pub fn plan_for(model: SonarModel, group: GroupName) -> Option<GroupPlan> {
    let plan = match group {
        GroupName::TopLevel | GroupName::Sonar => GroupPlan::of(CombinePolicy::TakeFirst),
        GroupName::Provenance => GroupPlan::of(CombinePolicy::Synthesize),
        GroupName::Environment => GroupPlan::of(CombinePolicy::ConcatOrdered { axes: PING }),
        GroupName::Beam => GroupPlan {
            policy: CombinePolicy::ConcatOrdered { axes: PING },
            coerce: match model {
                SonarModel::Ek60 => EK60_BEAM_COERCIONS,
                SonarModel::Ek80 | SonarModel::Azfp => &[],
            },
            coerce_all_text: false,
        },
        GroupName::Platform => match model {
            SonarModel::Ek60 => GroupPlan::of(CombinePolicy::ConcatOrdered {
                axes: LOCATION_PING,
            }),
            SonarModel::Ek80 => GroupPlan::of(CombinePolicy::ConcatOrdered {
                axes: LOCATION_MRU,
            }),
            // AZFP platforms carry no location stream; the group is static
            // deployment metadata and must agree across files.
            SonarModel::Azfp => GroupPlan::of(CombinePolicy::MergeIdenticalRequired),
        },
        GroupName::PlatformNmea => match model {
            SonarModel::Ek60 | SonarModel::Ek80 => GroupPlan {
                policy: CombinePolicy::ConcatOrdered { axes: LOCATION },
                coerce: &[],
                coerce_all_text: true,
            },
            SonarModel::Azfp => return None,
        },
        GroupName::Vendor => GroupPlan::of(CombinePolicy::MergeNoConflict),
    };
    Some(plan)
}
