use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::container::{ArrayData, Group};
use crate::schema::{axes, fields, GroupName, SonarModel};
use crate::store::{ContainerReader, ContainerWriter, SaveFormat};

use super::apply::{concat_group, merge_group, MergeMode};
use super::error::CombineError;
use super::plan::plan_group;
use super::policy::{plan_for, CombinePolicy, GroupPlan};
use super::progress::CombineEvent;
use super::{datetime, provenance};

/// Combine N converted containers into one output container.
///
/// Preconditions: `inputs` is non-empty and every input shares `model` and
/// the same channel set. Groups are processed strictly sequentially in the
/// fixed combine order, each written to the output before the next is read,
/// so a partially written output exists on mid-combine failure; callers clean
/// that up with [`crate::store::remove_container`] before retrying. Deleting
/// the per-file inputs afterwards is likewise a separate, explicit call;
/// this function never removes them.
pub fn combine(
    model: SonarModel,
    inputs: &[PathBuf],
    output: &Path,
    format: SaveFormat,
) -> Result<(), CombineError> {
    combine_with_progress(model, inputs, output, format, &mut |_| {})
}

/// [`combine`] with a progress callback; see [`CombineEvent`].
pub fn combine_with_progress(
    model: SonarModel,
    inputs: &[PathBuf],
    output: &Path,
    format: SaveFormat,
    progress: &mut dyn FnMut(&CombineEvent),
) -> Result<(), CombineError> {
    if inputs.is_empty() {
        return Err(CombineError::NoInputs);
    }
    info!(
        "combining {} file(s) into {} ({})",
        inputs.len(),
        output.display(),
        format
    );
    progress(&CombineEvent::Started {
        inputs: inputs.len(),
    });

    let mut readers = Vec::with_capacity(inputs.len());
    for path in inputs {
        let reader =
            ContainerReader::open(path).map_err(|e| CombineError::from_store(None, e))?;
        if reader.sonar_model() != model {
            return Err(CombineError::SchemaMismatch {
                group: None,
                detail: format!(
                    "{} was converted from {}, expected {model}",
                    path.display(),
                    reader.sonar_model()
                ),
            });
        }
        readers.push(reader);
    }
    check_channel_identity(&mut readers)?;

    let mut writer = ContainerWriter::create(output, format, model)
        .map_err(|e| CombineError::from_store(None, e))?;

    for group in GroupName::COMBINE_ORDER {
        if !group.present_for(model) {
            continue;
        }
        let Some(plan) = plan_for(model, group) else {
            continue;
        };
        let combined = combine_one_group(model, group, &plan, inputs, &mut readers)?;
        let encoding = plan_group(group, &combined, format);
        writer
            .write_group(group, &combined, &encoding)
            .map_err(|e| CombineError::from_store(Some(group), e))?;
        debug!("{group} group combined ({})", plan.policy);
        progress(&CombineEvent::GroupWritten { group });
    }

    writer
        .finish()
        .map_err(|e| CombineError::from_store(None, e))?;
    info!("all files combined into {}", output.display());
    progress(&CombineEvent::Completed {
        output: output.to_path_buf(),
    });
    Ok(())
}

/// Execute one policy-table row and post-process the result (text coercions,
/// datetime normalization).
fn combine_one_group(
    model: SonarModel,
    group: GroupName,
    plan: &GroupPlan,
    inputs: &[PathBuf],
    readers: &mut [ContainerReader],
) -> Result<Group, CombineError> {
    let mut combined = match plan.policy {
        CombinePolicy::TakeFirst => readers[0]
            .read_group(group)
            .map_err(|e| CombineError::from_store(Some(group), e))?,
        CombinePolicy::Synthesize => provenance::synthesize(inputs),
        CombinePolicy::ConcatOrdered { axes } => {
            concat_group(group, plan.policy, readers, axes, true)?
        }
        CombinePolicy::MergeIdenticalRequired => {
            merge_group(group, plan.policy, readers, MergeMode::Identical)?
        }
        CombinePolicy::MergeNoConflict => {
            merge_group(group, plan.policy, readers, MergeMode::NoConflicts)?
        }
    };

    for coercion in plan.coerce {
        if let Some(field) = combined.field_mut(coercion.field) {
            field.data.coerce_text_width(coercion.width);
        } else {
            debug!(
                "{group} group has no '{}' field to coerce for {model}",
                coercion.field
            );
        }
    }
    if plan.coerce_all_text {
        for field in &mut combined.fields {
            let pinned = match &field.data {
                ArrayData::Text {
                    width: None,
                    values,
                    ..
                } => Some(values.iter().map(|v| v.len()).max().unwrap_or(0)),
                _ => None,
            };
            if let Some(width) = pinned {
                field.data.coerce_text_width(width);
            }
        }
    }

    datetime::normalize_group(&mut combined);
    Ok(combined)
}

/// All inputs must expose the same channel set: identical Beam frequency
/// coordinates and identical channel-identifier strings where present.
fn check_channel_identity(readers: &mut [ContainerReader]) -> Result<(), CombineError> {
    let beam = GroupName::Beam;
    let mut reference: Option<(PathBuf, Option<ArrayData>, Option<ArrayData>)> = None;
    for reader in readers.iter_mut() {
        let present = reader
            .has_group(beam)
            .map_err(|e| CombineError::from_store(Some(beam), e))?;
        if !present {
            continue;
        }
        let meta = reader
            .read_group_meta(beam)
            .map_err(|e| CombineError::from_store(Some(beam), e))?;
        let frequency = meta.axis(axes::FREQUENCY).map(|a| a.values.clone());
        let channels = match meta.field(fields::CHANNEL_ID) {
            Some(doc) => Some(strip_text_width(
                reader
                    .read_field(beam, doc)
                    .map_err(|e| CombineError::from_store(Some(beam), e))?,
            )),
            None => None,
        };
        let path = reader.path().to_path_buf();
        match &reference {
            None => reference = Some((path, frequency, channels)),
            Some((ref_path, ref_frequency, ref_channels)) => {
                let frequencies_match = match (ref_frequency, &frequency) {
                    (Some(a), Some(b)) => a.identical(b),
                    (None, None) => true,
                    _ => false,
                };
                if !frequencies_match || ref_channels != &channels {
                    return Err(CombineError::SchemaMismatch {
                        group: Some(beam),
                        detail: format!(
                            "channel set differs between {} and {}",
                            ref_path.display(),
                            path.display()
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Channel identifiers may be stored at different fixed widths per file;
/// compare the values, not the storage width.
fn strip_text_width(mut data: ArrayData) -> ArrayData {
    if let ArrayData::Text { width, .. } = &mut data {
        *width = None;
    }
    data
}
