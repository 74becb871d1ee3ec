//! Concat and merge algorithms executed by the policy table.
//!
//! Concatenation streams one field at a time across all inputs: axis values
//! are inline in group metadata, so the only payload I/O is the field being
//! concatenated, keeping memory bounded by a single field rather than the
//! whole group times the input count.

use std::cmp::Ordering;

use crate::container::{ArrayData, Axis, DataField, Group, OrderKey};
use crate::schema::{axes, GroupName};
use crate::store::{ContainerReader, GroupDoc};

use super::error::CombineError;
use super::policy::CombinePolicy;

/// Merge strictness for the union policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeMode {
    /// Every input must define the same keys with bit-identical values
    Identical,
    /// Inputs may define disjoint subsets; overlaps must agree
    NoConflicts,
}

/// Time axes present in a group's metadata, in canonical order. This is the
/// concat-axis set the logical dataset pointer uses for multi-file views.
pub(crate) fn concat_axes_for(meta: &GroupDoc) -> Vec<&'static str> {
    axes::TIME_AXES
        .iter()
        .filter(|name| meta.axis(name).is_some())
        .copied()
        .collect()
}

/// Concatenate a group across all inputs along `concat_axes`, with
/// "minimal" variable handling: fields not indexed by a concat axis must be
/// identical across inputs and are stored once.
pub(crate) fn concat_group(
    group: GroupName,
    policy: CombinePolicy,
    readers: &mut [ContainerReader],
    concat_axes: &[&str],
    validate_order: bool,
) -> Result<Group, CombineError> {
    let mut metas = Vec::with_capacity(readers.len());
    for reader in readers.iter_mut() {
        let meta = reader
            .read_group_meta(group)
            .map_err(|e| CombineError::from_store(Some(group), e))?;
        metas.push(meta);
    }
    check_congruent(group, &metas)?;
    let first = &metas[0];

    let mut out = Group::new();
    out.attrs = first.attrs.clone();

    for axis in &first.axes {
        let is_concat = concat_axes.contains(&axis.name.as_str());
        if is_concat {
            let mut parts = Vec::with_capacity(metas.len());
            for meta in &metas {
                parts.push(&require_axis(group, meta, &axis.name)?.values);
            }
            if validate_order {
                check_order(group, &axis.name, &parts)?;
            }
            let values = ArrayData::concat(&parts, 0).map_err(|e| CombineError::SchemaMismatch {
                group: Some(group),
                detail: format!("coordinate '{}': {e}", axis.name),
            })?;
            out.axes.push(Axis {
                name: axis.name.clone(),
                values,
                attrs: axis.attrs.clone(),
            });
        } else {
            for meta in &metas[1..] {
                let other = require_axis(group, meta, &axis.name)?;
                if !axis.values.identical(&other.values) {
                    return Err(CombineError::SchemaMismatch {
                        group: Some(group),
                        detail: format!("coordinate '{}' differs across inputs", axis.name),
                    });
                }
            }
            out.axes.push(axis.clone());
        }
    }

    for field_doc in &first.fields {
        let concat_pos = field_doc
            .dims
            .iter()
            .position(|d| concat_axes.contains(&d.as_str()));
        let data = match concat_pos {
            Some(pos) => {
                // One field at a time across all inputs.
                let mut parts = Vec::with_capacity(metas.len());
                for (meta, reader) in metas.iter().zip(readers.iter_mut()) {
                    let doc = require_field(group, meta, &field_doc.name)?;
                    let part = reader
                        .read_field(group, doc)
                        .map_err(|e| CombineError::from_store(Some(group), e))?;
                    parts.push(part);
                }
                let refs: Vec<&ArrayData> = parts.iter().collect();
                ArrayData::concat(&refs, pos).map_err(|e| CombineError::SchemaMismatch {
                    group: Some(group),
                    detail: format!("field '{}': {e}", field_doc.name),
                })?
            }
            None => {
                // "Minimal" variables: identical everywhere, stored once.
                let mut iter = metas.iter().zip(readers.iter_mut());
                let (first_meta, first_reader) =
                    iter.next().ok_or(CombineError::NoInputs)?;
                let doc = require_field(group, first_meta, &field_doc.name)?;
                let reference = first_reader
                    .read_field(group, doc)
                    .map_err(|e| CombineError::from_store(Some(group), e))?;
                for (meta, reader) in iter {
                    let doc = require_field(group, meta, &field_doc.name)?;
                    let other = reader
                        .read_field(group, doc)
                        .map_err(|e| CombineError::from_store(Some(group), e))?;
                    if !reference.identical(&other) {
                        return Err(CombineError::ConflictingMetadata {
                            group,
                            policy,
                            key: field_doc.name.clone(),
                        });
                    }
                }
                reference
            }
        };
        out.fields.push(DataField {
            name: field_doc.name.clone(),
            dims: field_doc.dims.clone(),
            data,
            attrs: field_doc.attrs.clone(),
        });
    }

    Ok(out)
}

/// Union a group across all inputs under one of the merge policies.
pub(crate) fn merge_group(
    group: GroupName,
    policy: CombinePolicy,
    readers: &mut [ContainerReader],
    mode: MergeMode,
) -> Result<Group, CombineError> {
    let mut parts = Vec::with_capacity(readers.len());
    for reader in readers.iter_mut() {
        let part = reader
            .read_group(group)
            .map_err(|e| CombineError::from_store(Some(group), e))?;
        parts.push(part);
    }

    if mode == MergeMode::Identical {
        check_same_keys(group, &parts)?;
    }

    let mut out = Group::new();
    for part in &parts {
        for axis in &part.axes {
            match out.axis(&axis.name) {
                Some(existing) => {
                    if !existing.values.identical(&axis.values) || existing.attrs != axis.attrs {
                        return Err(CombineError::ConflictingMetadata {
                            group,
                            policy,
                            key: axis.name.clone(),
                        });
                    }
                }
                None => out.axes.push(axis.clone()),
            }
        }
        for field in &part.fields {
            match out.field(&field.name) {
                Some(existing) => {
                    if !existing.data.identical(&field.data)
                        || existing.dims != field.dims
                        || existing.attrs != field.attrs
                    {
                        return Err(CombineError::ConflictingMetadata {
                            group,
                            policy,
                            key: field.name.clone(),
                        });
                    }
                }
                None => out.fields.push(field.clone()),
            }
        }
        for (key, value) in &part.attrs {
            match out.attrs.get(key) {
                Some(existing) => {
                    if existing != value {
                        return Err(CombineError::ConflictingMetadata {
                            group,
                            policy,
                            key: key.clone(),
                        });
                    }
                }
                None => {
                    out.attrs.insert(key.clone(), value.clone());
                }
            }
        }
    }
    Ok(out)
}

/// Structural congruence for concatenation: every input must expose the same
/// axes and the same fields with the same dims and dtypes.
fn check_congruent(group: GroupName, metas: &[GroupDoc]) -> Result<(), CombineError> {
    let first = &metas[0];
    let mut reference: Vec<&str> = first.axes.iter().map(|a| a.name.as_str()).collect();
    reference.sort_unstable();
    for meta in &metas[1..] {
        let mut names: Vec<&str> = meta.axes.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        if names != reference {
            return Err(CombineError::SchemaMismatch {
                group: Some(group),
                detail: format!(
                    "axis sets differ across inputs ({:?} vs {:?})",
                    reference, names
                ),
            });
        }
    }
    let mut reference: Vec<&str> = first.fields.iter().map(|f| f.name.as_str()).collect();
    reference.sort_unstable();
    for meta in &metas[1..] {
        let mut names: Vec<&str> = meta.fields.iter().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        if names != reference {
            return Err(CombineError::SchemaMismatch {
                group: Some(group),
                detail: format!(
                    "field sets differ across inputs ({:?} vs {:?})",
                    reference, names
                ),
            });
        }
        for field in &first.fields {
            let other = require_field(group, meta, &field.name)?;
            if other.dims != field.dims || other.dtype != field.dtype {
                return Err(CombineError::SchemaMismatch {
                    group: Some(group),
                    detail: format!("field '{}' shape disagrees across inputs", field.name),
                });
            }
        }
    }
    Ok(())
}

/// Structural congruence for identical-required merges: the same axes,
/// fields and attribute keys must be defined by every input.
fn check_same_keys(group: GroupName, parts: &[Group]) -> Result<(), CombineError> {
    let first = &parts[0];
    for part in &parts[1..] {
        let mut a = first.axis_names();
        let mut b = part.axis_names();
        a.sort_unstable();
        b.sort_unstable();
        let mut fa = first.field_names();
        let mut fb = part.field_names();
        fa.sort_unstable();
        fb.sort_unstable();
        let ka: Vec<&String> = first.attrs.keys().collect();
        let kb: Vec<&String> = part.attrs.keys().collect();
        if a != b || fa != fb || ka != kb {
            return Err(CombineError::SchemaMismatch {
                group: Some(group),
                detail: "inputs do not define the same keys".to_string(),
            });
        }
    }
    Ok(())
}

fn check_order(
    group: GroupName,
    axis_name: &str,
    parts: &[&ArrayData],
) -> Result<(), CombineError> {
    let mut prev: Option<OrderKey> = None;
    for part in parts {
        for i in 0..part.len() {
            let Some(key) = part.order_key(i) else {
                return Ok(()); // unordered payloads are not validated
            };
            if let Some(p) = prev {
                if matches!(p.partial_cmp(&key), Some(Ordering::Greater)) {
                    return Err(CombineError::TimeOrderingViolation {
                        group,
                        axis: axis_name.to_string(),
                    });
                }
            }
            prev = Some(key);
        }
    }
    Ok(())
}

fn require_axis<'a>(
    group: GroupName,
    meta: &'a GroupDoc,
    name: &str,
) -> Result<&'a Axis, CombineError> {
    meta.axis(name).ok_or_else(|| CombineError::SchemaMismatch {
        group: Some(group),
        detail: format!("missing coordinate '{name}'"),
    })
}

fn require_field<'a>(
    group: GroupName,
    meta: &'a GroupDoc,
    name: &str,
) -> Result<&'a crate::store::FieldDoc, CombineError> {
    meta.field(name).ok_or_else(|| CombineError::SchemaMismatch {
        group: Some(group),
        detail: format!("missing field '{name}'"),
    })
}
