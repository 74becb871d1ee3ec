use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ArrayData, AttrMap, AttrValue};

/// A named coordinate axis: an ordered sequence of scalar values plus
/// CF-style attributes (units, calendar, long name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Axis name, e.g. `ping_time` or `frequency`
    pub name: String,
    /// Coordinate values, always one-dimensional
    pub values: ArrayData,
    /// Axis attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: AttrMap,
}

impl Axis {
    /// New axis with empty attributes.
    pub fn new(name: impl Into<String>, values: ArrayData) -> Self {
        Axis {
            name: name.into(),
            values,
            attrs: AttrMap::new(),
        }
    }

    /// Attach an attribute, builder-style.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Number of coordinate values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the axis has no coordinate values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A data field: an array indexed by zero or more named axes, with attached
/// unit/description metadata. A scalar field has an empty `dims` list.
#[derive(Debug, Clone, PartialEq)]
pub struct DataField {
    /// Field name
    pub name: String,
    /// Names of the axes indexing this field, outermost first
    pub dims: Vec<String>,
    /// Array payload
    pub data: ArrayData,
    /// Field attributes
    pub attrs: AttrMap,
}

impl DataField {
    /// New field with empty attributes.
    pub fn new(
        name: impl Into<String>,
        dims: Vec<&str>,
        data: ArrayData,
    ) -> Self {
        DataField {
            name: name.into(),
            dims: dims.into_iter().map(str::to_string).collect(),
            data,
            attrs: AttrMap::new(),
        }
    }

    /// Attach an attribute, builder-style.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Whether the field is indexed by the named axis.
    pub fn has_dim(&self, axis: &str) -> bool {
        self.dims.iter().any(|d| d == axis)
    }
}

/// A named subtree of a converted container: coordinate axes, data fields and
/// group-level attributes. Axis and field order is preserved as built, which
/// keeps output deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// Coordinate axes in definition order
    pub axes: Vec<Axis>,
    /// Data fields in definition order
    pub fields: Vec<DataField>,
    /// Group-level attributes
    pub attrs: AttrMap,
}

impl Group {
    /// An empty group.
    pub fn new() -> Self {
        Group::default()
    }

    /// Start building a group.
    pub fn builder() -> GroupBuilder {
        GroupBuilder { group: Group::new() }
    }

    /// Look up an axis by name.
    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.name == name)
    }

    /// Look up an axis by name, mutably.
    pub fn axis_mut(&mut self, name: &str) -> Option<&mut Axis> {
        self.axes.iter_mut().find(|a| a.name == name)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&DataField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut DataField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Whether an axis with this name exists.
    pub fn has_axis(&self, name: &str) -> bool {
        self.axis(name).is_some()
    }

    /// Whether a field with this name exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of the axes, in definition order.
    pub fn axis_names(&self) -> Vec<&str> {
        self.axes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Names of the fields, in definition order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Builder for [`Group`], the shape converter collaborators feed.
///
/// ```rust
/// use echomerge::container::{ArrayData, Axis, DataField, Group};
///
/// let group = Group::builder()
///     .axis(
///         Axis::new("frequency", ArrayData::f64_1d(vec![38000.0]))
///             .with_attr("units", "Hz")
///             .with_attr("long_name", "Transducer frequency"),
///     )
///     .field(DataField::new(
///         "sound_speed_indicative",
///         vec!["frequency"],
///         ArrayData::f64_1d(vec![1488.1]),
///     ))
///     .attr("beam_mode", "vertical")
///     .build();
/// assert!(group.has_axis("frequency"));
/// ```
#[derive(Debug, Clone)]
pub struct GroupBuilder {
    group: Group,
}

impl GroupBuilder {
    /// Append a coordinate axis.
    pub fn axis(mut self, axis: Axis) -> Self {
        self.group.axes.push(axis);
        self
    }

    /// Append a data field.
    pub fn field(mut self, field: DataField) -> Self {
        self.group.fields.push(field);
        self
    }

    /// Set a group-level attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.group.attrs.insert(key.into(), value.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> Group {
        self.group
    }
}
