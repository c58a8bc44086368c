//! View definitions: which element groups a query returns.

use serde_json::{Map, Value};

use crate::encode::Encode;
use crate::error::{Error, Result};

/// A named element group with an optional list of properties to strip.
///
/// Encodes as `{name: {"excludeProperties": [...]}}`, or `{name: {}}` when no
/// exclusions were given. Property names are passed through unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewGroup {
    name: String,
    exclude: Option<Vec<String>>,
}

impl ViewGroup {
    /// Create a view group that keeps every property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exclude: None,
        }
    }

    /// Exclude the given properties from results in this group.
    pub fn exclude<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    /// Get the group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the excluded property names, if any were set.
    pub fn excluded(&self) -> Option<&[String]> {
        self.exclude.as_deref()
    }

    fn definition(&self) -> Value {
        let mut def = Map::new();
        if let Some(ref exclude) = self.exclude {
            def.insert("excludeProperties".to_string(), Value::from(exclude.clone()));
        }
        Value::Object(def)
    }
}

impl Encode for ViewGroup {
    fn encode(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(self.name.clone(), self.definition());
        Value::Object(obj)
    }
}

/// An entry in a group list: a bare group name or a filtered view group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    /// A bare group name, encoded as `{name: {}}`.
    Name(String),
    /// A group with a property filter.
    Filtered(ViewGroup),
}

impl GroupRef {
    /// Get the group name this entry refers to.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Filtered(group) => group.name(),
        }
    }

    fn definition(&self) -> Value {
        match self {
            Self::Name(_) => Value::Object(Map::new()),
            Self::Filtered(group) => group.definition(),
        }
    }
}

impl Encode for GroupRef {
    fn encode(&self) -> Value {
        match self {
            Self::Name(name) => {
                let mut obj = Map::new();
                obj.insert(name.clone(), Value::Object(Map::new()));
                Value::Object(obj)
            }
            Self::Filtered(group) => group.encode(),
        }
    }
}

impl From<&str> for GroupRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for GroupRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<ViewGroup> for GroupRef {
    fn from(group: ViewGroup) -> Self {
        Self::Filtered(group)
    }
}

impl TryFrom<Value> for GroupRef {
    type Error = Error;

    /// Accept a JSON string (bare name) or a single-entry object in the
    /// encoded view group shape.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Name(name)),
            Value::Object(ref obj) if obj.len() == 1 => {
                let Some((name, def)) = obj.iter().next() else {
                    return Err(Error::invalid_group(&value));
                };
                let Value::Object(def) = def else {
                    return Err(Error::invalid_group(&value));
                };
                let mut group = ViewGroup::new(name.as_str());
                match def.get("excludeProperties") {
                    None | Some(Value::Null) => {}
                    Some(Value::Array(props)) => {
                        let props = props
                            .iter()
                            .map(|p| p.as_str().map(str::to_string))
                            .collect::<Option<Vec<_>>>()
                            .ok_or_else(|| Error::invalid_group(&value))?;
                        group = group.exclude(props);
                    }
                    Some(_) => return Err(Error::invalid_group(&value)),
                }
                Ok(Self::Filtered(group))
            }
            other => Err(Error::invalid_group(&other)),
        }
    }
}

/// Selection of groups along one view axis (entities or edges).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Groups {
    /// Every group, no filtering. Encodes as an empty map.
    #[default]
    All,
    /// Leave this axis out of the view.
    Excluded,
    /// Only the listed groups.
    Only(Vec<GroupRef>),
}

impl Groups {
    /// Select only the given groups.
    ///
    /// An empty list is the same selection as [`Groups::All`].
    pub fn only<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupRef>,
    {
        let groups: Vec<GroupRef> = groups.into_iter().map(Into::into).collect();
        if groups.is_empty() {
            Self::All
        } else {
            Self::Only(groups)
        }
    }

    /// Check whether this axis is left out of the view.
    pub fn is_excluded(&self) -> bool {
        matches!(self, Self::Excluded)
    }

    /// Encode the merged group map, or `None` when the axis is excluded.
    ///
    /// Later entries with the same name replace earlier ones entirely.
    pub fn encode(&self) -> Option<Value> {
        match self {
            Self::All => Some(Value::Object(Map::new())),
            Self::Excluded => None,
            Self::Only(groups) => {
                let mut merged = Map::new();
                for group in groups {
                    merged.insert(group.name().to_string(), group.definition());
                }
                Some(Value::Object(merged))
            }
        }
    }
}

impl<G: Into<GroupRef>> FromIterator<G> for Groups {
    fn from_iter<I: IntoIterator<Item = G>>(iter: I) -> Self {
        Self::only(iter)
    }
}

impl<G: Into<GroupRef>> From<Vec<G>> for Groups {
    fn from(groups: Vec<G>) -> Self {
        Self::only(groups)
    }
}

impl<G: Into<GroupRef>, const N: usize> From<[G; N]> for Groups {
    fn from(groups: [G; N]) -> Self {
        Self::only(groups)
    }
}

impl TryFrom<Value> for Groups {
    type Error = Error;

    /// `null` excludes the axis, an array lists groups (empty means all).
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Excluded),
            Value::Array(items) => {
                let groups = items
                    .into_iter()
                    .map(GroupRef::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::only(groups))
            }
            other => Err(Error::invalid_groups(&other)),
        }
    }
}

/// The `view` section of a retrieval operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    /// Entity groups to return.
    pub entities: Groups,
    /// Edge groups to return.
    pub edges: Groups,
}

impl View {
    /// Create a view returning every entity and edge group.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Encode for View {
    fn encode(&self) -> Value {
        let mut view = Map::new();
        if let Some(entities) = self.entities.encode() {
            view.insert("entities".to_string(), entities);
        }
        if let Some(edges) = self.edges.encode() {
            view.insert("edges".to_string(), edges);
        }
        Value::Object(view)
    }
}
