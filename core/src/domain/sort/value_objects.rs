use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use utoipa::ToSchema;

use crate::domain::params::value_objects::ParamValue;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTerm {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered field -> direction mapping. The first term has the highest
/// precedence; a field appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    terms: Vec<SortTerm>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn single(field: impl Into<String>, direction: SortDirection) -> Self {
        let mut spec = Self::new();
        spec.insert(field, direction);
        spec
    }

    /// Sets the direction of `field`. A new field is appended; an existing
    /// one keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        match self.terms.iter_mut().find(|t| t.field == field) {
            Some(term) => term.direction = direction,
            None => self.terms.push(SortTerm { field, direction }),
        }
    }

    /// Appends the terms of `other` whose field is not already present.
    pub fn merge(&mut self, other: SortSpec) {
        for term in other.terms {
            if !self.contains(&term.field) {
                self.terms.push(term);
            }
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.terms.iter().any(|t| t.field == field)
    }

    pub fn get(&self, field: &str) -> Option<SortDirection> {
        self.terms
            .iter()
            .find(|t| t.field == field)
            .map(|t| t.direction)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortTerm> {
        self.terms.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.field.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, SortDirection)> for SortSpec {
    fn from_iter<I: IntoIterator<Item = (K, SortDirection)>>(iter: I) -> Self {
        let mut spec = SortSpec::new();
        for (field, direction) in iter {
            spec.insert(field, direction);
        }
        spec
    }
}

impl IntoIterator for SortSpec {
    type Item = SortTerm;
    type IntoIter = std::vec::IntoIter<SortTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

impl<'a> IntoIterator for &'a SortSpec {
    type Item = &'a SortTerm;
    type IntoIter = std::slice::Iter<'a, SortTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

// Serialized as a map so configuration reads naturally
// (`{"created_at": "desc", "id": "asc"}`); key order is kept.
impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len()))?;
        for term in &self.terms {
            map.serialize_entry(&term.field, &term.direction)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SortSpecVisitor;

        impl<'de> Visitor<'de> for SortSpecVisitor {
            type Value = SortSpec;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to \"asc\" or \"desc\"")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SortSpec, A::Error> {
                let mut spec = SortSpec::new();
                while let Some((field, direction)) =
                    access.next_entry::<String, SortDirection>()?
                {
                    spec.insert(field, direction);
                }
                Ok(spec)
            }
        }

        deserializer.deserialize_map(SortSpecVisitor)
    }
}

/// A direction as it arrives in a request. Only `"desc"` and a typed
/// [`SortDirection::Desc`] read as descending.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionValue {
    Str(String),
    Bool(bool),
    Direction(SortDirection),
    Other,
}

impl DirectionValue {
    pub fn to_direction(&self) -> SortDirection {
        match self {
            DirectionValue::Str(s) if s == "desc" => SortDirection::Desc,
            DirectionValue::Direction(direction) => *direction,
            _ => SortDirection::Asc,
        }
    }
}

impl From<&str> for DirectionValue {
    fn from(value: &str) -> Self {
        DirectionValue::Str(value.to_string())
    }
}

impl From<bool> for DirectionValue {
    fn from(value: bool) -> Self {
        DirectionValue::Bool(value)
    }
}

impl From<SortDirection> for DirectionValue {
    fn from(value: SortDirection) -> Self {
        DirectionValue::Direction(value)
    }
}

impl From<&ParamValue> for DirectionValue {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Scalar(s) => DirectionValue::Str(s.clone()),
            _ => DirectionValue::Other,
        }
    }
}

/// The untrusted sort value taken from a request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestedSort {
    #[default]
    Absent,
    Field(String),
    Fields(Vec<(String, DirectionValue)>),
}

impl RequestedSort {
    pub fn field(field: impl Into<String>) -> Self {
        RequestedSort::Field(field.into())
    }

    pub fn fields<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<DirectionValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        RequestedSort::Fields(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Reads a decoded `sort` parameter. Arrays cannot name a single field
    /// and read as absent.
    pub fn from_param(value: Option<&ParamValue>) -> Self {
        match value {
            None | Some(ParamValue::Null) | Some(ParamValue::Array(_)) => RequestedSort::Absent,
            Some(ParamValue::Scalar(field)) => RequestedSort::Field(field.clone()),
            Some(ParamValue::Map(entries)) => RequestedSort::Fields(
                entries
                    .iter()
                    .map(|(field, direction)| (field.clone(), DirectionValue::from(direction)))
                    .collect(),
            ),
        }
    }
}

impl From<SortSpec> for RequestedSort {
    fn from(spec: SortSpec) -> Self {
        RequestedSort::Fields(
            spec.into_iter()
                .map(|t| (t.field, DirectionValue::Direction(t.direction)))
                .collect(),
        )
    }
}

/// Sort used when the request asks for none, or for nothing allowed.
///
/// Deserializes from `null`, a field name, or a field -> direction map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultSort {
    #[default]
    None,
    Field(String),
    Spec(SortSpec),
}

impl DefaultSort {
    pub fn field(field: impl Into<String>) -> Self {
        DefaultSort::Field(field.into())
    }
}

impl From<&str> for DefaultSort {
    fn from(value: &str) -> Self {
        DefaultSort::Field(value.to_string())
    }
}

impl From<SortSpec> for DefaultSort {
    fn from(value: SortSpec) -> Self {
        DefaultSort::Spec(value)
    }
}
