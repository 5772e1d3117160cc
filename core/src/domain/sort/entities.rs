use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    services::resolve,
    value_objects::{DefaultSort, RequestedSort, SortSpec},
};

pub const DEFAULT_ACTION: &str = "index";

/// One field or a list of fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(field) => vec![field],
            OneOrMany::Many(fields) => fields,
        }
    }
}

fn deserialize_fields<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    OneOrMany::deserialize(deserializer).map(Vec::from)
}

fn default_actions() -> Vec<String> {
    vec![DEFAULT_ACTION.to_string()]
}

/// A sort registration for a listing endpoint: which fields a request may
/// sort by, the fallback, and the actions it applies to.
///
/// ```json
/// { "by": ["id", "package_name"], "default": {"id": "desc"}, "only": ["index"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortScope {
    #[serde(deserialize_with = "deserialize_fields")]
    pub by: Vec<String>,

    #[serde(default)]
    pub default: DefaultSort,

    #[serde(default = "default_actions")]
    pub only: Vec<String>,
}

impl SortScope {
    pub fn new<I, S>(by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            by: by.into_iter().map(Into::into).collect(),
            default: DefaultSort::None,
            only: default_actions(),
        }
    }

    pub fn with_default(mut self, default: impl Into<DefaultSort>) -> Self {
        self.default = default.into();
        self
    }

    pub fn only<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn applies_to(&self, action: &str) -> bool {
        self.only.iter().any(|a| a == action)
    }

    pub fn resolve(&self, requested: &RequestedSort, descending_by_default: bool) -> SortSpec {
        resolve(requested, &self.by, &self.default, descending_by_default)
    }
}

/// Sort registrations of one endpoint, applied in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortScopes {
    scopes: Vec<SortScope>,
}

impl SortScopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scope: SortScope) -> &mut Self {
        self.scopes.push(scope);
        self
    }

    pub fn with(mut self, scope: SortScope) -> Self {
        self.scopes.push(scope);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortScope> {
        self.scopes.iter()
    }

    /// Resolves every scope registered for `action` against the same
    /// request and concatenates the results. A field already ordered by an
    /// earlier scope is not repeated.
    pub fn resolve(
        &self,
        action: &str,
        requested: &RequestedSort,
        descending_by_default: bool,
    ) -> SortSpec {
        let mut spec = SortSpec::new();
        for scope in self.scopes.iter().filter(|s| s.applies_to(action)) {
            spec.merge(scope.resolve(requested, descending_by_default));
        }
        debug!(
            "resolved sort for action {}: {:?}",
            action,
            spec.iter()
                .map(|t| format!("{} {}", t.field, t.direction))
                .collect::<Vec<_>>()
        );
        spec
    }
}
