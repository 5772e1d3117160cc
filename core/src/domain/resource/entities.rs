use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    common::entities::app_errors::CoreError, params::value_objects::ParamValue,
};

/// Submitted attributes in request order.
pub type Attributes = Vec<(String, ParamValue)>;

pub const DEFAULT_TYPE_KEY: &str = "type";

fn default_type_key() -> String {
    DEFAULT_TYPE_KEY.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Attribute allow-lists for a resource with several variants (single
/// table inheritance style). Attributes in `common` are permitted for every
/// registered type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTypes {
    #[serde(default = "default_type_key")]
    pub type_key: String,

    #[serde(default)]
    pub common: Vec<String>,

    #[serde(default)]
    types: Vec<ResourceType>,
}

impl Default for ResourceTypes {
    fn default() -> Self {
        Self {
            type_key: default_type_key(),
            common: Vec::new(),
            types: Vec::new(),
        }
    }
}

impl ResourceTypes {
    pub fn new<I, S>(common: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            common: common.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Registers `name` or replaces its allow-list.
    pub fn with_type<I, S>(mut self, name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let attributes = attributes.into_iter().map(Into::into).collect();
        match self.types.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.attributes = attributes,
            None => self.types.push(ResourceType { name, attributes }),
        }
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.name.as_str())
    }

    fn find(&self, name: &str) -> Option<&ResourceType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// The requested type when it is registered, else the current one when
    /// nothing was requested.
    pub fn resolve_type(
        &self,
        requested: Option<&str>,
        current: Option<&str>,
    ) -> Result<String, CoreError> {
        let name = match (requested, current) {
            (Some(requested), _) => requested,
            (None, Some(current)) => current,
            (None, None) => {
                warn!("no resource type given");
                return Err(CoreError::NotFound);
            }
        };

        if self.is_registered(name) {
            Ok(name.to_string())
        } else {
            warn!("resource type {:?} is not registered", name);
            Err(CoreError::NotFound)
        }
    }

    /// Keeps the attributes permitted for `type_name`, in submitted order.
    /// The type attribute itself is always kept.
    pub fn permit(
        &self,
        type_name: &str,
        attributes: &[(String, ParamValue)],
    ) -> Result<Attributes, CoreError> {
        let resource_type = self.find(type_name).ok_or(CoreError::NotFound)?;
        let permitted = |key: &str| {
            key == self.type_key
                || self.common.iter().any(|c| c == key)
                || resource_type.attributes.iter().any(|a| a == key)
        };

        Ok(attributes
            .iter()
            .filter(|(key, _)| permitted(key))
            .cloned()
            .collect())
    }

    /// Attributes for a new record: the submitted type decides the
    /// allow-list and must be registered.
    pub fn permit_new(
        &self,
        attributes: &[(String, ParamValue)],
    ) -> Result<(String, Attributes), CoreError> {
        let requested = self.requested_type(attributes);
        let type_name = self.resolve_type(requested, None)?;
        let permitted = self.permit(&type_name, attributes)?;
        Ok((type_name, permitted))
    }

    /// Attributes for an existing record of `current_type`. A submitted type
    /// is dropped; records keep their type on update.
    pub fn permit_existing(
        &self,
        current_type: &str,
        attributes: &[(String, ParamValue)],
    ) -> Result<Attributes, CoreError> {
        let type_name = self.resolve_type(None, Some(current_type))?;
        let mut permitted = self.permit(&type_name, attributes)?;
        permitted.retain(|(key, _)| *key != self.type_key);
        Ok(permitted)
    }

    fn requested_type<'a>(&self, attributes: &'a [(String, ParamValue)]) -> Option<&'a str> {
        attributes
            .iter()
            .find(|(key, _)| *key == self.type_key)
            .and_then(|(_, value)| value.as_str())
    }
}

/// Scopes a nested resource to its parent: the parent key always comes from
/// the route, never from submitted attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentScope {
    pub key: String,
}

impl ParentScope {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn scope(&self, parent_id: impl Display, mut attributes: Attributes) -> Attributes {
        attributes.retain(|(key, _)| *key != self.key);
        attributes.push((self.key.clone(), ParamValue::Scalar(parent_id.to_string())));
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_types() -> ResourceTypes {
        ResourceTypes::new(["name"])
            .with_type("Project::Internal", ["department"])
            .with_type("Project::External", ["company"])
    }

    fn attrs(entries: &[(&str, &str)]) -> Attributes {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), ParamValue::scalar(*v)))
            .collect()
    }

    fn submitted(type_name: &str) -> Attributes {
        attrs(&[
            ("name", "New project"),
            ("user_id", "2"),
            ("department", "D"),
            ("company", "C"),
            ("type", type_name),
        ])
    }

    #[test]
    fn test_permit_new_respects_type() {
        let types = project_types();

        let (type_name, permitted) = types.permit_new(&submitted("Project::Internal")).unwrap();
        assert_eq!(type_name, "Project::Internal");
        assert_eq!(
            permitted,
            attrs(&[
                ("name", "New project"),
                ("department", "D"),
                ("type", "Project::Internal"),
            ])
        );

        let (_, permitted) = types.permit_new(&submitted("Project::External")).unwrap();
        assert_eq!(
            permitted,
            attrs(&[
                ("name", "New project"),
                ("company", "C"),
                ("type", "Project::External"),
            ])
        );
    }

    #[test]
    fn test_permit_new_rejects_unknown_type() {
        let types = project_types();
        assert_eq!(
            types.permit_new(&submitted("Project::Hidden")),
            Err(CoreError::NotFound)
        );
        assert_eq!(
            types.permit_new(&attrs(&[("name", "x")])),
            Err(CoreError::NotFound)
        );
    }

    #[test]
    fn test_permit_existing_keeps_record_type() {
        let types = project_types();
        let permitted = types
            .permit_existing("Project::External", &submitted("Project::Hidden"))
            .unwrap();
        assert_eq!(
            permitted,
            attrs(&[("name", "New project"), ("company", "C")])
        );

        let permitted = types
            .permit_existing("Project::Internal", &submitted("Project::Hidden"))
            .unwrap();
        assert_eq!(
            permitted,
            attrs(&[("name", "New project"), ("department", "D")])
        );
    }

    #[test]
    fn test_resolve_type() {
        let types = project_types();
        assert_eq!(
            types.resolve_type(None, Some("Project::Internal")),
            Ok("Project::Internal".to_string())
        );
        assert_eq!(
            types.resolve_type(Some("Project::External"), Some("Project::Internal")),
            Ok("Project::External".to_string())
        );
        assert_eq!(types.resolve_type(None, None), Err(CoreError::NotFound));
    }

    #[test]
    fn test_parent_scope_overrides_submitted_key() {
        let scope = ParentScope::new("user_id");
        let scoped = scope.scope(1, attrs(&[("user_id", "2"), ("name", "New project")]));
        assert_eq!(
            scoped,
            attrs(&[("name", "New project"), ("user_id", "1")])
        );
    }

    #[test]
    fn test_deserialize_config() {
        let types: ResourceTypes = serde_json::from_str(
            r#"{
                "common": ["name"],
                "types": [
                    {"name": "Project::Internal", "attributes": ["department"]},
                    {"name": "Project::External", "attributes": ["company"]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(types, project_types());
        assert_eq!(types.type_key, "type");
    }
}
