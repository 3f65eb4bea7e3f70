//! Template document and its resources
//!
//! `Template` owns a deep copy of the caller's document; nothing in this crate
//! ever writes to the caller's value. Section accessors return borrowed views
//! into that copy.

use serde_json::{Map, Value as JsonValue};
use std::cell::{Cell, OnceCell};
use std::collections::HashMap;

use crate::error::ResolveError;

pub const PARAMETERS: &str = "Parameters";
pub const MAPPINGS: &str = "Mappings";
pub const CONDITIONS: &str = "Conditions";
pub const RESOURCES: &str = "Resources";
pub const OUTPUTS: &str = "Outputs";

/// Owned copy of a template document
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    document: JsonValue,
}

impl Template {
    /// Deep-copy the caller's document.
    pub fn new(document: &JsonValue) -> Self {
        Self {
            document: document.clone(),
        }
    }

    pub fn document(&self) -> &JsonValue {
        &self.document
    }

    fn section(&self, name: &str) -> Option<&Map<String, JsonValue>> {
        self.document.get(name).and_then(JsonValue::as_object)
    }

    /// Declaration of a parameter (`{"Type": ..., "Default": ...}`).
    pub fn parameter(&self, name: &str) -> Option<&JsonValue> {
        self.section(PARAMETERS)?.get(name)
    }

    /// Raw (unresolved) expression of a named condition.
    pub fn condition(&self, name: &str) -> Option<&JsonValue> {
        self.section(CONDITIONS)?.get(name)
    }

    /// Three-level `Mappings` lookup.
    pub fn mapping_value(&self, mapping: &str, key: &str, attribute: &str) -> Option<&JsonValue> {
        self.section(MAPPINGS)?.get(mapping)?.get(key)?.get(attribute)
    }

    /// Build one `Entity` per declared resource, from copies of their definitions.
    pub fn entities(&self) -> HashMap<String, Entity> {
        self.section(RESOURCES)
            .map(|resources| {
                resources
                    .iter()
                    .map(|(name, definition)| (name.clone(), Entity::new(name, definition)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One declared resource
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    kind: String,
    definition: JsonValue,
    display_name: OnceCell<String>,
    resolving_name: Cell<bool>,
}

impl Entity {
    pub fn new(name: &str, definition: &JsonValue) -> Self {
        Self {
            name: name.to_string(),
            kind: definition
                .get("Type")
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string(),
            definition: definition.clone(),
            display_name: OnceCell::new(),
            resolving_name: Cell::new(false),
        }
    }

    /// Declared (logical) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared `Type`; empty when the definition has none
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn property(&self, key: &str) -> Option<&JsonValue> {
        self.definition.get("Properties")?.get(key)
    }

    /// Name the deployment would give this resource.
    ///
    /// The first of `name_properties` present in `Properties` is resolved with
    /// `resolve` and must produce a string; without one the declared name is
    /// used. The result is computed once and cached.
    pub fn display_name<F>(&self, name_properties: &[&str], resolve: F) -> Result<&str, ResolveError>
    where
        F: FnOnce(&JsonValue) -> Result<JsonValue, ResolveError>,
    {
        if let Some(name) = self.display_name.get() {
            return Ok(name);
        }
        if self.resolving_name.replace(true) {
            return Err(ResolveError::InvalidResourceName {
                resource: self.name.clone(),
                reason: "name refers to itself".to_string(),
            });
        }
        let resolved = self.resolve_display_name(name_properties, resolve);
        self.resolving_name.set(false);

        let name = resolved?;
        Ok(self.display_name.get_or_init(|| name))
    }

    fn resolve_display_name<F>(&self, name_properties: &[&str], resolve: F) -> Result<String, ResolveError>
    where
        F: FnOnce(&JsonValue) -> Result<JsonValue, ResolveError>,
    {
        let Some(raw) = name_properties.iter().find_map(|key| self.property(key)) else {
            return Ok(self.name.clone());
        };
        match resolve(raw)? {
            JsonValue::String(s) => Ok(s),
            JsonValue::Null => Ok(self.name.clone()),
            other => Err(ResolveError::InvalidResourceName {
                resource: self.name.clone(),
                reason: format!("resolved to a non-string: {}", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> JsonValue {
        json!({
            "Parameters": {"Env": {"Type": "String", "Default": "dev"}},
            "Mappings": {"Regions": {"eu-west-1": {"Ami": "ami-123"}}},
            "Conditions": {"IsProd": {"Fn::Equals": [{"Ref": "Env"}, "prod"]}},
            "Resources": {
                "Queue": {"Type": "AWS::SQS::Queue", "Properties": {"QueueName": "jobs"}},
                "Bare": {"Properties": {}}
            }
        })
    }

    #[test]
    fn test_sections() {
        let template = Template::new(&doc());
        assert_eq!(template.parameter("Env").unwrap()["Default"], json!("dev"));
        assert!(template.parameter("Nope").is_none());
        assert_eq!(
            template.mapping_value("Regions", "eu-west-1", "Ami"),
            Some(&json!("ami-123"))
        );
        assert!(template.mapping_value("Regions", "us-east-1", "Ami").is_none());
        assert!(template.condition("IsProd").is_some());
    }

    #[test]
    fn test_entities() {
        let entities = Template::new(&doc()).entities();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities["Queue"].kind(), "AWS::SQS::Queue");
        assert_eq!(entities["Bare"].kind(), "");
        assert_eq!(entities["Queue"].property("QueueName"), Some(&json!("jobs")));
    }

    #[test]
    fn test_template_without_sections() {
        let template = Template::new(&json!({"Description": "empty"}));
        assert!(template.entities().is_empty());
        assert!(template.condition("Any").is_none());
    }

    #[test]
    fn test_display_name_cached() {
        let entity = Entity::new(
            "Queue",
            &json!({"Type": "AWS::SQS::Queue", "Properties": {"QueueName": "jobs"}}),
        );
        let first = entity
            .display_name(&["QueueName"], |raw| Ok(raw.clone()))
            .unwrap()
            .to_string();
        // A second resolver would fail; the cached value is returned instead.
        let second = entity
            .display_name(&["QueueName"], |_| {
                Err(ResolveError::UnknownResource("unused".into()))
            })
            .unwrap();
        assert_eq!(first, "jobs");
        assert_eq!(second, "jobs");
    }

    #[test]
    fn test_display_name_falls_back_to_declared_name() {
        let entity = Entity::new("Topic", &json!({"Type": "AWS::SNS::Topic"}));
        assert_eq!(
            entity.display_name(&["TopicName"], |raw| Ok(raw.clone())).unwrap(),
            "Topic"
        );

        let no_value = Entity::new(
            "Bucket",
            &json!({"Type": "AWS::S3::Bucket", "Properties": {"BucketName": {"Ref": "AWS::NoValue"}}}),
        );
        assert_eq!(
            no_value
                .display_name(&["BucketName"], |_| Ok(JsonValue::Null))
                .unwrap(),
            "Bucket"
        );
    }

    #[test]
    fn test_display_name_self_reference_is_error() {
        let entity = Entity::new(
            "Queue",
            &json!({"Type": "AWS::SQS::Queue", "Properties": {"QueueName": "x"}}),
        );
        let err = entity
            .display_name(&["QueueName"], |_| {
                entity
                    .display_name(&["QueueName"], |raw| Ok(raw.clone()))
                    .map(|s| JsonValue::String(s.to_string()))
            })
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::InvalidResourceName {
                resource: "Queue".into(),
                reason: "name refers to itself".into(),
            }
        );

        // The guard is released after a failed attempt.
        assert_eq!(
            entity.display_name(&["QueueName"], |raw| Ok(raw.clone())).unwrap(),
            "x"
        );
    }

    #[test]
    fn test_display_name_rejects_non_string() {
        let entity = Entity::new(
            "Table",
            &json!({"Type": "AWS::DynamoDB::Table", "Properties": {"TableName": 5}}),
        );
        assert!(matches!(
            entity.display_name(&["TableName"], |raw| Ok(raw.clone())),
            Err(ResolveError::InvalidResourceName { ref resource, .. }) if resource == "Table"
        ));
    }
}
