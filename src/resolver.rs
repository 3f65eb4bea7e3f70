//! Value resolver
//!
//! Walks a template tree and replaces every function node with its value.
//!
//! ## Dispatch
//!
//! A mapping is a function call only when it has exactly one key, that key
//! is registered in the [`FunctionRegistry`] and the entry claims the argument.
//! Every other mapping is plain data and is resolved value by value with its
//! keys preserved. The membership test happens before any handler runs, so a
//! misused function is a hard error and never silently degrades into data.
//! `Condition` is the one entry that claims only name-shaped arguments.

use serde_json::{Map, Value as JsonValue};
use std::cell::Cell;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::config::ResolverConfig;
use crate::context::{DeploymentContext, PseudoParameter};
use crate::error::ResolveError;
use crate::functions::FunctionRegistry;
use crate::parameters::{coerce_parameter, ParameterValues};
use crate::provider::{ResourceKind, ReturnValues};
use crate::template::{Entity, Template};

/// Resolver for a single run
///
/// Owns a deep copy of the document, the entities built from it, the
/// deployment context and the caller's parameter values. Build a new one per
/// run; nothing is shared between runs.
pub struct Resolver {
    template: Template,
    entities: HashMap<String, Entity>,
    context: DeploymentContext,
    parameters: ParameterValues,
    config: ResolverConfig,
    depth: Cell<usize>,
}

impl Resolver {
    pub fn new(
        document: &JsonValue,
        context: DeploymentContext,
        parameters: ParameterValues,
        config: ResolverConfig,
    ) -> Self {
        let template = Template::new(document);
        let entities = template.entities();
        Self {
            template,
            entities,
            context,
            parameters,
            config,
            depth: Cell::new(0),
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn context(&self) -> &DeploymentContext {
        &self.context
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Resolve the whole document, every section included.
    pub fn resolve_template(&self) -> Result<JsonValue, ResolveError> {
        debug!(
            stack = self.context.stack_name(),
            region = self.context.region(),
            resources = self.entities.len(),
            "resolving template"
        );
        let resolved = self.resolve(self.template.document())?;
        debug!(stack = self.context.stack_name(), "template resolved");
        Ok(resolved)
    }

    /// Resolve any subtree.
    pub fn resolve(&self, value: &JsonValue) -> Result<JsonValue, ResolveError> {
        let _guard = self.enter()?;

        match value {
            JsonValue::Array(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            JsonValue::Object(map) => {
                if let Some((key, arg)) = single_entry(map) {
                    if let Some(entry) = FunctionRegistry::global()
                        .get(key)
                        .filter(|entry| entry.claims(arg))
                    {
                        trace!(function = entry.name, "dispatch");
                        return (entry.func)(self, arg);
                    }
                }
                map.iter()
                    .map(|(key, child)| self.resolve(child).map(|v| (key.clone(), v)))
                    .collect::<Result<Map<_, _>, _>>()
                    .map(JsonValue::Object)
            }
            scalar => Ok(scalar.clone()),
        }
    }

    fn enter(&self) -> Result<DepthGuard<'_>, ResolveError> {
        let depth = self.depth.get();
        if depth >= self.config.max_depth {
            return Err(ResolveError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard { depth: &self.depth })
    }

    /// `Ref` semantics for an already-resolved name.
    ///
    /// Pseudo parameters shadow declared parameters, which shadow resources.
    pub fn reference(&self, name: &str) -> Result<JsonValue, ResolveError> {
        if let Some(pseudo) = PseudoParameter::from_name(name) {
            return Ok(self.context.pseudo_value(pseudo));
        }
        if let Some(declaration) = self.template.parameter(name) {
            let supplied = self.parameters.get(name).map(String::as_str);
            return coerce_parameter(name, declaration, supplied);
        }
        if let Some(entity) = self.entities.get(name) {
            return Ok(self.return_values(entity)?.reference);
        }
        Err(ResolveError::UnresolvedReference(name.to_string()))
    }

    /// `Fn::GetAtt` semantics for an already-resolved resource and attribute.
    pub fn attribute(&self, resource: &str, attribute: &str) -> Result<JsonValue, ResolveError> {
        let entity = self
            .entities
            .get(resource)
            .ok_or_else(|| ResolveError::UnknownResource(resource.to_string()))?;
        let values = self.return_values(entity)?;
        values
            .attribute(attribute)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownAttribute {
                resource: resource.to_string(),
                kind: entity.kind().to_string(),
                attribute: attribute.to_string(),
            })
    }

    /// Evaluate a declared condition to a boolean.
    pub fn condition(&self, name: &str) -> Result<bool, ResolveError> {
        let expression = self
            .template
            .condition(name)
            .ok_or_else(|| ResolveError::UnknownCondition(name.to_string()))?;
        match self.resolve(expression)? {
            JsonValue::Bool(b) => Ok(b),
            other => Err(ResolveError::ConditionNotBoolean {
                condition: name.to_string(),
                found: other.to_string(),
            }),
        }
    }

    /// Synthesized values for a resource, by its kind.
    pub fn return_values(&self, entity: &Entity) -> Result<ReturnValues, ResolveError> {
        let kind = ResourceKind::from_type_name(entity.kind()).ok_or_else(|| {
            ResolveError::UnsupportedResourceKind {
                resource: entity.name().to_string(),
                kind: entity.kind().to_string(),
            }
        })?;
        let display_name = entity.display_name(kind.name_properties(), |raw| self.resolve(raw))?;
        Ok(kind.return_values(display_name, &self.context))
    }
}

fn single_entry(map: &Map<String, JsonValue>) -> Option<(&String, &JsonValue)> {
    if map.len() == 1 {
        map.iter().next()
    } else {
        None
    }
}

struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
