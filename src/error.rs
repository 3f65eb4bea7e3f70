//! Error types for template dereferencing.
//!
//! Two enums cover the whole failure surface:
//!
//! ```text
//! DeploymentContext::new  → ContextError
//! Resolver::resolve       → ResolveError (wraps ContextError for the one-shot entry point)
//! ```
//!
//! ## Rules
//!
//! - `thiserror` for enum derivation, no manual `Display` impls.
//! - A key that is not a registered function never produces an error; it is
//!   plain data. Every variant here means a recognized construct was misused.
//! - `UnsupportedResourceKind` is the only variant raised by the return-value
//!   provider for kinds it does not know.

use thiserror::Error;

/// Failure while freezing the deployment facts into a context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Deployment context is missing required field '{field}'")]
    MissingField { field: &'static str },
}

/// Failure raised while resolving a template. The first one aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// A recognized function was called with the wrong argument shape.
    #[error("{function}: {reason}")]
    InvalidArguments {
        function: &'static str,
        reason: String,
    },

    /// `Ref` target is not a pseudo parameter, declared parameter or resource.
    #[error("Unresolved reference: '{0}' is not a parameter, resource or pseudo parameter")]
    UnresolvedReference(String),

    #[error("Unknown resource: '{0}'")]
    UnknownResource(String),

    #[error("Unsupported resource kind '{kind}' for resource '{resource}'")]
    UnsupportedResourceKind { resource: String, kind: String },

    #[error("Resource '{resource}' of kind '{kind}' has no attribute '{attribute}'")]
    UnknownAttribute {
        resource: String,
        kind: String,
        attribute: String,
    },

    /// A resource's name property is self-referential or not a string.
    #[error("Invalid name for resource '{resource}': {reason}")]
    InvalidResourceName { resource: String, reason: String },

    #[error("Mapping lookup failed: [{mapping}][{key}][{attribute}]")]
    MappingLookup {
        mapping: String,
        key: String,
        attribute: String,
    },

    #[error("Unknown condition: '{0}'")]
    UnknownCondition(String),

    #[error("Condition '{condition}' did not evaluate to a boolean (got {found})")]
    ConditionNotBoolean { condition: String, found: String },

    #[error("Parameter '{parameter}' has unsupported type '{declared}'")]
    UnsupportedParameterType { parameter: String, declared: String },

    #[error("Parameter '{parameter}' value '{value}' is invalid: {reason}")]
    InvalidParameterValue {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Parameter '{0}' has no supplied value and no default")]
    MissingParameterValue(String),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("Resolution exceeded the maximum nesting depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl ResolveError {
    pub(crate) fn invalid(function: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            function,
            reason: reason.into(),
        }
    }

    /// True when the return-value provider has no table entry for a kind.
    pub fn is_unsupported_kind(&self) -> bool {
        matches!(self, Self::UnsupportedResourceKind { .. })
    }
}
