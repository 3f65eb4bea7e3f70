//! Template Dereferencing
//!
//! Computes, offline, what a deployment service would make of an
//! infrastructure template: intrinsic functions, conditions, parameters and
//! pseudo parameters are replaced by literal values. Nothing is deployed and
//! nothing is fetched; created resources get synthesized identifiers.
//!
//! ## Call chain
//!
//! ```text
//! document + DeploymentFacts + parameter values
//!   -> DeploymentContext::new        (validate facts, fabricate correlation token)
//!   -> Resolver::new                 (deep copy, build entities)
//!   -> Resolver::resolve_template    (walk tree, dispatch through FunctionRegistry)
//!   -> resolved document
//! ```
//!
//! Mappings whose single key is not a registered function are plain data and
//! survive with their keys intact. A registered function called with the
//! wrong arguments aborts the run with a [`ResolveError`].
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use std::collections::HashMap;
//! use template_deref::{dereference, DeploymentFacts};
//!
//! let document = json!({
//!     "Resources": {"Jobs": {"Type": "AWS::SQS::Queue"}},
//!     "Outputs": {"JobsArn": {"Value": {"Fn::GetAtt": ["Jobs", "Arn"]}}}
//! });
//! let facts = DeploymentFacts::new("123456789012", "us-east-1", "app");
//!
//! let resolved = dereference(&document, facts, HashMap::new()).unwrap();
//! assert_eq!(
//!     resolved["Outputs"]["JobsArn"]["Value"],
//!     json!("arn:aws:sqs:us-east-1:123456789012:Jobs")
//! );
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod functions;
pub mod parameters;
pub mod provider;
pub mod resolver;
pub mod substitute;
pub mod template;

pub use config::{NotSemantics, ResolverConfig};
pub use context::{DeploymentContext, DeploymentFacts, PseudoParameter};
pub use error::{ContextError, ResolveError};
pub use functions::{FunctionEntry, FunctionRegistry};
pub use parameters::{ParameterType, ParameterValues};
pub use provider::{ResourceKind, ReturnValues};
pub use resolver::Resolver;
pub use template::{Entity, Template};

use serde_json::Value as JsonValue;

/// Resolve a whole document in one call with the default configuration.
///
/// Context, resolver and entities are built fresh and dropped on return.
pub fn dereference(
    document: &JsonValue,
    facts: DeploymentFacts,
    parameters: ParameterValues,
) -> Result<JsonValue, ResolveError> {
    dereference_with(document, facts, parameters, ResolverConfig::default())
}

/// `dereference` with an explicit configuration.
pub fn dereference_with(
    document: &JsonValue,
    facts: DeploymentFacts,
    parameters: ParameterValues,
    config: ResolverConfig,
) -> Result<JsonValue, ResolveError> {
    let context = DeploymentContext::new(facts)?;
    Resolver::new(document, context, parameters, config).resolve_template()
}
