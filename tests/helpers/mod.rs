//! Shared fixtures for the integration tests
//!
//! Fixture templates are written as YAML and parsed into `serde_json::Value`.

#![allow(dead_code)]

use serde_json::Value as JsonValue;
use template_deref::{
    DeploymentContext, DeploymentFacts, NotSemantics, ParameterValues, ResolveError, Resolver,
    ResolverConfig,
};
use uuid::Uuid;

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "eu-west-1";
pub const STACK: &str = "orders";

/// Install a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn facts() -> DeploymentFacts {
    DeploymentFacts::new(ACCOUNT, REGION, STACK)
}

pub fn yaml(source: &str) -> JsonValue {
    serde_yaml::from_str(source).expect("fixture YAML parses")
}

pub fn params(pairs: &[(&str, &str)]) -> ParameterValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn resolver(document: &JsonValue, parameters: ParameterValues, not: NotSemantics) -> Resolver {
    init_tracing();
    let context = DeploymentContext::with_correlation_token(facts(), Uuid::nil())
        .expect("fixture facts are complete");
    Resolver::new(
        document,
        context,
        parameters,
        ResolverConfig::fixed(not, 128),
    )
}

pub fn resolve(document: &JsonValue, parameters: ParameterValues) -> Result<JsonValue, ResolveError> {
    resolver(document, parameters, NotSemantics::Passthrough).resolve_template()
}
