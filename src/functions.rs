//! Function registry
//!
//! Every intrinsic function is a `FunctionEntry` in a static table keyed by
//! its document key. Handlers receive the raw, unresolved argument and resolve
//! whatever parts of it they need themselves.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::trace;

use crate::config::NotSemantics;
use crate::context::PseudoParameter;
use crate::error::ResolveError;
use crate::resolver::Resolver;
use crate::substitute;

/// Handler signature - raw argument in, resolved value out
pub type FunctionFn = fn(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError>;

/// Registered function with metadata
pub struct FunctionEntry {
    pub name: &'static str,
    pub func: FunctionFn,
    pub signature: &'static str,
    pub description: &'static str,
    /// Argument shapes this entry claims; anything else under the key is data.
    pub accepts: fn(arg: &JsonValue) -> bool,
}

impl FunctionEntry {
    /// True when `{name: arg}` is a call to this function.
    pub fn claims(&self, arg: &JsonValue) -> bool {
        (self.accepts)(arg)
    }
}

/// Lookup table of intrinsic functions
pub struct FunctionRegistry {
    functions: HashMap<&'static str, FunctionEntry>,
}

static REGISTRY: LazyLock<FunctionRegistry> =
    LazyLock::new(|| FunctionRegistry::new(builtin_functions()));

impl FunctionRegistry {
    pub fn new(entries: Vec<FunctionEntry>) -> Self {
        let mut functions = HashMap::new();
        for entry in entries {
            functions.insert(entry.name, entry);
        }
        Self { functions }
    }

    /// Registry of the built-in functions
    pub fn global() -> &'static FunctionRegistry {
        &REGISTRY
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    /// True when `name` is a function key rather than plain data.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

fn builtin_functions() -> Vec<FunctionEntry> {
    vec![
        FunctionEntry {
            name: "Ref",
            func: reference,
            signature: "name",
            description: "Pseudo parameter, parameter value or resource reference",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::GetAtt",
            func: get_att,
            signature: "[resource, attribute] | \"resource.attribute\"",
            description: "Synthesized attribute of a resource",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::FindInMap",
            func: find_in_map,
            signature: "[mapping, key, attribute]",
            description: "Lookup in the Mappings section",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::Join",
            func: join,
            signature: "[delimiter, [values...]] | [values...]",
            description: "Concatenate strings; no-value elements are dropped",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::Select",
            func: select,
            signature: "[index, [values...]]",
            description: "Element at a zero-based index",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::Split",
            func: split,
            signature: "[delimiter, string]",
            description: "Literal split into a list",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::Sub",
            func: sub,
            signature: "string | [string, {variables}]",
            description: "Substitute ${...} placeholders",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::Base64",
            func: encode_base64,
            signature: "string",
            description: "Standard base64 of the UTF-8 bytes",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::GetAZs",
            func: get_azs,
            signature: "region",
            description: "Availability zones (not implemented)",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::ImportValue",
            func: import_value,
            signature: "export name",
            description: "Cross-stack import (not implemented)",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::Equals",
            func: equals,
            signature: "[a, b]",
            description: "Structural equality",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::And",
            func: and,
            signature: "[a, b]",
            description: "Boolean AND, both sides evaluated",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::Or",
            func: or,
            signature: "[a, b]",
            description: "Boolean OR, both sides evaluated",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::Not",
            func: not,
            signature: "[a]",
            description: "Operand value (passthrough) or its inversion, per configuration",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Fn::If",
            func: if_,
            signature: "[condition, if_true, if_false]",
            description: "Branch on a declared condition",
            accepts: any_argument,
        },
        FunctionEntry {
            name: "Condition",
            func: condition,
            signature: "condition",
            description: "Boolean value of a declared condition",
            accepts: name_argument,
        },
    ]
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

fn any_argument(_arg: &JsonValue) -> bool {
    true
}

/// A literal name, or an intrinsic that computes one. `Condition` is also a
/// common key in policy documents, where its value is a mapping of operators.
fn name_argument(arg: &JsonValue) -> bool {
    match arg {
        JsonValue::String(_) => true,
        JsonValue::Object(map) if map.len() == 1 => map
            .keys()
            .next()
            .is_some_and(|key| FunctionRegistry::global().contains(key)),
        _ => false,
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "mapping",
    }
}

/// Raw argument as a list of exactly `N` items.
fn raw_args<'a, const N: usize>(
    function: &'static str,
    arg: &'a JsonValue,
) -> Result<&'a [JsonValue; N], ResolveError> {
    arg.as_array()
        .and_then(|items| <&[JsonValue; N]>::try_from(items.as_slice()).ok())
        .ok_or_else(|| {
            ResolveError::invalid(function, format!("expected a list of {} arguments", N))
        })
}

/// Resolve the argument and require a list of exactly `N` strings.
fn string_args<const N: usize>(
    resolver: &Resolver,
    function: &'static str,
    arg: &JsonValue,
) -> Result<[String; N], ResolveError> {
    let invalid = || ResolveError::invalid(function, format!("expected a list of {} strings", N));
    let JsonValue::Array(items) = resolver.resolve(arg)? else {
        return Err(invalid());
    };
    let strings = items
        .into_iter()
        .map(|item| match item {
            JsonValue::String(s) => Ok(s),
            _ => Err(invalid()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    <[String; N]>::try_from(strings).map_err(|_| invalid())
}

fn resolve_string(
    resolver: &Resolver,
    function: &'static str,
    what: &str,
    arg: &JsonValue,
) -> Result<String, ResolveError> {
    match resolver.resolve(arg)? {
        JsonValue::String(s) => Ok(s),
        other => Err(ResolveError::invalid(
            function,
            format!("{} must be a string, got {}", what, type_name(&other)),
        )),
    }
}

fn resolve_bool(
    resolver: &Resolver,
    function: &'static str,
    arg: &JsonValue,
) -> Result<bool, ResolveError> {
    match resolver.resolve(arg)? {
        JsonValue::Bool(b) => Ok(b),
        other => Err(ResolveError::invalid(
            function,
            format!("operand must be a boolean, got {}", type_name(&other)),
        )),
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

fn reference(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let name = resolve_string(resolver, "Ref", "name", arg)?;
    resolver.reference(&name)
}

fn get_att(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    if arg.is_string() {
        let dotted = resolve_string(resolver, "Fn::GetAtt", "argument", arg)?;
        let (resource, attribute) = dotted.split_once('.').ok_or_else(|| {
            ResolveError::invalid("Fn::GetAtt", format!("'{}' is not resource.attribute", dotted))
        })?;
        return resolver.attribute(resource, attribute);
    }
    let [resource, attribute] = string_args::<2>(resolver, "Fn::GetAtt", arg)?;
    resolver.attribute(&resource, &attribute)
}

fn find_in_map(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let [mapping, key, attribute] = string_args::<3>(resolver, "Fn::FindInMap", arg)?;
    resolver
        .template()
        .mapping_value(&mapping, &key, &attribute)
        .cloned()
        .ok_or(ResolveError::MappingLookup {
            mapping,
            key,
            attribute,
        })
}

// ---------------------------------------------------------------------------
// Strings and lists
// ---------------------------------------------------------------------------

fn join(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let (delimiter, values) = match arg.as_array().map(Vec::as_slice) {
        Some([delimiter, list]) => match resolver.resolve(list)? {
            JsonValue::Array(values) => (
                resolve_string(resolver, "Fn::Join", "delimiter", delimiter)?,
                values,
            ),
            // Shorthand: the whole argument is the list, joined with "".
            _ => (String::new(), join_list(resolver, arg)?),
        },
        _ => (String::new(), join_list(resolver, arg)?),
    };

    let mut parts = Vec::with_capacity(values.len());
    for value in values {
        match value {
            JsonValue::String(s) => parts.push(s),
            JsonValue::Null => {}
            other => {
                return Err(ResolveError::invalid(
                    "Fn::Join",
                    format!("list element must be a string, got {}", type_name(&other)),
                ))
            }
        }
    }
    Ok(JsonValue::String(parts.join(&delimiter)))
}

fn join_list(resolver: &Resolver, arg: &JsonValue) -> Result<Vec<JsonValue>, ResolveError> {
    match resolver.resolve(arg)? {
        JsonValue::Array(values) => Ok(values),
        other => Err(ResolveError::invalid(
            "Fn::Join",
            format!("expected a list, got {}", type_name(&other)),
        )),
    }
}

fn select(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let [index, list] = raw_args::<2>("Fn::Select", arg)?;

    let index = match resolver.resolve(index)? {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ResolveError::invalid("Fn::Select", "index is not an integer"))?;

    let JsonValue::Array(values) = resolver.resolve(list)? else {
        return Err(ResolveError::invalid("Fn::Select", "second argument is not a list"));
    };

    // Out of range yields the no-value marker rather than an error.
    let selected = usize::try_from(index)
        .ok()
        .and_then(|i| values.get(i).cloned());
    if selected.is_none() {
        trace!(index, len = values.len(), "Fn::Select index out of range");
    }
    Ok(selected.unwrap_or(JsonValue::Null))
}

fn split(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let [delimiter, source] = string_args::<2>(resolver, "Fn::Split", arg)?;
    let parts: Vec<JsonValue> = if delimiter.is_empty() {
        source
            .chars()
            .map(|c| JsonValue::String(c.to_string()))
            .collect()
    } else {
        source
            .split(delimiter.as_str())
            .map(|part| JsonValue::String(part.to_string()))
            .collect()
    };
    Ok(JsonValue::Array(parts))
}

fn sub(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let (template, variables) = match arg.as_array().map(Vec::as_slice) {
        Some([template, JsonValue::Object(variables)]) => (
            resolve_string(resolver, "Fn::Sub", "template", template)?,
            Some(variables),
        ),
        Some(_) => {
            return Err(ResolveError::invalid(
                "Fn::Sub",
                "expected a string or [string, {variables}]",
            ))
        }
        None => (resolve_string(resolver, "Fn::Sub", "template", arg)?, None),
    };

    trace!(placeholders = ?substitute::placeholders(&template), "Fn::Sub");
    let rendered = substitute::render(&template, |name| {
        placeholder_value(resolver, variables, name)
    })?;
    Ok(JsonValue::String(rendered))
}

/// Value for one `${name}` placeholder, in lookup order: explicit variable,
/// pseudo parameter, `resource.attribute`, then `Ref`.
fn placeholder_value(
    resolver: &Resolver,
    variables: Option<&Map<String, JsonValue>>,
    name: &str,
) -> Result<String, ResolveError> {
    let value = if let Some(raw) = variables.and_then(|vars| vars.get(name)) {
        resolver.resolve(raw)?
    } else if let Some(pseudo) = PseudoParameter::from_name(name) {
        resolver.context().pseudo_value(pseudo)
    } else if let Some((resource, attribute)) = name.split_once('.') {
        resolver.attribute(resource, attribute)?
    } else {
        resolver.reference(name)?
    };
    stringify(name, value)
}

fn stringify(name: &str, value: JsonValue) -> Result<String, ResolveError> {
    match value {
        JsonValue::String(s) => Ok(s),
        JsonValue::Null => Ok(String::new()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| stringify(name, item))
            .collect::<Result<Vec<_>, _>>()
            .map(|parts| parts.join(",")),
        JsonValue::Object(_) => Err(ResolveError::invalid(
            "Fn::Sub",
            format!("placeholder '${{{}}}' resolved to a mapping", name),
        )),
    }
}

fn encode_base64(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let text = resolve_string(resolver, "Fn::Base64", "argument", arg)?;
    Ok(JsonValue::String(STANDARD.encode(text.as_bytes())))
}

fn get_azs(_resolver: &Resolver, _arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    Err(ResolveError::NotImplemented("Fn::GetAZs"))
}

fn import_value(_resolver: &Resolver, _arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    Err(ResolveError::NotImplemented("Fn::ImportValue"))
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

fn equals(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let [a, b] = raw_args::<2>("Fn::Equals", arg)?;
    let a = resolver.resolve(a)?;
    let b = resolver.resolve(b)?;
    Ok(JsonValue::Bool(a == b))
}

fn and(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let [a, b] = raw_args::<2>("Fn::And", arg)?;
    let a = resolve_bool(resolver, "Fn::And", a)?;
    let b = resolve_bool(resolver, "Fn::And", b)?;
    Ok(JsonValue::Bool(a && b))
}

fn or(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let [a, b] = raw_args::<2>("Fn::Or", arg)?;
    let a = resolve_bool(resolver, "Fn::Or", a)?;
    let b = resolve_bool(resolver, "Fn::Or", b)?;
    Ok(JsonValue::Bool(a || b))
}

fn not(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let [operand] = raw_args::<1>("Fn::Not", arg)?;
    match resolver.config().not_semantics {
        NotSemantics::Passthrough => resolver.resolve(operand),
        NotSemantics::Invert => {
            resolve_bool(resolver, "Fn::Not", operand).map(|b| JsonValue::Bool(!b))
        }
    }
}

fn if_(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let [name, if_true, if_false] = raw_args::<3>("Fn::If", arg)?;
    let name = resolve_string(resolver, "Fn::If", "condition name", name)?;
    let if_true = resolver.resolve(if_true)?;
    let if_false = resolver.resolve(if_false)?;
    Ok(if resolver.condition(&name)? {
        if_true
    } else {
        if_false
    })
}

fn condition(resolver: &Resolver, arg: &JsonValue) -> Result<JsonValue, ResolveError> {
    let name = resolve_string(resolver, "Condition", "condition name", arg)?;
    resolver.condition(&name).map(JsonValue::Bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::context::{DeploymentContext, DeploymentFacts};
    use crate::parameters::ParameterValues;
    use serde_json::json;

    fn template() -> JsonValue {
        json!({
            "Parameters": {
                "Env": {"Type": "String", "Default": "dev"},
                "Subnets": {"Type": "CommaDelimitedList", "Default": "a,b,c"}
            },
            "Mappings": {
                "Sizes": {"dev": {"Memory": 128}, "prod": {"Memory": 1024}}
            },
            "Conditions": {
                "IsProd": {"Fn::Equals": [{"Ref": "Env"}, "prod"]},
                "NotBool": "yes"
            },
            "Resources": {
                "Queue": {"Type": "AWS::SQS::Queue", "Properties": {"QueueName": "jobs"}}
            }
        })
    }

    fn resolver_with(config: ResolverConfig) -> Resolver {
        let context = DeploymentContext::new(DeploymentFacts::new(
            "123456789012",
            "eu-west-1",
            "app",
        ))
        .unwrap();
        Resolver::new(&template(), context, ParameterValues::new(), config)
    }

    fn resolver() -> Resolver {
        resolver_with(ResolverConfig::fixed(NotSemantics::Passthrough, 64))
    }

    fn eval(value: JsonValue) -> Result<JsonValue, ResolveError> {
        resolver().resolve(&value)
    }

    #[test]
    fn test_registry_contents() {
        let registry = FunctionRegistry::global();
        assert!(registry.contains("Ref"));
        assert!(registry.contains("Fn::Sub"));
        assert!(registry.contains("Condition"));
        assert!(!registry.contains("Fn::Length"));
        assert_eq!(registry.names().len(), 16);
        assert_eq!(registry.get("Fn::If").unwrap().signature, "[condition, if_true, if_false]");
    }

    #[test]
    fn test_condition_claims_only_names() {
        let entry = FunctionRegistry::global().get("Condition").unwrap();
        assert!(entry.claims(&json!("IsProd")));
        assert!(entry.claims(&json!({"Fn::Sub": "Is${Env}"})));
        assert!(!entry.claims(&json!({"StringEquals": {"aws:SourceAccount": "1"}})));
        assert!(!entry.claims(&json!(["IsProd"])));
    }

    #[test]
    fn test_policy_condition_block_is_data() {
        let block = json!({"Condition": {"StringEquals": {"aws:SourceAccount": {"Ref": "AWS::AccountId"}}}});
        assert_eq!(
            eval(block).unwrap(),
            json!({"Condition": {"StringEquals": {"aws:SourceAccount": "123456789012"}}})
        );
    }

    #[test]
    fn test_ref_requires_string() {
        assert!(matches!(
            eval(json!({"Ref": ["Env"]})).unwrap_err(),
            ResolveError::InvalidArguments { function: "Ref", .. }
        ));
    }

    #[test]
    fn test_get_att_forms() {
        let expected = json!("arn:aws:sqs:eu-west-1:123456789012:jobs");
        assert_eq!(eval(json!({"Fn::GetAtt": ["Queue", "Arn"]})).unwrap(), expected);
        assert_eq!(eval(json!({"Fn::GetAtt": "Queue.Arn"})).unwrap(), expected);
        assert!(matches!(
            eval(json!({"Fn::GetAtt": ["Queue"]})).unwrap_err(),
            ResolveError::InvalidArguments { .. }
        ));
        assert!(matches!(
            eval(json!({"Fn::GetAtt": ["Queue", "Bogus"]})).unwrap_err(),
            ResolveError::UnknownAttribute { .. }
        ));
        assert_eq!(
            eval(json!({"Fn::GetAtt": ["Ghost", "Arn"]})).unwrap_err(),
            ResolveError::UnknownResource("Ghost".into())
        );
    }

    #[test]
    fn test_find_in_map() {
        assert_eq!(
            eval(json!({"Fn::FindInMap": ["Sizes", {"Ref": "Env"}, "Memory"]})).unwrap(),
            json!(128)
        );
        assert!(matches!(
            eval(json!({"Fn::FindInMap": ["Sizes", "test", "Memory"]})).unwrap_err(),
            ResolveError::MappingLookup { .. }
        ));
        assert!(matches!(
            eval(json!({"Fn::FindInMap": ["Sizes", "dev"]})).unwrap_err(),
            ResolveError::InvalidArguments { .. }
        ));
    }

    #[test]
    fn test_join_forms() {
        assert_eq!(
            eval(json!({"Fn::Join": ["-", ["a", {"Ref": "Env"}, "c"]]})).unwrap(),
            json!("a-dev-c")
        );
        assert_eq!(
            eval(json!({"Fn::Join": ["x", "y", "z"]})).unwrap(),
            json!("xyz")
        );
        // Two items whose second does not resolve to a list: the whole
        // argument is the list, joined with "".
        assert_eq!(eval(json!({"Fn::Join": ["a", "b"]})).unwrap(), json!("ab"));
        assert_eq!(
            eval(json!({"Fn::Join": [",", {"Ref": "AWS::Region"}]})).unwrap(),
            json!(",eu-west-1")
        );
        assert_eq!(
            eval(json!({"Fn::Join": [",", {"Ref": "Subnets"}]})).unwrap(),
            json!("a,b,c")
        );
        assert_eq!(
            eval(json!({"Fn::Join": ["/", ["a", {"Ref": "AWS::NoValue"}, "b"]]})).unwrap(),
            json!("a/b")
        );
        assert!(matches!(
            eval(json!({"Fn::Join": ["-", ["a", 1]]})).unwrap_err(),
            ResolveError::InvalidArguments { function: "Fn::Join", .. }
        ));
    }

    #[test]
    fn test_select() {
        assert_eq!(
            eval(json!({"Fn::Select": ["1", {"Ref": "Subnets"}]})).unwrap(),
            json!("b")
        );
        assert_eq!(
            eval(json!({"Fn::Select": [0, ["x", "y"]]})).unwrap(),
            json!("x")
        );
        assert_eq!(
            eval(json!({"Fn::Select": [5, ["x"]]})).unwrap(),
            JsonValue::Null
        );
        assert!(eval(json!({"Fn::Select": ["one", ["x"]]})).is_err());
        assert!(eval(json!({"Fn::Select": [0, "x"]})).is_err());
    }

    #[test]
    fn test_split() {
        assert_eq!(
            eval(json!({"Fn::Split": ["|", "a|b||c"]})).unwrap(),
            json!(["a", "b", "", "c"])
        );
        assert_eq!(
            eval(json!({"Fn::Split": [".", "a.b"]})).unwrap(),
            json!(["a", "b"])
        );
        assert!(eval(json!({"Fn::Split": [",", 5]})).is_err());
    }

    #[test]
    fn test_sub_lookup_order() {
        assert_eq!(
            eval(json!({"Fn::Sub": "${AWS::Region}/${Env}/${Queue.QueueName}/${!Raw}"})).unwrap(),
            json!("eu-west-1/dev/jobs/${!Raw}")
        );
        assert_eq!(
            eval(json!({"Fn::Sub": ["${Env}-${Extra}", {"Env": "override", "Extra": {"Ref": "AWS::AccountId"}}]}))
                .unwrap(),
            json!("override-123456789012")
        );
        assert_eq!(
            eval(json!({"Fn::Sub": "${Ghost}"})).unwrap_err(),
            ResolveError::UnresolvedReference("Ghost".into())
        );
        assert!(eval(json!({"Fn::Sub": 42})).is_err());
    }

    #[test]
    fn test_base64() {
        assert_eq!(
            eval(json!({"Fn::Base64": {"Fn::Sub": "#!/bin/sh\necho ${Env}"}})).unwrap(),
            json!("IyEvYmluL3NoCmVjaG8gZGV2")
        );
        assert!(eval(json!({"Fn::Base64": ["x"]})).is_err());
    }

    #[test]
    fn test_not_implemented() {
        assert_eq!(
            eval(json!({"Fn::GetAZs": ""})).unwrap_err(),
            ResolveError::NotImplemented("Fn::GetAZs")
        );
        assert_eq!(
            eval(json!({"Fn::ImportValue": "shared-vpc"})).unwrap_err(),
            ResolveError::NotImplemented("Fn::ImportValue")
        );
    }

    #[test]
    fn test_equals() {
        assert_eq!(eval(json!({"Fn::Equals": [{"a": [1]}, {"a": [1]}]})).unwrap(), json!(true));
        assert_eq!(eval(json!({"Fn::Equals": ["1", 1]})).unwrap(), json!(false));
        assert!(eval(json!({"Fn::Equals": ["a"]})).is_err());
    }

    #[test]
    fn test_and_or() {
        assert_eq!(eval(json!({"Fn::And": [true, false]})).unwrap(), json!(false));
        assert_eq!(eval(json!({"Fn::Or": [true, false]})).unwrap(), json!(true));
        assert!(eval(json!({"Fn::And": [true, "true"]})).is_err());
        assert!(eval(json!({"Fn::Or": [true, false, true]})).is_err());
    }

    #[test]
    fn test_not_passthrough_and_invert() {
        assert_eq!(eval(json!({"Fn::Not": [true]})).unwrap(), json!(true));
        assert_eq!(eval(json!({"Fn::Not": ["anything"]})).unwrap(), json!("anything"));
        assert!(eval(json!({"Fn::Not": [true, false]})).is_err());

        let inverting = resolver_with(ResolverConfig::fixed(NotSemantics::Invert, 64));
        assert_eq!(inverting.resolve(&json!({"Fn::Not": [true]})).unwrap(), json!(false));
        assert!(inverting.resolve(&json!({"Fn::Not": ["x"]})).is_err());
    }

    #[test]
    fn test_if_and_condition() {
        assert_eq!(eval(json!({"Fn::If": ["IsProd", "big", "small"]})).unwrap(), json!("small"));
        assert_eq!(eval(json!({"Condition": "IsProd"})).unwrap(), json!(false));
        assert_eq!(
            eval(json!({"Fn::If": ["Missing", "a", "b"]})).unwrap_err(),
            ResolveError::UnknownCondition("Missing".into())
        );
        assert!(matches!(
            eval(json!({"Fn::If": ["NotBool", "a", "b"]})).unwrap_err(),
            ResolveError::ConditionNotBoolean { .. }
        ));
    }
}
