//! Resolver configuration
//!
//! Defaults come from the environment so a test harness can flip behavior
//! without touching code:
//!
//! - `TEMPLATE_DEREF_NOT_SEMANTICS` - `passthrough` (default) or `invert`
//! - `TEMPLATE_DEREF_MAX_DEPTH` - recursion limit (default 128)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default recursion limit for nested function calls.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How `Fn::Not` treats its operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotSemantics {
    /// Return the resolved operand unchanged. This is the compatible behavior.
    #[default]
    Passthrough,
    /// Boolean inversion. The operand must resolve to a boolean.
    Invert,
}

impl FromStr for NotSemantics {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" => Ok(Self::Passthrough),
            "invert" => Ok(Self::Invert),
            other => Err(format!("unknown Fn::Not semantics '{}'", other)),
        }
    }
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub not_semantics: NotSemantics,
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            not_semantics: std::env::var("TEMPLATE_DEREF_NOT_SEMANTICS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            max_depth: std::env::var("TEMPLATE_DEREF_MAX_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ResolverConfig {
    /// Configuration that ignores the environment.
    pub fn fixed(not_semantics: NotSemantics, max_depth: usize) -> Self {
        Self {
            not_semantics,
            max_depth,
        }
    }

    pub fn with_not_semantics(mut self, not_semantics: NotSemantics) -> Self {
        self.not_semantics = not_semantics;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
