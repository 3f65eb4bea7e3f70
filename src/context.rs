//! Deployment context
//!
//! Stand-in values for everything a real deployment would know about its
//! environment: the account, the region, the stack and the notification
//! endpoints. The context is frozen at construction; every identifier it
//! fabricates is derived from a single correlation token so lookups repeated
//! within one run agree with each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::ContextError;

/// Caller-supplied deployment facts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentFacts {
    pub account_id: String,
    pub region: String,
    pub stack_name: String,
    #[serde(default)]
    pub notification_arns: Vec<String>,
}

impl DeploymentFacts {
    pub fn new(
        account_id: impl Into<String>,
        region: impl Into<String>,
        stack_name: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            stack_name: stack_name.into(),
            notification_arns: Vec::new(),
        }
    }

    pub fn with_notification_arns(mut self, arns: Vec<String>) -> Self {
        self.notification_arns = arns;
        self
    }

    /// Read facts from `TEMPLATE_DEREF_*` environment variables.
    ///
    /// Missing variables become empty strings; `DeploymentContext::new`
    /// rejects them.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self {
            account_id: var("TEMPLATE_DEREF_ACCOUNT_ID"),
            region: var("TEMPLATE_DEREF_REGION"),
            stack_name: var("TEMPLATE_DEREF_STACK_NAME"),
            notification_arns: var("TEMPLATE_DEREF_NOTIFICATION_ARNS")
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

/// Built-in names resolved from the deployment context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoParameter {
    AccountId,
    Region,
    StackName,
    StackId,
    NotificationArns,
    NoValue,
    Partition,
    UrlSuffix,
}

impl PseudoParameter {
    pub const ALL: [PseudoParameter; 8] = [
        Self::AccountId,
        Self::Region,
        Self::StackName,
        Self::StackId,
        Self::NotificationArns,
        Self::NoValue,
        Self::Partition,
        Self::UrlSuffix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AccountId => "AWS::AccountId",
            Self::Region => "AWS::Region",
            Self::StackName => "AWS::StackName",
            Self::StackId => "AWS::StackId",
            Self::NotificationArns => "AWS::NotificationARNs",
            Self::NoValue => "AWS::NoValue",
            Self::Partition => "AWS::Partition",
            Self::UrlSuffix => "AWS::URLSuffix",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Frozen deployment environment for a single resolution run
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    facts: DeploymentFacts,
    correlation_token: Uuid,
    created_at: DateTime<Utc>,
}

impl DeploymentContext {
    /// Validate the facts and fabricate a fresh correlation token.
    pub fn new(facts: DeploymentFacts) -> Result<Self, ContextError> {
        Self::with_correlation_token(facts, Uuid::new_v4())
    }

    /// Same as `new` with a caller-chosen token, for reproducible output.
    pub fn with_correlation_token(
        facts: DeploymentFacts,
        correlation_token: Uuid,
    ) -> Result<Self, ContextError> {
        for (field, value) in [
            ("account_id", &facts.account_id),
            ("region", &facts.region),
            ("stack_name", &facts.stack_name),
        ] {
            if value.trim().is_empty() {
                return Err(ContextError::MissingField { field });
            }
        }

        Ok(Self {
            facts,
            correlation_token,
            created_at: Utc::now(),
        })
    }

    pub fn account_id(&self) -> &str {
        &self.facts.account_id
    }

    pub fn region(&self) -> &str {
        &self.facts.region
    }

    pub fn stack_name(&self) -> &str {
        &self.facts.stack_name
    }

    pub fn notification_arns(&self) -> &[String] {
        &self.facts.notification_arns
    }

    pub fn correlation_token(&self) -> Uuid {
        self.correlation_token
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn partition(&self) -> &'static str {
        let region = self.region();
        if region.starts_with("cn-") {
            "aws-cn"
        } else if region.starts_with("us-gov-") {
            "aws-us-gov"
        } else {
            "aws"
        }
    }

    pub fn url_suffix(&self) -> &'static str {
        if self.region().starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        }
    }

    pub fn stack_id(&self) -> String {
        format!(
            "arn:{}:cloudformation:{}:{}:stack/{}/{}",
            self.partition(),
            self.region(),
            self.account_id(),
            self.stack_name(),
            self.correlation_token
        )
    }

    /// Stable per-run identifier for a named thing.
    pub fn physical_id(&self, name: &str) -> Uuid {
        Uuid::new_v5(&self.correlation_token, name.as_bytes())
    }

    /// Value of a pseudo parameter. `AWS::NoValue` is JSON `null`.
    pub fn pseudo_value(&self, pseudo: PseudoParameter) -> JsonValue {
        match pseudo {
            PseudoParameter::AccountId => JsonValue::String(self.account_id().to_string()),
            PseudoParameter::Region => JsonValue::String(self.region().to_string()),
            PseudoParameter::StackName => JsonValue::String(self.stack_name().to_string()),
            PseudoParameter::StackId => JsonValue::String(self.stack_id()),
            PseudoParameter::NotificationArns => JsonValue::Array(
                self.notification_arns()
                    .iter()
                    .cloned()
                    .map(JsonValue::String)
                    .collect(),
            ),
            PseudoParameter::NoValue => JsonValue::Null,
            PseudoParameter::Partition => JsonValue::String(self.partition().to_string()),
            PseudoParameter::UrlSuffix => JsonValue::String(self.url_suffix().to_string()),
        }
    }
}
