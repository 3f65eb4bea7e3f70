//! Return-value provider
//!
//! Synthesizes what a deployment would hand back for a created resource: the
//! value of `Ref` and the attributes reachable through `Fn::GetAtt`. Kinds form
//! a closed enum; each variant maps to one pure synthesis function, so an
//! unknown `Type` string is the only way to reach the unsupported-kind error.
//!
//! Generated identifiers come from `DeploymentContext::physical_id`, which is
//! stable for a given resource name within one context.

use serde_json::{Map, Value as JsonValue};

use crate::context::DeploymentContext;

/// Values a created resource exposes
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnValues {
    /// Result of `Ref`
    pub reference: JsonValue,
    /// Results of `Fn::GetAtt`, by attribute name
    pub attributes: Map<String, JsonValue>,
}

impl ReturnValues {
    fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: JsonValue::String(reference.into()),
            attributes: Map::new(),
        }
    }

    fn with(mut self, attribute: &str, value: impl Into<String>) -> Self {
        self.attributes
            .insert(attribute.to_string(), JsonValue::String(value.into()));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&JsonValue> {
        self.attributes.get(name)
    }
}

type ProviderFn = fn(&str, &DeploymentContext) -> ReturnValues;

/// Resource kinds the provider can synthesize values for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    SqsQueue,
    SqsQueuePolicy,
    SnsTopic,
    SnsSubscription,
    S3Bucket,
    LambdaFunction,
    IamRole,
    IamManagedPolicy,
    DynamoDbTable,
    KinesisStream,
    LogGroup,
    EventsRule,
    StateMachine,
    SecurityGroup,
    RestApi,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 15] = [
        Self::SqsQueue,
        Self::SqsQueuePolicy,
        Self::SnsTopic,
        Self::SnsSubscription,
        Self::S3Bucket,
        Self::LambdaFunction,
        Self::IamRole,
        Self::IamManagedPolicy,
        Self::DynamoDbTable,
        Self::KinesisStream,
        Self::LogGroup,
        Self::EventsRule,
        Self::StateMachine,
        Self::SecurityGroup,
        Self::RestApi,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::SqsQueue => "AWS::SQS::Queue",
            Self::SqsQueuePolicy => "AWS::SQS::QueuePolicy",
            Self::SnsTopic => "AWS::SNS::Topic",
            Self::SnsSubscription => "AWS::SNS::Subscription",
            Self::S3Bucket => "AWS::S3::Bucket",
            Self::LambdaFunction => "AWS::Lambda::Function",
            Self::IamRole => "AWS::IAM::Role",
            Self::IamManagedPolicy => "AWS::IAM::ManagedPolicy",
            Self::DynamoDbTable => "AWS::DynamoDB::Table",
            Self::KinesisStream => "AWS::Kinesis::Stream",
            Self::LogGroup => "AWS::Logs::LogGroup",
            Self::EventsRule => "AWS::Events::Rule",
            Self::StateMachine => "AWS::StepFunctions::StateMachine",
            Self::SecurityGroup => "AWS::EC2::SecurityGroup",
            Self::RestApi => "AWS::ApiGateway::RestApi",
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == type_name)
    }

    /// Properties that carry an explicit resource name, in lookup order.
    pub fn name_properties(self) -> &'static [&'static str] {
        match self {
            Self::SqsQueue => &["QueueName", "Name"],
            Self::SnsTopic => &["TopicName", "Name"],
            Self::S3Bucket => &["BucketName", "Name"],
            Self::LambdaFunction => &["FunctionName", "Name"],
            Self::IamRole => &["RoleName", "Name"],
            Self::IamManagedPolicy => &["ManagedPolicyName", "Name"],
            Self::DynamoDbTable => &["TableName", "Name"],
            Self::LogGroup => &["LogGroupName", "Name"],
            Self::StateMachine => &["StateMachineName", "Name"],
            Self::SecurityGroup => &["GroupName", "Name"],
            Self::SqsQueuePolicy
            | Self::SnsSubscription
            | Self::KinesisStream
            | Self::EventsRule
            | Self::RestApi => &["Name"],
        }
    }

    fn provider(self) -> ProviderFn {
        match self {
            Self::SqsQueue => sqs_queue,
            Self::SqsQueuePolicy => sqs_queue_policy,
            Self::SnsTopic => sns_topic,
            Self::SnsSubscription => sns_subscription,
            Self::S3Bucket => s3_bucket,
            Self::LambdaFunction => lambda_function,
            Self::IamRole => iam_role,
            Self::IamManagedPolicy => iam_managed_policy,
            Self::DynamoDbTable => dynamodb_table,
            Self::KinesisStream => kinesis_stream,
            Self::LogGroup => log_group,
            Self::EventsRule => events_rule,
            Self::StateMachine => state_machine,
            Self::SecurityGroup => security_group,
            Self::RestApi => rest_api,
        }
    }

    /// Synthesize the values for a resource with the given display name.
    pub fn return_values(self, display_name: &str, ctx: &DeploymentContext) -> ReturnValues {
        (self.provider())(display_name, ctx)
    }
}

fn arn(ctx: &DeploymentContext, service: &str, resource: &str) -> String {
    format!(
        "arn:{}:{}:{}:{}:{}",
        ctx.partition(),
        service,
        ctx.region(),
        ctx.account_id(),
        resource
    )
}

/// Global services leave the region out of the ARN.
fn global_arn(ctx: &DeploymentContext, service: &str, resource: &str) -> String {
    format!(
        "arn:{}:{}::{}:{}",
        ctx.partition(),
        service,
        ctx.account_id(),
        resource
    )
}

fn generated_id(ctx: &DeploymentContext, seed: &str, len: usize) -> String {
    let mut id = ctx.physical_id(seed).simple().to_string();
    id.truncate(len);
    id
}

fn sqs_queue(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    let url = format!(
        "https://sqs.{}.{}/{}/{}",
        ctx.region(),
        ctx.url_suffix(),
        ctx.account_id(),
        name
    );
    ReturnValues::new(url.clone())
        .with("Arn", arn(ctx, "sqs", name))
        .with("QueueName", name)
        .with("QueueUrl", url)
}

fn sqs_queue_policy(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    ReturnValues::new(ctx.physical_id(name).to_string())
}

fn sns_topic(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    let topic_arn = arn(ctx, "sns", name);
    ReturnValues::new(topic_arn.clone())
        .with("TopicArn", topic_arn)
        .with("TopicName", name)
}

fn sns_subscription(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    ReturnValues::new(format!(
        "{}:{}",
        arn(ctx, "sns", name),
        ctx.physical_id(name)
    ))
}

fn s3_bucket(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    let region = ctx.region();
    let suffix = ctx.url_suffix();
    ReturnValues::new(name)
        .with("Arn", format!("arn:{}:s3:::{}", ctx.partition(), name))
        .with("DomainName", format!("{}.s3.{}", name, suffix))
        .with(
            "DualStackDomainName",
            format!("{}.s3.dualstack.{}.{}", name, region, suffix),
        )
        .with(
            "RegionalDomainName",
            format!("{}.s3.{}.{}", name, region, suffix),
        )
        .with(
            "WebsiteURL",
            format!("http://{}.s3-website-{}.{}", name, region, suffix),
        )
}

fn lambda_function(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    ReturnValues::new(name).with("Arn", arn(ctx, "lambda", &format!("function:{}", name)))
}

fn iam_role(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    ReturnValues::new(name)
        .with("Arn", global_arn(ctx, "iam", &format!("role/{}", name)))
        .with(
            "RoleId",
            format!("AROA{}", generated_id(ctx, name, 17).to_uppercase()),
        )
}

fn iam_managed_policy(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    let policy_arn = global_arn(ctx, "iam", &format!("policy/{}", name));
    ReturnValues::new(policy_arn.clone()).with("PolicyArn", policy_arn)
}

fn dynamodb_table(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    let table_arn = arn(ctx, "dynamodb", &format!("table/{}", name));
    let stream_label = ctx.created_at().format("%Y-%m-%dT%H:%M:%S%.3f");
    ReturnValues::new(name)
        .with("Arn", table_arn.clone())
        .with("StreamArn", format!("{}/stream/{}", table_arn, stream_label))
}

fn kinesis_stream(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    ReturnValues::new(name).with("Arn", arn(ctx, "kinesis", &format!("stream/{}", name)))
}

fn log_group(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    ReturnValues::new(name).with("Arn", arn(ctx, "logs", &format!("log-group:{}:*", name)))
}

fn events_rule(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    ReturnValues::new(name).with("Arn", arn(ctx, "events", &format!("rule/{}", name)))
}

fn state_machine(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    let machine_arn = arn(ctx, "states", &format!("stateMachine:{}", name));
    ReturnValues::new(machine_arn.clone())
        .with("Arn", machine_arn)
        .with("Name", name)
}

fn security_group(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    let group_id = format!("sg-{}", generated_id(ctx, name, 17));
    ReturnValues::new(group_id.clone()).with("GroupId", group_id)
}

fn rest_api(name: &str, ctx: &DeploymentContext) -> ReturnValues {
    ReturnValues::new(generated_id(ctx, name, 10)).with(
        "RootResourceId",
        generated_id(ctx, &format!("{}/", name), 10),
    )
}
