//! Input schemas and request validation for the tools
//!
//! The `template` enumeration is read from the template registry each time
//! a schema is built, so schemas and registry cannot drift apart.

use rmcp::model::{JsonObject, Tool};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use super::ToolError;
use crate::config::templates;

fn template_property() -> Value {
    json!({
        "type": "string",
        "enum": templates::template_names(),
    })
}

fn object_schema(properties: Value) -> Arc<JsonObject> {
    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), properties);
    schema.insert(
        "required".to_string(),
        json!(["name", "namespace", "template"]),
    );
    Arc::new(schema)
}

pub fn create_deployment_tool() -> Tool {
    Tool::new(
        super::create_deployment::NAME,
        "Create a new Kubernetes deployment",
        object_schema(json!({
            "name": { "type": "string" },
            "namespace": { "type": "string" },
            "template": template_property(),
            "replicas": { "type": "number", "default": 1 },
        })),
    )
}

pub fn create_pod_tool() -> Tool {
    Tool::new(
        super::create_pod::NAME,
        "Create a new Kubernetes pod",
        object_schema(json!({
            "name": { "type": "string" },
            "namespace": { "type": "string" },
            "template": template_property(),
            "command": {
                "type": "array",
                "items": { "type": "string" },
            },
        })),
    )
}

/// Accept any JSON number holding a whole value in `0..=i32::MAX`.
/// Clients frequently send integers as floats (`3.0`).
fn deserialize_replicas<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if value.fract() != 0.0 || value < 0.0 {
        return Err(de::Error::custom(format!(
            "replicas must be a non-negative whole number, got {}",
            value
        )));
    }
    if value > f64::from(i32::MAX) {
        return Err(de::Error::custom(format!(
            "replicas must be at most {}, got {}",
            i32::MAX,
            value
        )));
    }
    Ok(Some(value as i32))
}

/// Arguments of `create_deployment`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeploymentRequest {
    pub name: String,
    pub namespace: String,
    pub template: String,
    #[serde(
        default,
        deserialize_with = "deserialize_replicas",
        skip_serializing_if = "Option::is_none"
    )]
    pub replicas: Option<i32>,
}

/// Arguments of `create_pod`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PodRequest {
    pub name: String,
    pub namespace: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

/// Checks that go beyond what deserialization enforces
pub trait Validate {
    fn validate(&self) -> Result<(), ToolError>;
}

impl Validate for DeploymentRequest {
    fn validate(&self) -> Result<(), ToolError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("namespace", &self.namespace)?;
        require_known_template(&self.template)?;
        if let Some(replicas) = self.replicas
            && replicas < 0
        {
            return Err(ToolError::InvalidRequest(format!(
                "replicas must not be negative, got {}",
                replicas
            )));
        }
        Ok(())
    }
}

impl Validate for PodRequest {
    fn validate(&self) -> Result<(), ToolError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("namespace", &self.namespace)?;
        require_known_template(&self.template)
    }
}

/// Deserialize raw tool arguments and validate them
pub fn parse_arguments<T>(tool: &str, arguments: Value) -> Result<T, ToolError>
where
    T: DeserializeOwned + Validate,
{
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    let request: T = serde_json::from_value(arguments).map_err(|err| {
        ToolError::InvalidRequest(format!("Invalid arguments for {}: {}", tool, err))
    })?;
    request.validate()?;
    Ok(request)
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidRequest(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

fn require_known_template(name: &str) -> Result<(), ToolError> {
    if templates::resolve(name).is_none() {
        return Err(ToolError::invalid_template(name));
    }
    Ok(())
}
