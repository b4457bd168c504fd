//! Tool contract shared by every capability the assistant can call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while invoking a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments did not match the declared parameters
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// HTTP request to an external service failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// External service answered with something unusable
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The booking matcher could not identify a booking
    #[error("No matching booking: {0}")]
    NoMatch(String),

    /// Tool is missing configuration it needs
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::InvalidArguments(e.to_string())
    }
}

/// Result type for tool invocations.
pub type ToolResult<T> = Result<T, ToolError>;

/// JSON-schema declaration of a tool, sent to the model with `session.update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescription {
    /// Always `function`
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: serde_json::Value,
}

impl ToolDescription {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A capability the model can call through a function call item.
///
/// `invoke` returns `Some(text)` when the result should be fed back to the
/// model as a conversation item, `None` when nothing needs to be said.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &'static str;

    fn description(&self) -> ToolDescription;

    async fn invoke(&self, args: serde_json::Value) -> ToolResult<Option<String>>;
}

/// Deserialize tool arguments into their typed form.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(
    args: serde_json::Value,
) -> ToolResult<T> {
    serde_json::from_value(args).map_err(ToolError::from)
}
