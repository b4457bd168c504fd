use thiserror::Error;

use crate::core::tools::ToolError;

/// Errors raised inside a call session.
///
/// Protocol and transport errors end the relay that hit them; tool errors are
/// confined to a single function call.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Upstream connection could not be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// WebSocket transport failed mid-session
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// A frame could not be parsed into a known event
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Serialization of an outbound event failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The writer task for the other side has gone away
    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),

    /// A function call item lacked a required field
    #[error("Invalid function call: {0}")]
    InvalidFunctionCall(String),

    #[error("Tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },
}

pub type BridgeResult<T> = Result<T, BridgeError>;
