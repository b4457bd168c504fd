//! OpenAI Realtime API WebSocket message types.
//!
//! Only the subset of the protocol the bridge speaks is modelled here. All
//! events are JSON-encoded and sent over WebSocket.
//!
//! # Protocol Overview
//!
//! Client events (sent to server):
//! - session.update - Update session configuration
//! - input_audio_buffer.append - Append audio to buffer
//! - conversation.item.create - Add item to conversation
//! - response.create - Generate a response
//!
//! Server events (received from server):
//! - session.created / session.updated
//! - response.audio.delta - Audio data chunk
//! - response.done - Response complete, carries function call items
//! - error - Error occurred
//!
//! Every other server event type deserializes to [`ServerEvent::Other`], so new
//! event types added by the service never break the relay.

use serde::{Deserialize, Serialize};

use crate::core::tools::ToolDescription;

/// Item type of a function call in a response output list.
pub const FUNCTION_CALL_ITEM_TYPE: &str = "function_call";

/// Item type used to feed a tool result back into the conversation.
pub const FUNCTION_CALL_OUTPUT_ITEM_TYPE: &str = "function_call_output";

/// Status of a function call item whose arguments are complete.
pub const ITEM_STATUS_COMPLETED: &str = "completed";

// =============================================================================
// Session Configuration
// =============================================================================

/// Session configuration sent with `session.update`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_detection: Option<TurnDetection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_audio_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_audio_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    /// System instructions for the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Response modalities (text, audio)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Tool declarations available to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDescription>>,
}

/// Turn detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TurnDetection {
    /// Server-side VAD
    #[serde(rename = "server_vad")]
    ServerVad {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix_padding_ms: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        silence_duration_ms: Option<u32>,
    },
}

impl TurnDetection {
    /// Server VAD with all tuning left to the service.
    pub fn server_vad() -> Self {
        TurnDetection::ServerVad {
            threshold: None,
            prefix_padding_ms: None,
            silence_duration_ms: None,
        }
    }
}

// =============================================================================
// Conversation Items
// =============================================================================

/// Conversation item, used both for outbound `conversation.item.create` and
/// for the `output` list of `response.done`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<ContentPart>>,
    /// Call ID for function call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    /// Function name for function call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// JSON-encoded function arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    /// Function output for function call result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl ConversationItem {
    /// True for a `function_call` item whose status is `completed`.
    pub fn is_completed_function_call(&self) -> bool {
        self.item_type == FUNCTION_CALL_ITEM_TYPE
            && self.status.as_deref() == Some(ITEM_STATUS_COMPLETED)
    }
}

/// Content part within a conversation item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

// =============================================================================
// Response Configuration
// =============================================================================

/// Response configuration for `response.create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

// =============================================================================
// Client Events (sent to server)
// =============================================================================

/// Client events sent to the OpenAI Realtime API.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "session.update")]
    SessionUpdate { session: SessionConfig },

    /// Append audio to input buffer
    #[serde(rename = "input_audio_buffer.append")]
    InputAudioBufferAppend {
        /// Base64-encoded audio data
        audio: String,
    },

    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate {
        /// Previous item ID to insert after
        #[serde(skip_serializing_if = "Option::is_none")]
        previous_item_id: Option<String>,
        item: ConversationItem,
    },

    #[serde(rename = "response.create")]
    ResponseCreate {
        #[serde(skip_serializing_if = "Option::is_none")]
        response: Option<ResponseConfig>,
    },
}

impl ClientEvent {
    /// Forward an already base64-encoded audio payload without touching it.
    pub fn audio_append(payload: impl Into<String>) -> Self {
        ClientEvent::InputAudioBufferAppend {
            audio: payload.into(),
        }
    }

    /// Request a response steered by a one-off instruction.
    pub fn response_with_instructions(instructions: impl Into<String>) -> Self {
        ClientEvent::ResponseCreate {
            response: Some(ResponseConfig {
                instructions: Some(instructions.into()),
            }),
        }
    }

    /// Insert a function call result directly after the call that produced it.
    pub fn function_call_output(
        previous_item_id: String,
        output_item_id: String,
        call_id: String,
        output: String,
    ) -> Self {
        ClientEvent::ConversationItemCreate {
            previous_item_id: Some(previous_item_id),
            item: ConversationItem {
                id: Some(output_item_id),
                item_type: FUNCTION_CALL_OUTPUT_ITEM_TYPE.to_string(),
                call_id: Some(call_id),
                output: Some(output),
                ..Default::default()
            },
        }
    }

    /// The `type` tag this event serializes with.
    pub fn event_type(&self) -> &'static str {
        match self {
            ClientEvent::SessionUpdate { .. } => "session.update",
            ClientEvent::InputAudioBufferAppend { .. } => "input_audio_buffer.append",
            ClientEvent::ConversationItemCreate { .. } => "conversation.item.create",
            ClientEvent::ResponseCreate { .. } => "response.create",
        }
    }
}

// =============================================================================
// Server Events (received from server)
// =============================================================================

/// Server events received from the OpenAI Realtime API.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "error")]
    Error { error: ApiError },

    #[serde(rename = "session.created")]
    SessionCreated {
        #[serde(default)]
        session: SessionInfo,
    },

    #[serde(rename = "session.updated")]
    SessionUpdated {
        #[serde(default)]
        session: SessionInfo,
    },

    /// Audio delta (audio data chunk)
    #[serde(rename = "response.audio.delta")]
    AudioDelta {
        #[serde(default)]
        response_id: Option<String>,
        #[serde(default)]
        item_id: Option<String>,
        /// Base64-encoded audio delta
        #[serde(default)]
        delta: Option<String>,
    },

    #[serde(rename = "response.done")]
    ResponseDone { response: ResponseInfo },

    /// Any event type the bridge does not act on
    #[serde(other)]
    Other,
}

/// A server frame with its raw `type` tag kept for logging.
#[derive(Debug, Clone)]
pub struct ServerFrame {
    pub event_type: String,
    pub event: ServerEvent,
    pub raw: serde_json::Value,
}

impl ServerFrame {
    /// Parse a text frame from the service.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let raw: serde_json::Value = serde_json::from_str(text)?;
        let event_type = raw
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        let event = ServerEvent::deserialize(&raw)?;
        Ok(Self {
            event_type,
            event,
            raw,
        })
    }
}

// =============================================================================
// Supporting Types
// =============================================================================

/// API error information.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub event_id: Option<String>,
}

/// Session information echoed by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
}

/// Response information carried by `response.done`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Output items, left untyped so one malformed item cannot sink the
    /// whole frame
    #[serde(default)]
    pub output: Vec<serde_json::Value>,
}

impl ResponseInfo {
    /// Decode the output items one by one.
    pub fn items(self) -> impl Iterator<Item = Result<ConversationItem, serde_json::Error>> {
        self.output.into_iter().map(serde_json::from_value)
    }
}
