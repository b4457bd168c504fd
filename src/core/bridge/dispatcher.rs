//! Routes completed function calls to tools and feeds results back upstream.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::channels::UpstreamRoute;
use super::error::{BridgeError, BridgeResult};
use crate::core::realtime::openai::{ClientEvent, ConversationItem};
use crate::core::tools::ToolRegistry;

/// Instruction for the follow-up response after a tool result is inserted.
pub const TOOL_RESULT_INSTRUCTIONS: &str = "Teile dem Nutzer das Ergebnis der Terminbuchung mit.";

/// Suffix appended to a function call item id to form its output item id.
pub const FUNCTION_CALL_OUTPUT_ID_SUFFIX: &str = "_fcr";

/// What happened to a single function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Result was inserted and a follow-up response requested
    Replied,
    /// Tool ran but had nothing to say
    NoReply,
    /// No tool is registered under that name
    UnknownTool,
}

/// Dispatches function call items for one session.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    upstream: mpsc::Sender<UpstreamRoute>,
    session_id: String,
}

impl ToolDispatcher {
    pub fn new(
        registry: Arc<ToolRegistry>,
        upstream: mpsc::Sender<UpstreamRoute>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            upstream,
            session_id: session_id.into(),
        }
    }

    /// Run the tool named by `item` and, if it produced text, hand the result
    /// back to the model and ask it to respond.
    ///
    /// Nothing is sent upstream when the tool fails.
    pub async fn dispatch(&self, item: ConversationItem) -> BridgeResult<DispatchOutcome> {
        let (item_id, call_id, name, arguments) = match (
            item.id,
            item.call_id,
            item.name,
            item.arguments,
        ) {
            (Some(id), Some(call_id), Some(name), Some(arguments)) => {
                (id, call_id, name, arguments)
            }
            _ => {
                return Err(BridgeError::InvalidFunctionCall(
                    "function call item is missing id, call_id, name or arguments".to_string(),
                ));
            }
        };

        let args: serde_json::Value = serde_json::from_str(&arguments).map_err(|e| {
            BridgeError::InvalidFunctionCall(format!("arguments of '{name}' are not JSON: {e}"))
        })?;

        let Some(tool) = self.registry.get(&name) else {
            debug!(
                session_id = %self.session_id,
                tool = %name,
                call_id = %call_id,
                "No tool registered for function call"
            );
            return Ok(DispatchOutcome::UnknownTool);
        };

        info!(
            session_id = %self.session_id,
            tool = %name,
            call_id = %call_id,
            "Invoking tool"
        );

        let output = tool
            .invoke(args)
            .await
            .map_err(|source| BridgeError::Tool {
                tool: name.clone(),
                source,
            })?;

        let Some(output) = output else {
            return Ok(DispatchOutcome::NoReply);
        };

        let output_item_id = format!("{item_id}{FUNCTION_CALL_OUTPUT_ID_SUFFIX}");
        self.send(ClientEvent::function_call_output(
            item_id,
            output_item_id,
            call_id.clone(),
            output,
        ))
        .await?;
        self.send(ClientEvent::response_with_instructions(
            TOOL_RESULT_INSTRUCTIONS,
        ))
        .await?;

        info!(
            session_id = %self.session_id,
            tool = %name,
            call_id = %call_id,
            "Tool result sent"
        );
        Ok(DispatchOutcome::Replied)
    }

    async fn send(&self, event: ClientEvent) -> BridgeResult<()> {
        self.upstream
            .send(UpstreamRoute::Event(event))
            .await
            .map_err(|_| BridgeError::ChannelClosed("upstream writer"))
    }
}
