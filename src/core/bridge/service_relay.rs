//! Realtime service -> telephony client relay.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use base64::prelude::*;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use super::channels::ClientRoute;
use super::dispatcher::{DispatchOutcome, ToolDispatcher};
use super::error::{BridgeError, BridgeResult};
use super::session::CallSession;
use crate::core::realtime::openai::{ConversationItem, ServerEvent, ServerFrame};
use crate::core::telephony::TelephonyOutgoingMessage;

/// Everything the service relay needs besides the stream it consumes.
pub struct ServiceRelay {
    session: Arc<CallSession>,
    client: mpsc::Sender<ClientRoute>,
    dispatcher: Arc<ToolDispatcher>,
    log_event_types: HashSet<String>,
    dispatches: JoinSet<()>,
}

impl ServiceRelay {
    pub fn new(
        session: Arc<CallSession>,
        client: mpsc::Sender<ClientRoute>,
        dispatcher: Arc<ToolDispatcher>,
        log_event_types: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            session,
            client,
            dispatcher,
            log_event_types: log_event_types.into_iter().collect(),
            dispatches: JoinSet::new(),
        }
    }

    /// Consume upstream events until the service closes the connection or
    /// sends something unparseable.
    ///
    /// In-flight tool dispatches are awaited before returning, then the client
    /// writer is told to close the caller's socket.
    pub async fn run<St, E>(mut self, mut stream: St) -> BridgeResult<()>
    where
        St: Stream<Item = Result<Message, E>> + Unpin,
        E: Display,
    {
        let result = loop {
            let Some(msg_result) = stream.next().await else {
                info!(session_id = %self.session.id(), "Realtime service stream ended");
                break Ok(());
            };

            match msg_result {
                Ok(Message::Text(text)) => {
                    if let Err(e) = self.handle_text(text.as_str()).await {
                        error!(session_id = %self.session.id(), "Service relay failed: {}", e);
                        break Err(e);
                    }
                }
                Ok(Message::Close(frame)) => {
                    info!(
                        session_id = %self.session.id(),
                        reason = ?frame.as_ref().map(|f| f.reason.as_str()),
                        "Realtime service closed the connection"
                    );
                    break Ok(());
                }
                Ok(_) => {}
                Err(e) => {
                    error!(session_id = %self.session.id(), "Realtime WebSocket error: {}", e);
                    break Err(BridgeError::WebSocket(e.to_string()));
                }
            }

            self.reap_finished_dispatches();
        };

        while let Some(joined) = self.dispatches.join_next().await {
            if let Err(e) = joined {
                error!(session_id = %self.session.id(), "Tool dispatch task failed: {}", e);
            }
        }

        // Ignored: the client writer may already have exited
        let _ = self.client.send(ClientRoute::Close).await;
        info!(session_id = %self.session.id(), "Service relay finished");
        result
    }

    async fn handle_text(&mut self, text: &str) -> BridgeResult<()> {
        let frame = ServerFrame::parse(text)
            .map_err(|e| BridgeError::Protocol(format!("invalid service event: {e}")))?;

        if self.log_event_types.contains(&frame.event_type) {
            info!(
                session_id = %self.session.id(),
                event_type = %frame.event_type,
                event = %frame.raw,
                "Received event"
            );
        }

        match frame.event {
            ServerEvent::SessionUpdated { session } => {
                info!(
                    session_id = %self.session.id(),
                    realtime_session = ?session.id,
                    "Session updated successfully"
                );
            }
            ServerEvent::AudioDelta {
                delta: Some(delta), ..
            } => {
                self.forward_audio(&delta).await;
            }
            ServerEvent::ResponseDone { response } => {
                for (index, item) in response.items().enumerate() {
                    match item {
                        Ok(item) if item.is_completed_function_call() => self.spawn_dispatch(item),
                        Ok(_) => {}
                        Err(e) => {
                            warn!(
                                session_id = %self.session.id(),
                                index,
                                "Skipping malformed response output item: {}",
                                e
                            );
                        }
                    }
                }
            }
            ServerEvent::Error { error } => {
                error!(
                    session_id = %self.session.id(),
                    error_type = ?error.error_type,
                    code = ?error.code,
                    "Realtime service error: {}",
                    error.message
                );
            }
            _ => {}
        }
        Ok(())
    }

    /// Re-encode one audio delta for the client. Failures only drop this chunk.
    async fn forward_audio(&self, delta: &str) {
        let audio = match BASE64_STANDARD.decode(delta) {
            Ok(audio) => audio,
            Err(e) => {
                warn!(session_id = %self.session.id(), "Failed to decode audio delta: {}", e);
                return;
            }
        };

        let stream_sid = self.session.stream_id().map(|sid| sid.as_ref().clone());
        let message = TelephonyOutgoingMessage::media(stream_sid, BASE64_STANDARD.encode(audio));

        if self.client.send(ClientRoute::Media(message)).await.is_err() {
            warn!(session_id = %self.session.id(), "Client writer gone, dropping audio delta");
        }
    }

    fn spawn_dispatch(&mut self, item: ConversationItem) {
        let dispatcher = self.dispatcher.clone();
        let session_id = self.session.id().to_string();
        let tool = item.name.clone().unwrap_or_default();
        let call_id = item.call_id.clone().unwrap_or_default();

        self.dispatches.spawn(async move {
            match dispatcher.dispatch(item).await {
                Ok(DispatchOutcome::Replied) | Ok(DispatchOutcome::NoReply) => {}
                Ok(DispatchOutcome::UnknownTool) => {
                    debug!(%session_id, %tool, %call_id, "Function call ignored");
                }
                Err(e) => {
                    error!(%session_id, %tool, %call_id, "Function call failed: {}", e);
                }
            }
        });
    }

    fn reap_finished_dispatches(&mut self) {
        while let Some(joined) = self.dispatches.try_join_next() {
            if let Err(e) = joined {
                error!(session_id = %self.session.id(), "Tool dispatch task failed: {}", e);
            }
        }
    }
}
