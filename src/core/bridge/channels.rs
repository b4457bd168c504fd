//! Writer tasks and the routes that feed them.
//!
//! Each socket's sink is owned by exactly one writer task. Relays and tool
//! dispatches never touch a sink directly; they push routes into a bounded
//! channel and the writer serializes and sends them in order.

use std::fmt::Display;

use axum::extract::ws::Message as ClientMessage;
use futures::{Sink, SinkExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use tracing::{debug, error, info};

use super::error::BridgeResult;
use crate::core::realtime::ClientEvent;
use crate::core::telephony::TelephonyOutgoingMessage;

/// Capacity of each route channel. Audio chunks are small, so this holds a few
/// seconds of audio before backpressure reaches the relay.
pub const ROUTE_CHANNEL_CAPACITY: usize = 1024;

/// Messages for the upstream (realtime service) writer.
#[derive(Debug, Clone)]
pub enum UpstreamRoute {
    Event(ClientEvent),
    Close,
}

/// Messages for the client (telephony) writer.
#[derive(Debug, Clone)]
pub enum ClientRoute {
    Media(TelephonyOutgoingMessage),
    Close,
}

/// A route that a writer turns into a WebSocket frame.
pub trait OutboundRoute: Send {
    type Frame: Send;

    /// `Ok(None)` asks the writer to close its socket.
    fn into_frame(self) -> BridgeResult<Option<Self::Frame>>;
}

impl OutboundRoute for UpstreamRoute {
    type Frame = UpstreamMessage;

    fn into_frame(self) -> BridgeResult<Option<Self::Frame>> {
        match self {
            UpstreamRoute::Event(event) => {
                let json = serde_json::to_string(&event)?;
                Ok(Some(UpstreamMessage::Text(json.into())))
            }
            UpstreamRoute::Close => Ok(None),
        }
    }
}

impl OutboundRoute for ClientRoute {
    type Frame = ClientMessage;

    fn into_frame(self) -> BridgeResult<Option<Self::Frame>> {
        match self {
            ClientRoute::Media(message) => {
                let json = serde_json::to_string(&message)?;
                Ok(Some(ClientMessage::Text(json.into())))
            }
            ClientRoute::Close => Ok(None),
        }
    }
}

/// Drain `rx` into `sink` until a close route arrives, every sender is
/// dropped, or a send fails. The sink is closed on every exit path.
pub async fn run_writer<S, R>(mut sink: S, mut rx: mpsc::Receiver<R>, peer: &'static str)
where
    R: OutboundRoute,
    S: Sink<R::Frame> + Unpin,
    S::Error: Display,
{
    while let Some(route) = rx.recv().await {
        let frame = match route.into_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!(peer, "Closing WebSocket connection");
                break;
            }
            Err(e) => {
                error!(peer, "Failed to serialize outgoing message: {}", e);
                continue;
            }
        };

        if let Err(e) = sink.send(frame).await {
            error!(peer, "Failed to send WebSocket message: {}", e);
            break;
        }
    }

    if let Err(e) = sink.close().await {
        debug!(peer, "WebSocket close after writer exit failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::channel::mpsc as futures_mpsc;

    #[test]
    fn test_upstream_route_into_frame() {
        let frame = UpstreamRoute::Event(ClientEvent::audio_append("QUJD"))
            .into_frame()
            .unwrap()
            .unwrap();
        match frame {
            UpstreamMessage::Text(text) => {
                let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(value["type"], "input_audio_buffer.append");
                assert_eq!(value["audio"], "QUJD");
            }
            other => panic!("Expected text frame, got {other:?}"),
        }
        assert!(UpstreamRoute::Close.into_frame().unwrap().is_none());
    }

    #[test]
    fn test_client_route_into_frame() {
        let frame = ClientRoute::Media(TelephonyOutgoingMessage::media(
            Some("MZ1".to_string()),
            "QUJD".to_string(),
        ))
        .into_frame()
        .unwrap()
        .unwrap();
        match frame {
            ClientMessage::Text(text) => {
                let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(value["streamSid"], "MZ1");
            }
            other => panic!("Expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_writer_sends_in_order_and_stops_on_close() {
        let (sink, mut frames) = futures_mpsc::unbounded::<UpstreamMessage>();
        let (tx, rx) = mpsc::channel(8);

        tx.send(UpstreamRoute::Event(ClientEvent::audio_append("one")))
            .await
            .unwrap();
        tx.send(UpstreamRoute::Event(ClientEvent::audio_append("two")))
            .await
            .unwrap();
        tx.send(UpstreamRoute::Close).await.unwrap();
        tx.send(UpstreamRoute::Event(ClientEvent::audio_append("late")))
            .await
            .unwrap();

        run_writer(sink, rx, "upstream").await;

        let sent: Vec<UpstreamMessage> = frames.by_ref().collect().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].to_text().unwrap().contains("\"one\""));
        assert!(sent[1].to_text().unwrap().contains("\"two\""));
    }

    #[tokio::test]
    async fn test_writer_exits_when_senders_dropped() {
        let (sink, frames) = futures_mpsc::unbounded::<ClientMessage>();
        let (tx, rx) = mpsc::channel::<ClientRoute>(8);
        drop(tx);

        run_writer(sink, rx, "client").await;

        let sent: Vec<ClientMessage> = frames.collect().await;
        assert!(sent.is_empty());
    }
}
