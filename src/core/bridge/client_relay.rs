//! Telephony client -> realtime service relay.

use std::fmt::Display;
use std::sync::Arc;

use axum::extract::ws::Message;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::channels::UpstreamRoute;
use super::error::{BridgeError, BridgeResult};
use super::session::CallSession;
use crate::core::realtime::ClientEvent;
use crate::core::telephony::TelephonyIncomingMessage;

/// Forward caller audio upstream until the client goes away.
///
/// Tracks `start` and `media` events on the session. Whatever ends the relay,
/// the upstream writer is asked to close the service connection before this
/// returns.
pub async fn run_client_relay<St, E>(
    stream: St,
    session: Arc<CallSession>,
    upstream: mpsc::Sender<UpstreamRoute>,
) -> BridgeResult<()>
where
    St: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let result = relay_client_messages(stream, &session, &upstream).await;

    if let Err(ref e) = result {
        error!(session_id = %session.id(), "Client relay failed: {}", e);
    }
    // Ignored: the writer may already be gone if upstream closed first
    let _ = upstream.send(UpstreamRoute::Close).await;

    info!(session_id = %session.id(), "Client relay finished");
    result
}

async fn relay_client_messages<St, E>(
    mut stream: St,
    session: &CallSession,
    upstream: &mpsc::Sender<UpstreamRoute>,
) -> BridgeResult<()>
where
    St: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(msg_result) = stream.next().await {
        let msg = match msg_result {
            Ok(msg) => msg,
            Err(e) => {
                warn!(session_id = %session.id(), "Client WebSocket error: {}", e);
                return Ok(());
            }
        };

        match msg {
            Message::Text(text) => {
                let incoming: TelephonyIncomingMessage = serde_json::from_str(text.as_str())
                    .map_err(|e| BridgeError::Protocol(format!("invalid client message: {e}")))?;
                handle_client_event(incoming, session, upstream).await?;
            }
            Message::Close(_) => {
                info!(session_id = %session.id(), "Client disconnected");
                return Ok(());
            }
            Message::Binary(data) => {
                debug!(session_id = %session.id(), bytes = data.len(), "Ignoring binary frame");
            }
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    info!(session_id = %session.id(), "Client stream ended");
    Ok(())
}

async fn handle_client_event(
    event: TelephonyIncomingMessage,
    session: &CallSession,
    upstream: &mpsc::Sender<UpstreamRoute>,
) -> BridgeResult<()> {
    match event {
        TelephonyIncomingMessage::Start { start } => {
            info!(
                session_id = %session.id(),
                stream_sid = %start.stream_sid,
                "Incoming stream has started"
            );
            session.start_stream(start.stream_sid);
        }
        TelephonyIncomingMessage::Media { media } => {
            session.record_media_timestamp(media.timestamp);
            upstream
                .send(UpstreamRoute::Event(ClientEvent::audio_append(media.payload)))
                .await
                .map_err(|_| BridgeError::ChannelClosed("upstream writer"))?;
        }
        TelephonyIncomingMessage::Unknown => {
            debug!(session_id = %session.id(), "Ignoring client event");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::convert::Infallible;

    fn text(raw: &str) -> Result<Message, Infallible> {
        Ok(Message::Text(raw.to_string().into()))
    }

    fn drain(rx: &mut mpsc::Receiver<UpstreamRoute>) -> Vec<UpstreamRoute> {
        let mut routes = Vec::new();
        while let Ok(route) = rx.try_recv() {
            routes.push(route);
        }
        routes
    }

    #[tokio::test]
    async fn test_unknown_events_and_control_frames_are_skipped() {
        let session = Arc::new(CallSession::new());
        let (tx, mut rx) = mpsc::channel(16);
        let frames = stream::iter(vec![
            text(r#"{"event": "connected"}"#),
            Ok(Message::Binary(vec![1, 2, 3].into())),
            Ok(Message::Ping(Default::default())),
            text(r#"{"event": "mark", "mark": {"name": "x"}}"#),
        ]);

        run_client_relay(frames, session.clone(), tx).await.unwrap();

        let routes = drain(&mut rx);
        assert_eq!(routes.len(), 1);
        assert!(matches!(routes[0], UpstreamRoute::Close));
        assert!(session.stream_id().is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_fatal_and_closes_upstream() {
        let session = Arc::new(CallSession::new());
        let (tx, mut rx) = mpsc::channel(16);
        let frames = stream::iter(vec![
            text("{not json"),
            text(r#"{"event": "media", "media": {"timestamp": 1, "payload": "AA=="}}"#),
        ]);

        let err = run_client_relay(frames, session, tx).await.unwrap_err();
        assert!(matches!(err, BridgeError::Protocol(_)));

        let routes = drain(&mut rx);
        assert_eq!(routes.len(), 1);
        assert!(matches!(routes[0], UpstreamRoute::Close));
    }

    #[tokio::test]
    async fn test_close_frame_stops_relay() {
        let session = Arc::new(CallSession::new());
        let (tx, mut rx) = mpsc::channel(16);
        let frames = stream::iter(vec![
            Ok(Message::Close(None)),
            text(r#"{"event": "media", "media": {"timestamp": 1, "payload": "AA=="}}"#),
        ]);

        run_client_relay(frames, session.clone(), tx).await.unwrap();

        let routes = drain(&mut rx);
        assert_eq!(routes.len(), 1);
        assert_eq!(session.latest_media_timestamp(), 0);
    }

    #[tokio::test]
    async fn test_transport_error_ends_relay_normally() {
        let session = Arc::new(CallSession::new());
        let (tx, mut rx) = mpsc::channel(16);
        let frames = stream::iter(vec![Err::<Message, &str>("connection reset")]);

        run_client_relay(frames, session, tx).await.unwrap();

        assert!(matches!(drain(&mut rx).as_slice(), [UpstreamRoute::Close]));
    }

    #[tokio::test]
    async fn test_media_fails_when_upstream_writer_is_gone() {
        let session = Arc::new(CallSession::new());
        let (tx, rx) = mpsc::channel(16);
        drop(rx);
        let frames = stream::iter(vec![text(
            r#"{"event": "media", "media": {"timestamp": 1, "payload": "AA=="}}"#,
        )]);

        let err = run_client_relay(frames, session, tx).await.unwrap_err();
        assert!(matches!(err, BridgeError::ChannelClosed(_)));
    }
}
