//! Media stream WebSocket handler
//!
//! Each accepted connection is one phone call. The handler opens the realtime
//! service connection, sends the session handshake and then runs both relays
//! until either side goes away.

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::core::bridge::{
    CallSession, ROUTE_CHANNEL_CAPACITY, ServiceRelay, ToolDispatcher, initialize_session,
    run_client_relay, run_writer,
};
use crate::core::realtime::connect_realtime;
use crate::state::AppState;

/// Maximum WebSocket frame size (1 MB)
const MAX_WS_FRAME_SIZE: usize = 1024 * 1024;

/// Maximum WebSocket message size (1 MB)
const MAX_WS_MESSAGE_SIZE: usize = 1024 * 1024;

/// Upgrades `/media-stream` to a WebSocket carrying one call.
pub async fn media_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("Media stream connection upgrade requested");

    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_media_stream(socket, state))
}

async fn handle_media_stream(socket: WebSocket, state: Arc<AppState>) {
    let session = Arc::new(CallSession::new());
    info!(session_id = %session.id(), "Client connected");

    let (mut client_sink, client_stream) = socket.split();

    let upstream = match connect_realtime(
        &state.config.realtime_endpoint(),
        &state.config.openai_api_key,
    )
    .await
    {
        Ok(upstream) => upstream,
        Err(e) => {
            error!(session_id = %session.id(), "Failed to connect to realtime service: {}", e);
            let _ = client_sink.close().await;
            return;
        }
    };
    let (mut upstream_sink, upstream_stream) = upstream.split();

    if let Err(e) = initialize_session(&mut upstream_sink, &state.setup).await {
        error!(session_id = %session.id(), "Session initialization failed: {}", e);
        let _ = upstream_sink.close().await;
        let _ = client_sink.close().await;
        return;
    }

    let (upstream_tx, upstream_rx) = mpsc::channel(ROUTE_CHANNEL_CAPACITY);
    let (client_tx, client_rx) = mpsc::channel(ROUTE_CHANNEL_CAPACITY);

    let upstream_writer = tokio::spawn(run_writer(upstream_sink, upstream_rx, "realtime"));
    let client_writer = tokio::spawn(run_writer(client_sink, client_rx, "client"));

    let dispatcher = Arc::new(ToolDispatcher::new(
        state.tools.clone(),
        upstream_tx.clone(),
        session.id(),
    ));
    let service_relay = ServiceRelay::new(
        session.clone(),
        client_tx,
        dispatcher,
        state.config.log_event_types.iter().cloned(),
    );

    let (client_result, service_result) = tokio::join!(
        run_client_relay(client_stream, session.clone(), upstream_tx),
        service_relay.run(upstream_stream),
    );

    for (task, joined) in [
        ("realtime", upstream_writer.await),
        ("client", client_writer.await),
    ] {
        if let Err(e) = joined {
            warn!(session_id = %session.id(), writer = task, "Writer task failed: {}", e);
        }
    }

    info!(
        session_id = %session.id(),
        stream_sid = ?session.stream_id(),
        client_ok = client_result.is_ok(),
        service_ok = service_result.is_ok(),
        "Call ended"
    );
}
