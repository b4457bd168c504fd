//! Media stream WebSocket route.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::media_stream::media_stream_handler;
use crate::state::AppState;
use std::sync::Arc;

/// `GET /media-stream` - WebSocket upgrade for a telephony media stream.
///
/// The telephony platform sends `start`, `media` and other events as JSON text
/// frames and receives `media` events carrying the assistant's audio.
/// Authentication is applied by the caller of this function.
pub fn create_media_stream_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/media-stream", get(media_stream_handler))
        .layer(TraceLayer::new_for_http())
}
