pub mod api;
pub mod media_stream;

use std::sync::Arc;

use axum::{Router, middleware};

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Full application router: public health check plus the authenticated
/// media stream endpoint.
pub fn create_app(state: Arc<AppState>) -> Router {
    let protected = media_stream::create_media_stream_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(api::create_api_router())
        .merge(protected)
        .with_state(state)
}
