//! Upstream WebSocket connection to the OpenAI Realtime API.

use http::HeaderValue;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::info;

use super::config::OPENAI_BETA_HEADER_VALUE;
use crate::core::bridge::{BridgeError, BridgeResult};

/// WebSocket stream to the realtime service.
pub type RealtimeSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open the upstream connection.
///
/// `endpoint` already carries the `?model=` query parameter. The request gets
/// the bearer key and the `OpenAI-Beta: realtime=v1` header; the handshake
/// headers are filled in by tungstenite.
pub async fn connect_realtime(endpoint: &str, api_key: &str) -> BridgeResult<RealtimeSocket> {
    let mut request = endpoint
        .into_client_request()
        .map_err(|e| BridgeError::ConnectionFailed(e.to_string()))?;

    let headers = request.headers_mut();
    headers.insert(
        http::header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| BridgeError::ConnectionFailed(format!("invalid API key header: {e}")))?,
    );
    headers.insert(
        "OpenAI-Beta",
        HeaderValue::from_static(OPENAI_BETA_HEADER_VALUE),
    );

    let (socket, response) = tokio_tungstenite::connect_async(request)
        .await
        .map_err(|e| BridgeError::ConnectionFailed(e.to_string()))?;

    info!(status = %response.status(), "Connected to OpenAI Realtime API");
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let err = connect_realtime("not a url", "sk-test").await.unwrap_err();
        assert!(matches!(err, BridgeError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_connect_reports_refused_connection() {
        // Port 9 (discard) on localhost is essentially never listening for WebSockets
        let err = connect_realtime("ws://127.0.0.1:9/v1/realtime?model=m", "sk-test")
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::ConnectionFailed(_)));
    }
}
