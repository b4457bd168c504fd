//! Shared fixtures for integration tests.
//!
//! - [`test_config`] / [`test_prompts`] build a complete configuration without
//!   touching the environment
//! - [`MockRealtime`] is an in-process stand-in for the realtime service
//! - [`spawn_app`] serves the gateway on an ephemeral port

// Not every test binary uses every helper
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::HeaderMap;

use toothcall_gateway::core::realtime::openai::{OpenAIRealtimeAudioFormat, OpenAIRealtimeVoice};
use toothcall_gateway::{AppState, Prompts, ServerConfig, ToolRegistry, create_app};

pub const AUTH_KEY: &str = "test-auth-key";
pub const OPENAI_KEY: &str = "sk-test";

/// How long tests wait for a single expected message.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub fn test_config(realtime_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        api_auth_key: AUTH_KEY.to_string(),
        openai_api_key: OPENAI_KEY.to_string(),
        realtime_url: realtime_url.to_string(),
        realtime_model: "gpt-4o-realtime-preview-2024-10-01".to_string(),
        openai_api_url: "http://127.0.0.1:9".to_string(),
        booking_match_model: "gpt-4o-mini".to_string(),
        voice: OpenAIRealtimeVoice::Alloy,
        temperature: 0.8,
        audio_format: OpenAIRealtimeAudioFormat::G711Ulaw,
        log_event_types: vec!["error".to_string(), "response.done".to_string()],
        prompts_dir: PathBuf::from("prompts"),
        enabled_tools: vec!["get_dummy_availibility".to_string()],
        cal_api_key: None,
        cal_api_url: "http://127.0.0.1:9".to_string(),
        cal_event_type_id: 1479842,
        cal_time_zone: "Europe/Berlin".to_string(),
        cal_language: "de".to_string(),
        cal_attendee_email: "john.doe@example.com".to_string(),
        staff_webhook_url: None,
    }
}

pub fn test_prompts() -> Prompts {
    Prompts {
        system: "Du bist die Assistenz einer Zahnarztpraxis.".to_string(),
        intro_speech: "Begrüße den Anrufer.".to_string(),
        find_calendar_entries: "Finde {{attendee_name}} am {{start}}.".to_string(),
    }
}

pub fn test_state(config: ServerConfig) -> Arc<AppState> {
    let prompts = test_prompts();
    let tools = ToolRegistry::from_config(&config, &prompts).expect("tool registry");
    AppState::new(config, &prompts, tools)
}

/// Serve the gateway on an ephemeral port.
pub async fn spawn_app(config: ServerConfig) -> SocketAddr {
    let app = create_app(test_state(config));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind app");
    let addr = listener.local_addr().expect("app addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    addr
}

/// Scripted realtime service accepting a single connection.
///
/// Every text frame the gateway sends is parsed and forwarded on `received`.
/// Strings pushed into `send` are written to the gateway as text frames.
/// Dropping `send` makes the mock close the connection.
pub struct MockRealtime {
    pub url: String,
    pub received: mpsc::UnboundedReceiver<Value>,
    pub send: mpsc::UnboundedSender<String>,
    pub headers: Arc<Mutex<Option<HeaderMap>>>,
}

impl MockRealtime {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
        let addr = listener.local_addr().expect("mock addr");

        let (received_tx, received) = mpsc::unbounded_channel();
        let (send, mut outgoing) = mpsc::unbounded_channel::<String>();
        let headers: Arc<Mutex<Option<HeaderMap>>> = Arc::new(Mutex::new(None));
        let captured = headers.clone();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let callback =
                move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                    *captured.lock().unwrap() = Some(request.headers().clone());
                    Ok(response)
                };
            let Ok(ws) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
                return;
            };
            let (mut write, mut read) = ws.split();

            loop {
                tokio::select! {
                    msg = read.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Ok(value) = serde_json::from_str::<Value>(text.as_str()) {
                                let _ = received_tx.send(value);
                            }
                        }
                        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                        Some(Ok(_)) => {}
                    },
                    out = outgoing.recv() => match out {
                        Some(text) => {
                            if write.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => {
                            let _ = write.send(Message::Close(None)).await;
                            break;
                        }
                    },
                }
            }
        });

        Self {
            url: format!("ws://{addr}/v1/realtime"),
            received,
            send,
            headers,
        }
    }

    /// Next event the gateway sent, or `None` on timeout / disconnect.
    pub async fn next_event(&mut self) -> Option<Value> {
        tokio::time::timeout(RECV_TIMEOUT, self.received.recv())
            .await
            .ok()
            .flatten()
    }

    /// Assert nothing arrives within `wait`.
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(event)) = tokio::time::timeout(wait, self.received.recv()).await {
            panic!("Expected no upstream event, got {event}");
        }
    }

    /// Wait until the gateway ends the connection. Events still in flight
    /// are discarded. Returns `false` if the connection stays open.
    pub async fn wait_closed(&mut self) -> bool {
        tokio::time::timeout(RECV_TIMEOUT, async {
            while self.received.recv().await.is_some() {}
        })
        .await
        .is_ok()
    }

    pub fn push(&self, event: Value) {
        self.send.send(event.to_string()).expect("mock connection gone");
    }
}
