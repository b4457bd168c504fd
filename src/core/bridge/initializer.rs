//! Session handshake sent to the realtime service before any audio flows.

use std::fmt::Display;

use futures::{Sink, SinkExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::info;

use super::error::{BridgeError, BridgeResult};
use crate::config::ServerConfig;
use crate::core::realtime::openai::{
    ClientEvent, Modality, OpenAIRealtimeAudioFormat, OpenAIRealtimeVoice, SessionConfig,
    TurnDetection,
};
use crate::core::tools::ToolDescription;

/// Everything needed to configure a new realtime session.
#[derive(Debug, Clone)]
pub struct SessionSetup {
    /// System instructions
    pub instructions: String,
    /// Spoken as the assistant's first turn
    pub intro_speech: String,
    pub voice: OpenAIRealtimeVoice,
    pub audio_format: OpenAIRealtimeAudioFormat,
    pub temperature: f32,
    pub tools: Vec<ToolDescription>,
}

impl SessionSetup {
    pub fn new(
        config: &ServerConfig,
        instructions: impl Into<String>,
        intro_speech: impl Into<String>,
        tools: Vec<ToolDescription>,
    ) -> Self {
        Self {
            instructions: instructions.into(),
            intro_speech: intro_speech.into(),
            voice: config.voice,
            audio_format: config.audio_format,
            temperature: config.temperature,
            tools,
        }
    }

    /// The `session.update` event.
    pub fn session_update(&self) -> ClientEvent {
        let format = self.audio_format.as_str().to_string();
        ClientEvent::SessionUpdate {
            session: SessionConfig {
                turn_detection: Some(TurnDetection::server_vad()),
                input_audio_format: Some(format.clone()),
                output_audio_format: Some(format),
                voice: Some(self.voice.as_str().to_string()),
                instructions: Some(self.instructions.clone()),
                modalities: Some(vec![
                    Modality::Text.as_str().to_string(),
                    Modality::Audio.as_str().to_string(),
                ]),
                temperature: Some(self.temperature),
                tools: Some(self.tools.clone()),
            },
        }
    }

    /// The `response.create` event that makes the assistant speak first.
    pub fn intro_response(&self) -> ClientEvent {
        ClientEvent::response_with_instructions(self.intro_speech.clone())
    }
}

/// Send the session handshake directly on the upstream sink.
///
/// Runs before the writer task takes ownership of the sink, so a failure here
/// aborts the call before either relay starts.
pub async fn initialize_session<S>(sink: &mut S, setup: &SessionSetup) -> BridgeResult<()>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    for event in [setup.session_update(), setup.intro_response()] {
        let json = serde_json::to_string(&event)?;
        sink.send(Message::Text(json.into()))
            .await
            .map_err(|e| BridgeError::WebSocket(format!("{} failed: {e}", event.event_type())))?;
    }

    info!(
        voice = %setup.voice,
        audio_format = %setup.audio_format,
        tools = setup.tools.len(),
        "Realtime session initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::channel::mpsc;
    use serde_json::json;

    fn setup() -> SessionSetup {
        SessionSetup {
            instructions: "Du bist die Praxisassistenz.".to_string(),
            intro_speech: "Begrüße den Anrufer.".to_string(),
            voice: OpenAIRealtimeVoice::Alloy,
            audio_format: OpenAIRealtimeAudioFormat::G711Ulaw,
            temperature: 0.8,
            tools: vec![ToolDescription::function(
                "create_call_back",
                "Notiert eine Rückrufbitte.",
                json!({"type": "object", "properties": {}}),
            )],
        }
    }

    #[test]
    fn test_session_update_contents() {
        let value = serde_json::to_value(setup().session_update()).unwrap();
        let session = &value["session"];

        assert_eq!(value["type"], "session.update");
        assert_eq!(session["turn_detection"], json!({"type": "server_vad"}));
        assert_eq!(session["input_audio_format"], "g711_ulaw");
        assert_eq!(session["output_audio_format"], "g711_ulaw");
        assert_eq!(session["voice"], "alloy");
        assert_eq!(session["modalities"], json!(["text", "audio"]));
        assert_eq!(session["instructions"], "Du bist die Praxisassistenz.");
        assert_eq!(session["tools"][0]["name"], "create_call_back");
        assert!((session["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_initialize_sends_update_then_intro() {
        let (mut sink, stream) = mpsc::unbounded::<Message>();

        initialize_session(&mut sink, &setup()).await.unwrap();
        drop(sink);

        let sent: Vec<serde_json::Value> = stream
            .map(|m| serde_json::from_str(m.to_text().unwrap()).unwrap())
            .collect()
            .await;

        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0]["type"], "session.update");
        assert_eq!(sent[1]["type"], "response.create");
        assert_eq!(sent[1]["response"]["instructions"], "Begrüße den Anrufer.");
    }

    #[tokio::test]
    async fn test_initialize_fails_on_closed_sink() {
        let (mut sink, stream) = mpsc::unbounded::<Message>();
        drop(stream);

        let err = initialize_session(&mut sink, &setup()).await.unwrap_err();
        assert!(matches!(err, BridgeError::WebSocket(_)));
    }
}
