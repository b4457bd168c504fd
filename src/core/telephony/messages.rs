//! Telephony media stream message types
//!
//! The telephony provider opens a WebSocket to `/media-stream` and exchanges
//! JSON text frames tagged by `event`. Inbound audio arrives as base64 chunks
//! in `media` events; outbound audio is sent back the same way, addressed to
//! the stream announced in `start`.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Incoming Messages (telephony provider -> gateway)
// =============================================================================

/// Incoming media stream events.
///
/// Only `start` and `media` carry anything the bridge acts on. Every other tag
/// (`connected`, `stop`, `mark`, `dtmf`, ...) deserializes to `Unknown`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyIncomingMessage {
    /// Stream metadata, sent once before the first media chunk
    Start { start: StreamStart },

    /// One chunk of caller audio
    Media { media: MediaChunk },

    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamStart {
    #[serde(rename = "streamSid")]
    pub stream_sid: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaChunk {
    /// Milliseconds since stream start
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: u64,
    /// Base64 audio, forwarded upstream untouched
    pub payload: String,
}

/// Providers send the timestamp either as a number or as a decimal string.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Timestamp {
        Number(u64),
        Text(String),
    }

    match Timestamp::deserialize(deserializer)? {
        Timestamp::Number(n) => Ok(n),
        Timestamp::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid media timestamp '{s}': {e}"))),
    }
}

// =============================================================================
// Outgoing Messages (gateway -> telephony provider)
// =============================================================================

/// Outgoing media stream events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyOutgoingMessage {
    /// Assistant audio for the caller
    Media {
        /// `null` when audio arrives before the stream has started
        #[serde(rename = "streamSid")]
        stream_sid: Option<String>,
        media: OutgoingMedia,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMedia {
    pub payload: String,
}

impl TelephonyOutgoingMessage {
    pub fn media(stream_sid: Option<String>, payload: String) -> Self {
        TelephonyOutgoingMessage::Media {
            stream_sid,
            media: OutgoingMedia { payload },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_start() {
        let msg: TelephonyIncomingMessage = serde_json::from_str(
            r#"{"event": "start", "sequenceNumber": "1", "start": {"streamSid": "MZ123", "tracks": ["inbound"]}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            TelephonyIncomingMessage::Start {
                start: StreamStart {
                    stream_sid: "MZ123".to_string()
                }
            }
        );
    }

    #[test]
    fn test_parse_media_with_numeric_timestamp() {
        let msg: TelephonyIncomingMessage = serde_json::from_str(
            r#"{"event": "media", "media": {"timestamp": 100, "payload": "QUJD"}}"#,
        )
        .unwrap();
        match msg {
            TelephonyIncomingMessage::Media { media } => {
                assert_eq!(media.timestamp, 100);
                assert_eq!(media.payload, "QUJD");
            }
            other => panic!("Expected media, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_media_with_string_timestamp() {
        let msg: TelephonyIncomingMessage = serde_json::from_str(
            r#"{"event": "media", "streamSid": "MZ1", "media": {"track": "inbound", "chunk": "2", "timestamp": "5120", "payload": "AAAA"}}"#,
        )
        .unwrap();
        match msg {
            TelephonyIncomingMessage::Media { media } => assert_eq!(media.timestamp, 5120),
            other => panic!("Expected media, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_events() {
        for raw in [
            r#"{"event": "connected", "protocol": "Call", "version": "1.0.0"}"#,
            r#"{"event": "stop", "stop": {"callSid": "CA1"}}"#,
            r#"{"event": "mark", "mark": {"name": "m1"}}"#,
        ] {
            let msg: TelephonyIncomingMessage = serde_json::from_str(raw).unwrap();
            assert_eq!(msg, TelephonyIncomingMessage::Unknown);
        }
    }

    #[test]
    fn test_media_without_payload_fails() {
        let result: Result<TelephonyIncomingMessage, _> =
            serde_json::from_str(r#"{"event": "media", "media": {"timestamp": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_string_timestamp_fails() {
        let result: Result<TelephonyIncomingMessage, _> = serde_json::from_str(
            r#"{"event": "media", "media": {"timestamp": "soon", "payload": "AA=="}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_outgoing_media() {
        let msg = TelephonyOutgoingMessage::media(Some("MZ123".to_string()), "QUJD".to_string());
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"event": "media", "streamSid": "MZ123", "media": {"payload": "QUJD"}})
        );
    }

    #[test]
    fn test_serialize_outgoing_media_before_start() {
        let msg = TelephonyOutgoingMessage::media(None, "QUJD".to_string());
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"event": "media", "streamSid": null, "media": {"payload": "QUJD"}})
        );
    }
}
