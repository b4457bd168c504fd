//! OpenAI Realtime API module.
//!
//! Wire types and the upstream connection used by the media stream bridge.
//!
//! # Supported Voices
//!
//! alloy, ash, ballad, coral, echo, sage, shimmer, verse
//!
//! # Audio Format
//!
//! PCM 16-bit signed little-endian at 24kHz, or G.711 u-law / a-law at 8kHz.
//! The bridge never transcodes, so the session format must match what the
//! telephony client sends.

mod config;
mod connection;
mod messages;

pub use config::{
    DEFAULT_REALTIME_MODEL, DEFAULT_TEMPERATURE, Modality, OPENAI_BETA_HEADER_VALUE,
    OPENAI_REALTIME_URL, OpenAIRealtimeAudioFormat, OpenAIRealtimeVoice, TEMPERATURE_RANGE,
};
pub use connection::{RealtimeSocket, connect_realtime};
pub use messages::{
    ApiError, ClientEvent, ContentPart, ConversationItem, FUNCTION_CALL_ITEM_TYPE,
    FUNCTION_CALL_OUTPUT_ITEM_TYPE, ITEM_STATUS_COMPLETED, ResponseConfig, ResponseInfo,
    ServerEvent, ServerFrame, SessionConfig, SessionInfo, TurnDetection,
};
