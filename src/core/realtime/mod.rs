//! Realtime speech service integration.
//!
//! Only OpenAI's Realtime API is supported. The bridge talks to it over a
//! single WebSocket per call and relays audio without transcoding.

pub mod openai;

pub use openai::{
    ClientEvent, ConversationItem, OpenAIRealtimeAudioFormat, OpenAIRealtimeVoice, RealtimeSocket,
    ServerEvent, ServerFrame, SessionConfig, connect_realtime,
};
