//! Telephony media stream protocol spoken by the client side of a call.

pub mod messages;

pub use messages::{
    MediaChunk, OutgoingMedia, StreamStart, TelephonyIncomingMessage, TelephonyOutgoingMessage,
};
