//! Media stream bridge between a telephony call and the realtime service.
//!
//! One call runs:
//! - the session handshake ([`initialize_session`]) on the upstream sink,
//! - an upstream writer and a client writer ([`run_writer`]), each owning one sink,
//! - the client relay ([`run_client_relay`]) and the service relay
//!   ([`ServiceRelay`]) concurrently, sharing a [`CallSession`],
//! - tool dispatches ([`ToolDispatcher`]) spawned by the service relay.

mod channels;
mod client_relay;
mod dispatcher;
mod error;
mod initializer;
mod service_relay;
mod session;

pub use channels::{ClientRoute, OutboundRoute, ROUTE_CHANNEL_CAPACITY, UpstreamRoute, run_writer};
pub use client_relay::run_client_relay;
pub use dispatcher::{
    DispatchOutcome, FUNCTION_CALL_OUTPUT_ID_SUFFIX, TOOL_RESULT_INSTRUCTIONS, ToolDispatcher,
};
pub use error::{BridgeError, BridgeResult};
pub use initializer::{SessionSetup, initialize_session};
pub use service_relay::ServiceRelay;
pub use session::CallSession;
