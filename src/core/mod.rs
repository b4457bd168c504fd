pub mod bridge;
pub mod realtime;
pub mod telephony;
pub mod tools;

// Re-export commonly used types for convenience
pub use bridge::{BridgeError, BridgeResult, CallSession, SessionSetup, ToolDispatcher};
pub use realtime::{ClientEvent, ServerEvent, connect_realtime};
pub use telephony::{TelephonyIncomingMessage, TelephonyOutgoingMessage};
pub use tools::{Tool, ToolDescription, ToolError, ToolRegistry, ToolResult};
