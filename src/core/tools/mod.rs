//! Tools the realtime model can call during a phone conversation.

pub mod availability;
pub mod base;
pub mod calendar;
pub mod registry;
pub mod staff;

pub use base::{Tool, ToolDescription, ToolError, ToolResult};
pub use registry::ToolRegistry;

pub const CREATE_BOOKING: &str = "create_booking";
pub const CANCEL_BOOKING: &str = "cancel_booking";
pub const CREATE_CALL_BACK: &str = "create_call_back";
/// Spelled the way the model has always been prompted with.
pub const GET_DUMMY_AVAILABILITY: &str = "get_dummy_availibility";

/// Every tool name accepted in `enabled_tools`.
pub const AVAILABLE_TOOLS: &[&str] = &[
    CREATE_BOOKING,
    CANCEL_BOOKING,
    CREATE_CALL_BACK,
    GET_DUMMY_AVAILABILITY,
];

/// Tools that need the booking provider credentials.
pub const CALENDAR_TOOLS: &[&str] = &[CREATE_BOOKING, CANCEL_BOOKING];
