//! Calendar booking tools backed by Cal.com.

mod cancel;
mod client;
mod create;
mod matcher;

pub use cancel::{CANCEL_FAILED, CANCEL_SUCCEEDED, CancelBookingTool, booking_window};
pub use client::{CAL_API_VERSION, CalClient, CalClientConfig, CalResponse};
pub use create::{BOOKING_FAILED, CreateBookingTool, booking_succeeded};
pub use matcher::{BookingMatch, BookingMatcher};
