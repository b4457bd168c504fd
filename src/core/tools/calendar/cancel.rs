use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use time::Date;
use time::macros::format_description;
use tracing::{info, warn};

use super::client::CalClient;
use super::matcher::BookingMatcher;
use crate::core::tools::CANCEL_BOOKING;
use crate::core::tools::base::{Tool, ToolDescription, ToolError, ToolResult, parse_args};
use crate::prompts::render_find_calendar_entries;

pub const CANCEL_SUCCEEDED: &str = "Kalendereintrag wurde erfolgreich storniert.";
pub const CANCEL_FAILED: &str = "Kalendereintrag konnte nicht storniert werden.";

/// Bookings are only searched between these UTC hours of the requested day.
const WINDOW_START: &str = "07:00:00.000Z";
const WINDOW_END: &str = "22:00:00.000Z";

/// `(afterStart, beforeEnd)` for the day `start` falls on.
///
/// Accepts a bare `YYYY-MM-DD` or any timestamp beginning with one.
pub fn booking_window(start: &str) -> ToolResult<(String, String)> {
    let day = start
        .trim()
        .get(..10)
        .ok_or_else(|| ToolError::InvalidArguments(format!("start '{start}' is not a date")))?;
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(day, format)
        .map_err(|e| ToolError::InvalidArguments(format!("start '{start}' is not a date: {e}")))?;
    let day = date
        .format(format)
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

    Ok((format!("{day}T{WINDOW_START}"), format!("{day}T{WINDOW_END}")))
}

#[derive(Debug, Deserialize)]
struct CancelBookingArgs {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    attendee_name: Option<String>,
}

pub struct CancelBookingTool {
    client: Arc<CalClient>,
    matcher: BookingMatcher,
    find_prompt: String,
}

impl CancelBookingTool {
    pub fn new(client: Arc<CalClient>, matcher: BookingMatcher, find_prompt: String) -> Self {
        Self {
            client,
            matcher,
            find_prompt,
        }
    }

    /// Find the uid of the booking the caller described.
    async fn resolve_uid(&self, start: &str, attendee_name: &str) -> ToolResult<String> {
        let (after_start, before_end) = booking_window(start)?;
        let bookings = self.client.list_bookings(&after_start, &before_end).await?;

        let prompt = render_find_calendar_entries(&self.find_prompt, attendee_name, start);
        let found = self.matcher.find_booking(&prompt, &bookings).await?;
        Ok(found.uid)
    }
}

#[async_trait]
impl Tool for CancelBookingTool {
    fn name(&self) -> &'static str {
        CANCEL_BOOKING
    }

    fn description(&self) -> ToolDescription {
        ToolDescription::function(
            CANCEL_BOOKING,
            "Storniert eine Buchung aus dem Kalender.",
            json!({
                "type": "object",
                "properties": {
                    "uid": {
                        "type": "string",
                        "description": "Frage den Nutzer NIEMALS nach diesem Parameter. Füge ihn nur hinzu, wenn er in der Konversation bereits auftaucht."
                    },
                    "start": {
                        "type": "string",
                        "description": "Datum des Termins. Beispiel des korrekten Formats: 2024-08-13"
                    },
                    "attendee_name": {
                        "type": "string",
                        "description": "Name des Kunden."
                    }
                },
                "required": ["start", "attendee_name"],
                "additionalProperties": false
            }),
        )
    }

    async fn invoke(&self, args: serde_json::Value) -> ToolResult<Option<String>> {
        let args: CancelBookingArgs = parse_args(args)?;

        let uid = match args.uid.filter(|uid| !uid.trim().is_empty()) {
            Some(uid) => uid,
            None => {
                let start = args.start.ok_or_else(|| {
                    ToolError::InvalidArguments("start is required without a uid".to_string())
                })?;
                let attendee_name = args.attendee_name.unwrap_or_default();
                self.resolve_uid(&start, &attendee_name).await?
            }
        };

        let response = self.client.cancel_booking(&uid).await?;
        if response.is_success() {
            info!(booking_uid = %uid, "Booking cancelled");
            Ok(Some(CANCEL_SUCCEEDED.to_string()))
        } else {
            warn!(
                booking_uid = %uid,
                status = ?response.status,
                error = ?response.error,
                "Cancellation rejected"
            );
            Ok(Some(CANCEL_FAILED.to_string()))
        }
    }
}
