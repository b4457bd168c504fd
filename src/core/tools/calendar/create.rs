use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::client::CalClient;
use crate::core::tools::CREATE_BOOKING;
use crate::core::tools::base::{Tool, ToolDescription, ToolError, ToolResult, parse_args};

pub const BOOKING_FAILED: &str =
    "Kalendereintrag konnte nicht gebucht werden. Anderes Datum oder Uhrzeit versuchen.";

pub fn booking_succeeded(uid: &str) -> String {
    format!("Kalendereintrag konnte erfolgreich gebucht werden. bookingUid: {uid}")
}

#[derive(Debug, Deserialize)]
struct CreateBookingArgs {
    start: String,
    attendee_name: String,
    #[serde(default)]
    additional_notes: Option<String>,
}

pub struct CreateBookingTool {
    client: Arc<CalClient>,
}

impl CreateBookingTool {
    pub fn new(client: Arc<CalClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CreateBookingTool {
    fn name(&self) -> &'static str {
        CREATE_BOOKING
    }

    fn description(&self) -> ToolDescription {
        ToolDescription::function(
            CREATE_BOOKING,
            "Erstellt eine Buchung im Kalender.",
            json!({
                "type": "object",
                "properties": {
                    "additional_notes": {
                        "type": "string",
                        "description": "Eine sehr kurze Zusammenfassung für welchen Anlass der Nutzer diesen Termin gebucht hat."
                    },
                    "start": {
                        "type": "string",
                        "description": "Datum des Termins. Beispiel des korrekten Formats: 2024-08-13T09:00:00Z"
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
        let args: CreateBookingArgs = parse_args(args)?;
        if args.start.trim().is_empty() {
            return Err(ToolError::InvalidArguments("start is empty".to_string()));
        }

        let response = self
            .client
            .create_booking(&args.start, &args.attendee_name, args.additional_notes.as_deref())
            .await?;

        if response.is_error() {
            warn!(start = %args.start, error = ?response.error, "Booking rejected");
            return Ok(Some(BOOKING_FAILED.to_string()));
        }

        let uid = response.booking_uid().ok_or_else(|| {
            ToolError::UnexpectedResponse(format!(
                "booking response without uid: {}",
                response.data
            ))
        })?;
        info!(start = %args.start, booking_uid = %uid, "Booking created");
        Ok(Some(booking_succeeded(uid)))
    }
}
