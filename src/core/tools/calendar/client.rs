//! Minimal Cal.com v2 bookings client.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ServerConfig;
use crate::core::tools::base::{ToolError, ToolResult};

/// API version header required by the v2 bookings endpoints.
pub const CAL_API_VERSION: &str = "2024-08-13";

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Envelope returned by every Cal.com v2 endpoint.
///
/// Error responses use the same envelope with `status: "error"`, so the body is
/// parsed regardless of the HTTP status.
#[derive(Debug, Clone, Deserialize)]
pub struct CalResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl CalResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some(STATUS_ERROR)
    }

    /// `data.uid` of a booking response.
    pub fn booking_uid(&self) -> Option<&str> {
        self.data.get("uid").and_then(|uid| uid.as_str())
    }
}

/// Settings shared by every booking request.
#[derive(Debug, Clone)]
pub struct CalClientConfig {
    pub api_url: String,
    pub api_key: String,
    pub event_type_id: u64,
    pub time_zone: String,
    pub language: String,
    pub attendee_email: String,
}

impl Drop for CalClientConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}

pub struct CalClient {
    http: Client,
    config: CalClientConfig,
}

impl CalClient {
    pub fn new(http: Client, config: CalClientConfig) -> Self {
        Self { http, config }
    }

    pub fn from_config(http: Client, config: &ServerConfig) -> ToolResult<Self> {
        let api_key = config
            .cal_api_key
            .clone()
            .ok_or_else(|| ToolError::Configuration("CAL_API_KEY is not set".to_string()))?;

        Ok(Self::new(
            http,
            CalClientConfig {
                api_url: config.cal_api_url.trim_end_matches('/').to_string(),
                api_key,
                event_type_id: config.cal_event_type_id,
                time_zone: config.cal_time_zone.clone(),
                language: config.cal_language.clone(),
                attendee_email: config.cal_attendee_email.clone(),
            },
        ))
    }

    fn bookings_url(&self) -> String {
        format!("{}/v2/bookings", self.config.api_url)
    }

    /// `POST /v2/bookings`
    pub async fn create_booking(
        &self,
        start: &str,
        attendee_name: &str,
        additional_notes: Option<&str>,
    ) -> ToolResult<CalResponse> {
        let mut payload = json!({
            "start": start,
            "eventTypeId": self.config.event_type_id,
            "attendee": {
                "name": attendee_name,
                "email": self.config.attendee_email,
                "timeZone": self.config.time_zone,
                "language": self.config.language,
            },
        });
        if let Some(notes) = additional_notes.filter(|n| !n.trim().is_empty()) {
            payload["metadata"] = json!({ "additional_notes": notes });
        }

        debug!(start, "Creating booking");
        let response = self
            .http
            .post(self.bookings_url())
            .bearer_auth(&self.config.api_key)
            .header("cal-api-version", CAL_API_VERSION)
            .json(&payload)
            .send()
            .await?;

        Self::parse_envelope(response).await
    }

    /// `GET /v2/bookings?afterStart=..&beforeEnd=..`, returned as the raw body.
    ///
    /// The body is handed to the booking matcher verbatim.
    pub async fn list_bookings(&self, after_start: &str, before_end: &str) -> ToolResult<String> {
        debug!(after_start, before_end, "Listing bookings");
        let response = self
            .http
            .get(self.bookings_url())
            .bearer_auth(&self.config.api_key)
            .header("cal-api-version", CAL_API_VERSION)
            .query(&[("afterStart", after_start), ("beforeEnd", before_end)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ToolError::UnexpectedResponse(format!(
                "listing bookings returned {status}: {body}"
            )));
        }
        Ok(body)
    }

    /// `POST /v2/bookings/{uid}/cancel`
    pub async fn cancel_booking(&self, uid: &str) -> ToolResult<CalResponse> {
        debug!(uid, "Cancelling booking");
        let response = self
            .http
            .post(format!("{}/{uid}/cancel", self.bookings_url()))
            .bearer_auth(&self.config.api_key)
            .header("cal-api-version", CAL_API_VERSION)
            .send()
            .await?;

        Self::parse_envelope(response).await
    }

    async fn parse_envelope(response: reqwest::Response) -> ToolResult<CalResponse> {
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            ToolError::UnexpectedResponse(format!("{status} with unreadable body ({e}): {body}"))
        })
    }
}
