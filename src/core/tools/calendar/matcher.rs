//! Picks the booking a caller means from a day's booking list.
//!
//! Callers give a date and a name the speech model may have misspelled, so an
//! exact lookup is not possible. A chat completion with a strict JSON schema
//! response format reads the raw booking list and returns the best match.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ServerConfig;
use crate::core::tools::base::{ToolError, ToolResult};

/// The structured answer of the matcher model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingMatch {
    pub uid: String,
    pub attendee_name: String,
    pub start: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

pub struct BookingMatcher {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl Drop for BookingMatcher {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.api_key.zeroize();
    }
}

impl BookingMatcher {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_config(http: Client, config: &ServerConfig) -> Self {
        Self::new(
            http,
            config.openai_api_url.clone(),
            config.openai_api_key.clone(),
            config.booking_match_model.clone(),
        )
    }

    fn request_body(&self, system_prompt: &str, bookings: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": bookings},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "CalendarBookingInformation",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "uid": {"type": "string"},
                            "attendee_name": {"type": "string"},
                            "start": {"type": "string"},
                        },
                        "required": ["uid", "attendee_name", "start"],
                        "additionalProperties": false,
                    },
                },
            },
        })
    }

    /// Ask the model which booking in `bookings` matches the rendered prompt.
    pub async fn find_booking(
        &self,
        system_prompt: &str,
        bookings: &str,
    ) -> ToolResult<BookingMatch> {
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(system_prompt, bookings))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::UnexpectedResponse(format!(
                "booking matcher returned {status}: {body}"
            )));
        }

        let completion: ChatCompletion = response.json().await?;
        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| ToolError::UnexpectedResponse("completion has no choices".to_string()))?;

        if let Some(refusal) = message.refusal {
            return Err(ToolError::NoMatch(refusal));
        }
        let content = message
            .content
            .ok_or_else(|| ToolError::UnexpectedResponse("completion has no content".to_string()))?;

        let found: BookingMatch = serde_json::from_str(&content).map_err(|e| {
            ToolError::UnexpectedResponse(format!("matcher content is not a booking: {e}"))
        })?;
        if found.uid.trim().is_empty() {
            return Err(ToolError::NoMatch("matcher returned an empty uid".to_string()));
        }

        debug!(uid = %found.uid, attendee = %found.attendee_name, "Booking matched");
        Ok(found)
    }
}
