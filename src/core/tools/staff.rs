//! Call-back requests for the practice staff.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::CREATE_CALL_BACK;
use super::base::{Tool, ToolDescription, ToolError, ToolResult, parse_args};

pub const CALL_BACK_NOTED: &str = "Rückrufbitte erfolgreich notiert.";

#[derive(Debug, Serialize, Deserialize)]
struct CallBackRequest {
    preferred_contact: String,
    description: String,
    name: String,
}

/// Logs the request and, when a webhook is configured, posts it there as JSON.
pub struct CreateCallBackTool {
    http: Client,
    webhook_url: Option<String>,
}

impl CreateCallBackTool {
    pub fn new(http: Client, webhook_url: Option<String>) -> Self {
        Self { http, webhook_url }
    }
}

#[async_trait]
impl Tool for CreateCallBackTool {
    fn name(&self) -> &'static str {
        CREATE_CALL_BACK
    }

    fn description(&self) -> ToolDescription {
        ToolDescription::function(
            CREATE_CALL_BACK,
            "Notiert eine Rückrufbitte für das Praxisteam.",
            json!({
                "type": "object",
                "properties": {
                    "preferred_contact": {
                        "type": "string",
                        "description": "Auf welche Weise soll das Praxisteam Kontakt aufnehmen. Beispielsweise E-Mail oder Telefonnummer."
                    },
                    "description": {
                        "type": "string",
                        "description": "Beschreibung zu welchem Thema sich das Praxisteam beim Anrufer melden soll."
                    },
                    "name": {
                        "type": "string",
                        "description": "Name des Kunden."
                    }
                },
                "required": ["description", "name", "preferred_contact"],
                "additionalProperties": false
            }),
        )
    }

    async fn invoke(&self, args: serde_json::Value) -> ToolResult<Option<String>> {
        let request: CallBackRequest = parse_args(args)?;
        info!(
            name = %request.name,
            preferred_contact = %request.preferred_contact,
            description = %request.description,
            "Call-back requested"
        );

        if let Some(ref url) = self.webhook_url {
            let response = self.http.post(url).json(&request).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ToolError::UnexpectedResponse(format!(
                    "staff webhook returned {status}"
                )));
            }
        }

        Ok(Some(CALL_BACK_NOTED.to_string()))
    }
}
