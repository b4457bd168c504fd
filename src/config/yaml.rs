use serde::Deserialize;
use std::path::PathBuf;

use crate::errors::config_error::{ConfigError, ConfigResult};

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values set here take
/// precedence over environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 5050
///
/// auth:
///   api_key: "shared-secret"
///
/// openai:
///   api_key: "sk-..."
///   realtime_model: "gpt-4o-realtime-preview-2024-10-01"
///   booking_match_model: "gpt-4o-mini"
///
/// session:
///   voice: "alloy"
///   temperature: 0.8
///   audio_format: "g711_ulaw"
///   prompts_dir: "prompts"
///   log_event_types:
///     - "response.done"
///     - "error"
///
/// tools:
///   enabled:
///     - "create_booking"
///     - "cancel_booking"
///     - "create_call_back"
///
/// cal:
///   api_key: "cal_live_..."
///   event_type_id: 1479842
///   time_zone: "Europe/Berlin"
///
/// staff:
///   webhook_url: "https://hooks.example.com/callbacks"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub auth: Option<AuthYaml>,
    pub openai: Option<OpenAIYaml>,
    pub session: Option<SessionYaml>,
    pub tools: Option<ToolsYaml>,
    pub cal: Option<CalYaml>,
    pub staff: Option<StaffYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Authentication configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    /// Bearer token telephony clients must present on `/media-stream`
    pub api_key: Option<String>,
}

/// OpenAI configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OpenAIYaml {
    pub api_key: Option<String>,
    pub realtime_url: Option<String>,
    pub realtime_model: Option<String>,
    /// Base URL of the REST API used by the booking matcher
    pub api_url: Option<String>,
    pub booking_match_model: Option<String>,
}

/// Realtime session configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SessionYaml {
    pub voice: Option<String>,
    pub temperature: Option<f32>,
    pub audio_format: Option<String>,
    pub log_event_types: Option<Vec<String>>,
    pub prompts_dir: Option<String>,
}

/// Tool selection from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ToolsYaml {
    pub enabled: Option<Vec<String>>,
}

/// Cal.com booking provider configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CalYaml {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub event_type_id: Option<u64>,
    pub time_zone: Option<String>,
    pub language: Option<String>,
    pub attendee_email: Option<String>,
}

/// Staff notification configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StaffYaml {
    pub webhook_url: Option<String>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;

        let config: YamlConfig = serde_yaml::from_str(&contents)?;

        Ok(config)
    }
}
