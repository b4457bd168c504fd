//! Configuration module for the media stream gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use toothcall_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

use crate::core::realtime::openai::{OpenAIRealtimeAudioFormat, OpenAIRealtimeVoice};
use crate::errors::config_error::ConfigResult;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com";
pub const DEFAULT_BOOKING_MATCH_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_CAL_API_URL: &str = "https://api.cal.com";
pub const DEFAULT_CAL_EVENT_TYPE_ID: u64 = 1479842;
pub const DEFAULT_CAL_TIME_ZONE: &str = "Europe/Berlin";
pub const DEFAULT_CAL_LANGUAGE: &str = "de";
pub const DEFAULT_CAL_ATTENDEE_EMAIL: &str = "john.doe@example.com";

/// Upstream event types that are logged as they arrive.
pub const DEFAULT_LOG_EVENT_TYPES: &[&str] = &[
    "response.content.done",
    "rate_limits.updated",
    "response.done",
    "input_audio_buffer.commited",
    "input_audio_buffer.speech_stopped",
    "input_audio_buffer.speech_started",
    "session.created",
    "error",
];

pub const DEFAULT_ENABLED_TOOLS: &[&str] =
    &["create_booking", "cancel_booking", "create_call_back"];

/// Server configuration
///
/// Loaded once at startup and shared read-only with every call session:
/// - Server settings (host, port)
/// - Client authentication key
/// - OpenAI Realtime session settings
/// - Tool selection and booking provider settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    /// Bearer token telephony clients must present
    pub api_auth_key: String,

    // OpenAI settings
    pub openai_api_key: String,
    pub realtime_url: String,
    pub realtime_model: String,
    /// REST base URL for chat completions (booking matcher)
    pub openai_api_url: String,
    pub booking_match_model: String,

    // Realtime session settings
    pub voice: OpenAIRealtimeVoice,
    pub temperature: f32,
    /// Audio format declared for both directions; payloads are forwarded as-is
    pub audio_format: OpenAIRealtimeAudioFormat,
    pub log_event_types: Vec<String>,
    pub prompts_dir: PathBuf,

    /// Tools declared to the model, in declaration order
    pub enabled_tools: Vec<String>,

    // Cal.com booking provider
    pub cal_api_key: Option<String>,
    pub cal_api_url: String,
    pub cal_event_type_id: u64,
    pub cal_time_zone: String,
    pub cal_language: String,
    /// Placeholder attendee email; callers are identified by name only
    pub cal_attendee_email: String,

    /// Optional webhook notified about callback requests
    pub staff_webhook_url: Option<String>,
}

/// Implement Drop to zeroize all secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.api_auth_key.zeroize();
        self.openai_api_key.zeroize();
        if let Some(ref mut key) = self.cal_api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables only
    ///
    /// The .env file is loaded in `main` before this is called, so its values
    /// are visible here unless real environment variables override them.
    pub fn from_env() -> ConfigResult<Self> {
        let config = merge::merge_config(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> ConfigResult<Self> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        validation::validate_required_secret(&self.api_auth_key, "API_AUTH_KEY")?;
        validation::validate_required_secret(&self.openai_api_key, "OPENAI_API_KEY")?;
        validation::validate_temperature(self.temperature)?;
        validation::validate_url(&self.realtime_url, "realtime_url", &["ws", "wss"])?;
        validation::validate_url(&self.openai_api_url, "openai_api_url", &["http", "https"])?;
        validation::validate_url(&self.cal_api_url, "cal_api_url", &["http", "https"])?;
        if let Some(ref url) = self.staff_webhook_url {
            validation::validate_url(url, "staff_webhook_url", &["http", "https"])?;
        }
        validation::validate_enabled_tools(&self.enabled_tools, self.cal_api_key.as_deref())?;
        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full upstream WebSocket URL including the model query parameter.
    pub fn realtime_endpoint(&self) -> String {
        format!("{}?model={}", self.realtime_url, self.realtime_model)
    }
}
