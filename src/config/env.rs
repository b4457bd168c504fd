//! Environment variable loading.
//!
//! Every value is optional here; defaults are applied when merging.

use std::env;
use std::str::FromStr;

use super::utils::parse_comma_list;
use crate::errors::config_error::{ConfigError, ConfigResult};

/// Raw configuration values read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_auth_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub realtime_url: Option<String>,
    pub realtime_model: Option<String>,
    pub openai_api_url: Option<String>,
    pub booking_match_model: Option<String>,
    pub voice: Option<String>,
    pub temperature: Option<f32>,
    pub audio_format: Option<String>,
    pub log_event_types: Option<Vec<String>>,
    pub prompts_dir: Option<String>,
    pub enabled_tools: Option<Vec<String>>,
    pub cal_api_key: Option<String>,
    pub cal_api_url: Option<String>,
    pub cal_event_type_id: Option<u64>,
    pub cal_time_zone: Option<String>,
    pub cal_language: Option<String>,
    pub cal_attendee_email: Option<String>,
    pub staff_webhook_url: Option<String>,
}

impl EnvConfig {
    /// Read all known variables from the environment.
    ///
    /// Empty variables are treated as unset.
    pub fn load() -> ConfigResult<Self> {
        Ok(Self {
            host: var("HOST"),
            port: parsed("PORT")?,
            api_auth_key: var("API_AUTH_KEY"),
            openai_api_key: var("OPENAI_API_KEY"),
            realtime_url: var("OPENAI_REALTIME_URL"),
            realtime_model: var("OPENAI_REALTIME_MODEL"),
            openai_api_url: var("OPENAI_API_URL"),
            booking_match_model: var("BOOKING_MATCH_MODEL"),
            voice: var("VOICE"),
            temperature: parsed("TEMPERATURE")?,
            audio_format: var("AUDIO_FORMAT"),
            log_event_types: var("LOG_EVENT_TYPES").map(|v| parse_comma_list(&v)),
            prompts_dir: var("PROMPTS_DIR"),
            enabled_tools: var("ENABLED_TOOLS").map(|v| parse_comma_list(&v)),
            cal_api_key: var("CAL_API_KEY"),
            cal_api_url: var("CAL_API_URL"),
            cal_event_type_id: parsed("CAL_EVENT_TYPE_ID")?,
            cal_time_zone: var("CAL_TIME_ZONE"),
            cal_language: var("CAL_LANGUAGE"),
            cal_attendee_email: var("CAL_ATTENDEE_EMAIL"),
            staff_webhook_url: var("STAFF_WEBHOOK_URL"),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(key: &'static str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(key, format!("'{raw}': {e}")))
        })
        .transpose()
}
