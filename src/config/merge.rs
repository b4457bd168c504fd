//! Merge environment values with YAML overrides and apply defaults.

use std::path::PathBuf;

use super::env::EnvConfig;
use super::yaml::YamlConfig;
use super::{
    DEFAULT_BOOKING_MATCH_MODEL, DEFAULT_CAL_API_URL, DEFAULT_CAL_ATTENDEE_EMAIL,
    DEFAULT_CAL_EVENT_TYPE_ID, DEFAULT_CAL_LANGUAGE, DEFAULT_CAL_TIME_ZONE, DEFAULT_ENABLED_TOOLS,
    DEFAULT_HOST, DEFAULT_LOG_EVENT_TYPES, DEFAULT_OPENAI_API_URL, DEFAULT_PORT,
    DEFAULT_PROMPTS_DIR, ServerConfig,
};
use crate::core::realtime::openai::{
    DEFAULT_REALTIME_MODEL, DEFAULT_TEMPERATURE, OPENAI_REALTIME_URL, OpenAIRealtimeAudioFormat,
    OpenAIRealtimeVoice,
};
use crate::errors::config_error::{ConfigError, ConfigResult};

fn owned_list(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Build the final configuration. YAML values win over environment values,
/// which win over defaults.
pub(crate) fn merge_config(yaml: Option<YamlConfig>) -> ConfigResult<ServerConfig> {
    let env = EnvConfig::load()?;
    let yaml = yaml.unwrap_or_default();

    let server = yaml.server.unwrap_or_default();
    let auth = yaml.auth.unwrap_or_default();
    let openai = yaml.openai.unwrap_or_default();
    let session = yaml.session.unwrap_or_default();
    let tools = yaml.tools.unwrap_or_default();
    let cal = yaml.cal.unwrap_or_default();
    let staff = yaml.staff.unwrap_or_default();

    let api_auth_key = auth
        .api_key
        .or(env.api_auth_key)
        .ok_or(ConfigError::Missing("API_AUTH_KEY"))?;
    let openai_api_key = openai
        .api_key
        .or(env.openai_api_key)
        .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

    let voice = match session.voice.or(env.voice) {
        Some(raw) => OpenAIRealtimeVoice::parse(&raw)
            .ok_or_else(|| ConfigError::invalid("voice", format!("unknown voice '{raw}'")))?,
        None => OpenAIRealtimeVoice::default(),
    };

    let audio_format = match session.audio_format.or(env.audio_format) {
        Some(raw) => OpenAIRealtimeAudioFormat::parse(&raw).ok_or_else(|| {
            ConfigError::invalid(
                "audio_format",
                format!("'{raw}' (expected pcm16, g711_ulaw or g711_alaw)"),
            )
        })?,
        None => OpenAIRealtimeAudioFormat::default(),
    };

    Ok(ServerConfig {
        host: server
            .host
            .or(env.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: server.port.or(env.port).unwrap_or(DEFAULT_PORT),
        api_auth_key,
        openai_api_key,
        realtime_url: openai
            .realtime_url
            .or(env.realtime_url)
            .unwrap_or_else(|| OPENAI_REALTIME_URL.to_string()),
        realtime_model: openai
            .realtime_model
            .or(env.realtime_model)
            .unwrap_or_else(|| DEFAULT_REALTIME_MODEL.to_string()),
        openai_api_url: openai
            .api_url
            .or(env.openai_api_url)
            .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
        booking_match_model: openai
            .booking_match_model
            .or(env.booking_match_model)
            .unwrap_or_else(|| DEFAULT_BOOKING_MATCH_MODEL.to_string()),
        voice,
        temperature: session
            .temperature
            .or(env.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
        audio_format,
        log_event_types: session
            .log_event_types
            .or(env.log_event_types)
            .unwrap_or_else(|| owned_list(DEFAULT_LOG_EVENT_TYPES)),
        prompts_dir: PathBuf::from(
            session
                .prompts_dir
                .or(env.prompts_dir)
                .unwrap_or_else(|| DEFAULT_PROMPTS_DIR.to_string()),
        ),
        enabled_tools: tools
            .enabled
            .or(env.enabled_tools)
            .unwrap_or_else(|| owned_list(DEFAULT_ENABLED_TOOLS)),
        cal_api_key: cal.api_key.or(env.cal_api_key),
        cal_api_url: cal
            .api_url
            .or(env.cal_api_url)
            .unwrap_or_else(|| DEFAULT_CAL_API_URL.to_string()),
        cal_event_type_id: cal
            .event_type_id
            .or(env.cal_event_type_id)
            .unwrap_or(DEFAULT_CAL_EVENT_TYPE_ID),
        cal_time_zone: cal
            .time_zone
            .or(env.cal_time_zone)
            .unwrap_or_else(|| DEFAULT_CAL_TIME_ZONE.to_string()),
        cal_language: cal
            .language
            .or(env.cal_language)
            .unwrap_or_else(|| DEFAULT_CAL_LANGUAGE.to_string()),
        cal_attendee_email: cal
            .attendee_email
            .or(env.cal_attendee_email)
            .unwrap_or_else(|| DEFAULT_CAL_ATTENDEE_EMAIL.to_string()),
        staff_webhook_url: staff.webhook_url.or(env.staff_webhook_url),
    })
}
