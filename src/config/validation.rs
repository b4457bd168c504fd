//! Configuration validation logic.

use url::Url;

use crate::core::realtime::openai::TEMPERATURE_RANGE;
use crate::core::tools::{AVAILABLE_TOOLS, CALENDAR_TOOLS};
use crate::errors::config_error::{ConfigError, ConfigResult};

/// Secrets must be present and non-blank.
pub fn validate_required_secret(value: &str, field: &'static str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing(field));
    }
    Ok(())
}

pub fn validate_temperature(temperature: f32) -> ConfigResult<()> {
    if !TEMPERATURE_RANGE.contains(&temperature) {
        return Err(ConfigError::invalid(
            "temperature",
            format!(
                "{temperature} is outside {}..={}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            ),
        ));
    }
    Ok(())
}

/// Check a URL parses and uses one of the allowed schemes.
pub fn validate_url(value: &str, field: &'static str, schemes: &[&str]) -> ConfigResult<()> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::invalid(field, format!("'{value}': {e}")))?;
    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::invalid(
            field,
            format!("scheme '{}' not in {schemes:?}", url.scheme()),
        ));
    }
    Ok(())
}

/// Every enabled tool must exist, and calendar tools need a booking API key.
pub fn validate_enabled_tools(enabled: &[String], cal_api_key: Option<&str>) -> ConfigResult<()> {
    if let Some(unknown) = enabled
        .iter()
        .find(|name| !AVAILABLE_TOOLS.contains(&name.as_str()))
    {
        return Err(ConfigError::invalid(
            "enabled_tools",
            format!("unknown tool '{unknown}' (available: {AVAILABLE_TOOLS:?})"),
        ));
    }

    let needs_calendar = enabled
        .iter()
        .any(|name| CALENDAR_TOOLS.contains(&name.as_str()));
    if needs_calendar && cal_api_key.is_none_or(|k| k.trim().is_empty()) {
        return Err(ConfigError::Missing("CAL_API_KEY"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_secret() {
        assert!(validate_required_secret("abc", "API_AUTH_KEY").is_ok());
        assert!(matches!(
            validate_required_secret("  ", "API_AUTH_KEY"),
            Err(ConfigError::Missing("API_AUTH_KEY"))
        ));
    }

    #[test]
    fn test_validate_temperature() {
        assert!(validate_temperature(0.6).is_ok());
        assert!(validate_temperature(1.2).is_ok());
        assert!(validate_temperature(0.5).is_err());
        assert!(validate_temperature(1.5).is_err());
    }

    #[test]
    fn test_validate_url_schemes() {
        assert!(
            validate_url("wss://api.openai.com/v1/realtime", "realtime_url", &["ws", "wss"]).is_ok()
        );
        assert!(validate_url("https://api.openai.com", "realtime_url", &["ws", "wss"]).is_err());
        assert!(validate_url("not a url", "cal_api_url", &["http", "https"]).is_err());
    }

    #[test]
    fn test_validate_enabled_tools_unknown() {
        let enabled = vec!["send_fax".to_string()];
        let err = validate_enabled_tools(&enabled, Some("key")).unwrap_err();
        assert!(err.to_string().contains("send_fax"));
    }

    #[test]
    fn test_validate_enabled_tools_requires_cal_key() {
        let enabled = vec!["create_booking".to_string()];
        assert!(matches!(
            validate_enabled_tools(&enabled, None),
            Err(ConfigError::Missing("CAL_API_KEY"))
        ));
        assert!(validate_enabled_tools(&enabled, Some("cal-key")).is_ok());
    }

    #[test]
    fn test_validate_enabled_tools_without_calendar() {
        let enabled = vec![
            "create_call_back".to_string(),
            "get_dummy_availibility".to_string(),
        ];
        assert!(validate_enabled_tools(&enabled, None).is_ok());
    }
}
