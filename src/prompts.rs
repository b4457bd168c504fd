//! Prompt files loaded once at startup.
//!
//! The prompts directory holds:
//! - `system.md` - system instructions for the realtime session
//! - `intro_speech.md` - instructions for the assistant's opening turn
//! - `find_calendar_entries.md` - booking matcher prompt with
//!   `{{attendee_name}}` and `{{start}}` placeholders

use std::path::Path;

use crate::errors::config_error::{ConfigError, ConfigResult};

pub const SYSTEM_PROMPT_FILE: &str = "system.md";
pub const INTRO_SPEECH_FILE: &str = "intro_speech.md";
pub const FIND_CALENDAR_ENTRIES_FILE: &str = "find_calendar_entries.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub system: String,
    pub intro_speech: String,
    pub find_calendar_entries: String,
}

impl Prompts {
    /// Read all prompt files from `dir`. A missing file is an error.
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile { path, source })
        };

        Ok(Self {
            system: read(SYSTEM_PROMPT_FILE)?,
            intro_speech: read(INTRO_SPEECH_FILE)?,
            find_calendar_entries: read(FIND_CALENDAR_ENTRIES_FILE)?,
        })
    }
}

/// Fill the booking matcher template.
pub fn render_find_calendar_entries(template: &str, attendee_name: &str, start: &str) -> String {
    template
        .replace("{{attendee_name}}", attendee_name)
        .replace("{{start}}", start)
}
