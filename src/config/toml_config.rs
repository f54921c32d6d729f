use crate::calendar::EventSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub event: Option<EventSection>,
    pub poll: Option<PollSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventSection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub timezone: Option<String>,
    pub calendar: Option<String>,
    /// JSON file with the calendar listing, for resolving the calendar name
    pub directory_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollSection {
    pub marker: Option<String>,
    pub transpose: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replace `${VAR_NAME}` with the environment value; unknown variables
    /// are left in place.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env var regex");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn event_settings(&self) -> EventSettings {
        let defaults = EventSettings::default();
        match &self.event {
            Some(event) => EventSettings {
                name: event.name.clone().unwrap_or(defaults.name),
                description: event.description.clone().unwrap_or(defaults.description),
                location: event.location.clone().unwrap_or(defaults.location),
                timezone: event.timezone.clone().unwrap_or(defaults.timezone),
                calendar: event.calendar.clone().unwrap_or(defaults.calendar),
            },
            None => defaults,
        }
    }

    pub fn directory_file(&self) -> Option<String> {
        self.event.as_ref().and_then(|e| e.directory_file.clone())
    }

    pub fn poll_marker(&self) -> Option<String> {
        self.poll.as_ref().and_then(|p| p.marker.clone())
    }

    pub fn poll_transpose(&self) -> Option<bool> {
        self.poll.as_ref().and_then(|p| p.transpose)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(event) = &self.event {
            if let Some(name) = &event.name {
                validate_non_empty_string("event.name", name)?;
            }
            if let Some(timezone) = &event.timezone {
                validate_non_empty_string("event.timezone", timezone)?;
            }
            if let Some(calendar) = &event.calendar {
                validate_non_empty_string("event.calendar", calendar)?;
            }
        }
        if let Some(poll) = &self.poll {
            if let Some(marker) = &poll.marker {
                validate_non_empty_string("poll.marker", marker)?;
            }
        }
        Ok(())
    }
}
