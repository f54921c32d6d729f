//! Calendar directory lookup.
//!
//! Maps a calendar's display name to its id using a directory listing
//! (the shape of a calendarList response, loaded from a file). The literal
//! name "primary" always resolves to itself.

use crate::utils::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};

pub const PRIMARY: &str = "primary";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarDirectory {
    pub items: Vec<CalendarEntry>,
}

impl CalendarDirectory {
    pub fn from_json(raw: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// First entry whose summary matches the requested name wins.
    pub fn resolve(&self, name: &str) -> Result<String> {
        if name == PRIMARY {
            return Ok(PRIMARY.to_string());
        }
        self.items
            .iter()
            .find(|entry| entry.summary == name)
            .map(|entry| entry.id.clone())
            .ok_or_else(|| ScheduleError::CalendarNotFound {
                name: name.to_string(),
            })
    }
}
