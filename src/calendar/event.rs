//! Calendar event payload construction.
//!
//! Renders an assignment into the JSON body a calendar service expects:
//! summary, location, description, start/end with a wall-clock dateTime and
//! an opaque timezone label, and a 10-minute popup reminder. No timezone
//! arithmetic is done here; the label is passed through as-is.

use crate::domain::model::Slot;
use crate::utils::error::{Result, ScheduleError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B %Y", "%d %b %Y", "%d/%m/%Y"];

/// Settings shared by every event built from one poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSettings {
    pub name: String,
    pub description: String,
    pub location: String,
    pub timezone: String,
    pub calendar: String,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            name: "Scheduled session".to_string(),
            description: String::new(),
            location: String::new(),
            timezone: "UTC".to_string(),
            calendar: "primary".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminders {
    #[serde(rename = "useDefault")]
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    pub summary: String,
    #[serde(rename = "colorId")]
    pub color_id: String,
    pub kind: String,
    pub location: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub reminders: Reminders,
}

/// Wall-clock span a slot label resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

fn time_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d{1,2}[:.]\d{2})\s*[-\u{2013}]\s*(\d{1,2}[:.]\d{2})\s*$")
            .expect("time range regex")
    })
}

/// Resolve a slot's date and time-range labels into start/end datetimes.
///
/// Time entries sometimes use a dot separator ("9.00-10.00"); it is
/// normalized to a colon before parsing.
pub fn parse_slot_span(slot: &Slot) -> Result<SlotSpan> {
    let date = parse_date(slot)?;

    let captures = time_range_re().captures(&slot.time).ok_or_else(|| ScheduleError::Slot {
        label: slot.label(),
        reason: format!("time range '{}' does not look like H:MM-H:MM", slot.time),
    })?;

    let start = parse_time(slot, &captures[1])?;
    let end = parse_time(slot, &captures[2])?;
    if end <= start {
        return Err(ScheduleError::Slot {
            label: slot.label(),
            reason: format!("slot ends before it starts ({})", slot.time),
        });
    }

    Ok(SlotSpan {
        start: date.and_time(start),
        end: date.and_time(end),
    })
}

fn parse_date(slot: &Slot) -> Result<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&slot.date, format) {
            return Ok(date);
        }
    }
    Err(ScheduleError::Slot {
        label: slot.label(),
        reason: format!("unrecognized date '{}'", slot.date),
    })
}

fn parse_time(slot: &Slot, raw: &str) -> Result<NaiveTime> {
    let normalized = raw.replace('.', ":");
    NaiveTime::parse_from_str(&normalized, "%H:%M").map_err(|_| ScheduleError::Slot {
        label: slot.label(),
        reason: format!("unrecognized time '{}'", raw),
    })
}

/// Build the bookable payload for one assigned slot.
pub fn build_event(slot: &Slot, settings: &EventSettings) -> Result<EventPayload> {
    let span = parse_slot_span(slot)?;

    Ok(EventPayload {
        summary: settings.name.clone(),
        color_id: "9".to_string(),
        kind: "calendar#event".to_string(),
        location: settings.location.clone(),
        description: settings.description.clone(),
        start: EventTime {
            date_time: span.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone: settings.timezone.clone(),
        },
        end: EventTime {
            date_time: span.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone: settings.timezone.clone(),
        },
        reminders: Reminders {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: "popup".to_string(),
                minutes: 10,
            }],
        },
    })
}
