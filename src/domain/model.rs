use crate::calendar::event::EventPayload;
use crate::utils::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A candidate timeslot as exported by the poll: one column, identified by
/// its composite date + weekday + time-range label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: String,
    pub weekday: String,
    pub time: String,
}

impl Slot {
    pub fn new(
        date: impl Into<String>,
        weekday: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            weekday: weekday.into(),
            time: time.into(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} {} {}", self.date, self.weekday, self.time)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.weekday, self.time)
    }
}

/// Participant availability, participants as rows and slots as columns.
///
/// Built once from the poll and immutable afterwards. Construction fails
/// fast on duplicate slot labels or participant names instead of merging
/// entries, and on ragged or empty input.
#[derive(Debug, Clone)]
pub struct PreferenceMatrix {
    slots: Vec<Slot>,
    participants: Vec<String>,
    cells: Vec<Vec<bool>>,
}

impl PreferenceMatrix {
    pub fn new(slots: Vec<Slot>, participants: Vec<String>, cells: Vec<Vec<bool>>) -> Result<Self> {
        if slots.is_empty() {
            return Err(ScheduleError::Poll {
                message: "poll has no slot columns".to_string(),
            });
        }
        if participants.is_empty() {
            return Err(ScheduleError::Poll {
                message: "poll has no participant rows".to_string(),
            });
        }
        if cells.len() != participants.len() {
            return Err(ScheduleError::Poll {
                message: format!(
                    "expected {} selection rows, found {}",
                    participants.len(),
                    cells.len()
                ),
            });
        }
        for (row, selections) in cells.iter().enumerate() {
            if selections.len() != slots.len() {
                return Err(ScheduleError::Poll {
                    message: format!(
                        "participant '{}' has {} selections, expected {}",
                        participants[row],
                        selections.len(),
                        slots.len()
                    ),
                });
            }
        }

        let mut seen_slots = HashSet::new();
        for slot in &slots {
            if !seen_slots.insert(slot.label()) {
                return Err(ScheduleError::Poll {
                    message: format!("duplicate slot '{}'", slot),
                });
            }
        }
        let mut seen_names = HashSet::new();
        for name in &participants {
            if !seen_names.insert(name.as_str()) {
                return Err(ScheduleError::Poll {
                    message: format!("duplicate participant '{}'", name),
                });
            }
        }

        Ok(Self {
            slots,
            participants,
            cells,
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn selected(&self, participant: usize, slot: usize) -> bool {
        self.cells[participant][slot]
    }

    /// Row indexes of every participant who ticked the given slot column.
    pub fn selectors_of(&self, slot: usize) -> Vec<usize> {
        (0..self.participants.len())
            .filter(|&row| self.cells[row][slot])
            .collect()
    }
}

/// One settled slot: the slot and the participant who got it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub slot: Slot,
    pub participant: String,
}

/// Result of one allocation pass: settled slots in column order, plus every
/// participant who ended up without a slot, in row order.
#[derive(Debug, Clone, Default)]
pub struct AllocationOutcome {
    pub assignments: Vec<Assignment>,
    pub unallocated: Vec<String>,
}

impl AllocationOutcome {
    pub fn participant_for(&self, slot: &Slot) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| &a.slot == slot)
            .map(|a| a.participant.as_str())
    }
}

/// A calendar event prepared for one assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedEvent {
    pub participant: String,
    pub slot: Slot,
    pub event: EventPayload,
}

/// Output of the transform stage, handed to load for export and booking.
#[derive(Debug, Clone)]
pub struct ScheduleResult {
    pub outcome: AllocationOutcome,
    pub allocation_csv: String,
    pub unallocated_tsv: String,
    pub events: Vec<BookedEvent>,
}
