pub mod directory;
pub mod event;

pub use directory::{CalendarDirectory, CalendarEntry};
pub use event::{build_event, parse_slot_span, EventPayload, EventSettings};
