pub mod allocator;
pub mod engine;
pub mod pipeline;
pub mod poll;

pub use crate::domain::model::{
    AllocationOutcome, Assignment, BookedEvent, PreferenceMatrix, ScheduleResult, Slot,
};
pub use crate::domain::ports::{CalendarSink, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
