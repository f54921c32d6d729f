pub mod adapters;
pub mod calendar;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{JsonOutbox, LocalStorage};
pub use crate::config::CliConfig;
pub use crate::core::{engine::SchedulerEngine, pipeline::SchedulePipeline};
pub use crate::domain::model::{AllocationOutcome, Assignment, PreferenceMatrix, Slot};
pub use crate::utils::error::{Result, ScheduleError};
