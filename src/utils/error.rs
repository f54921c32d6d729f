use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip operation failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing configuration field: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed poll: {message}")]
    Poll { message: String },

    #[error("Unparseable slot '{label}': {reason}")]
    Slot { label: String, reason: String },

    #[error("Calendar '{name}' not found in directory")]
    CalendarNotFound { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScheduleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Csv(_) | Self::Poll { .. } | Self::Slot { .. } => ErrorCategory::Input,
            Self::Toml(_)
            | Self::MissingConfig { .. }
            | Self::InvalidConfigValue { .. }
            | Self::CalendarNotFound { .. } => ErrorCategory::Configuration,
            Self::Zip(_) | Self::Serialization(_) => ErrorCategory::Output,
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CalendarNotFound { .. } => ErrorSeverity::Medium,
            Self::Csv(_)
            | Self::Poll { .. }
            | Self::Slot { .. }
            | Self::Toml(_)
            | Self::MissingConfig { .. }
            | Self::InvalidConfigValue { .. } => ErrorSeverity::High,
            Self::Zip(_) | Self::Serialization(_) | Self::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::Csv(_) => "Check that the poll file is a valid CSV export".to_string(),
            Self::Poll { .. } => {
                "Check the poll layout: header rows for date/weekday/time, one row per participant"
                    .to_string()
            }
            Self::Slot { .. } => {
                "Slot headers must carry a parseable date and a time range like 9:00-10:00"
                    .to_string()
            }
            Self::Toml(_) => "Make sure the config file is valid TOML".to_string(),
            Self::MissingConfig { field } => format!("Set '{}' in the config file or CLI", field),
            Self::InvalidConfigValue { field, .. } => {
                format!("Correct the value of '{}' and retry", field)
            }
            Self::CalendarNotFound { name } => format!(
                "Add a calendar named '{}' to the directory file, or use 'primary'",
                name
            ),
            Self::Zip(_) | Self::Serialization(_) => {
                "Retry the export; if it persists, inspect the allocation output".to_string()
            }
            Self::Io(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The poll input could not be processed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Output => format!("Writing the schedule output failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_error_is_high_severity_input() {
        let err = ScheduleError::Poll {
            message: "duplicate participant".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_calendar_not_found_suggestion_names_calendar() {
        let err = ScheduleError::CalendarNotFound {
            name: "Lab Use".to_string(),
        };
        assert!(err.recovery_suggestion().contains("Lab Use"));
    }
}
