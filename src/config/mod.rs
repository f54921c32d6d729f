pub mod toml_config;

use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MARKER: &str = "OK";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "autocalendar")]
#[command(about = "Allocate poll timeslots and prepare calendar bookings")]
pub struct CliConfig {
    /// Poll CSV export to allocate
    #[arg(long, default_value = "doodle_poll.csv")]
    pub poll_file: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Cell value that counts as a selection (default "OK")
    #[arg(long)]
    pub marker: Option<String>,

    /// Poll has slots as rows and participants as columns
    #[arg(long)]
    pub transpose: bool,

    /// Fixed seed for reproducible allocation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional TOML config with event and poll settings
    #[arg(short, long)]
    pub config: Option<String>,

    /// Parse and report the poll without allocating
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Fold TOML poll settings into the parsed arguments. Flags given on
    /// the command line take precedence over the file.
    pub fn apply_toml(&mut self, toml: &TomlConfig) {
        if self.marker.is_none() {
            self.marker = toml.poll_marker();
        }
        if toml.poll_transpose().unwrap_or(false) {
            self.transpose = true;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn poll_path(&self) -> &str {
        &self.poll_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn selection_marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(DEFAULT_MARKER)
    }

    fn transpose(&self) -> bool {
        self.transpose
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_path("poll_file", &self.poll_file)?;
        validate_file_extension("poll_file", &self.poll_file, &["csv"])?;
        validate_path("output_path", &self.output_path)?;
        if let Some(marker) = &self.marker {
            validate_non_empty_string("marker", marker)?;
        }
        Ok(())
    }
}
