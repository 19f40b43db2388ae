//! Data model for BindCraft run summaries.
//!
//! Holds the two inputs that describe a design run before any statistics are loaded: the
//! [RunSettings] the run was configured with and the [LogSummary] scanned out of its log.

mod run_log;
mod settings;

pub use run_log::{load_run_log, LogLine, LogSummary, RunLogError};
pub use settings::{
    load_run_settings, normalize_design_path, read_run_settings, ConfigError, RunSettings,
    REQUIRED_SETTINGS_KEYS,
};
