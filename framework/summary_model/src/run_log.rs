use serde::{Deserialize, Serialize};
use std::io::{BufRead, Read};
use std::path::{Path, PathBuf};

const TRAJECTORY_STARTED: &str = "Starting trajectory:";
const PASSED_ALL_FILTERS: &str = "passed all filters";
const SCRIPT_EXECUTION_FOR: &str = "Script execution for";
const TRAJECTORIES_TOOK: &str = "trajectories took:";

/// A single classified line of a BindCraft run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    /// `Starting trajectory: <name>`, carries the trajectory name
    TrajectoryStarted(String),
    /// `<design> passed all filters`, carries the design name
    DesignAccepted(String),
    /// `Script execution for <n> trajectories took: <duration>`, carries the whole line
    RunCompleted(String),
    Unmatched,
}

impl LogLine {
    /// Classify a log line. The first matching marker wins, in the order of the variants.
    pub fn classify(line: &str) -> Self {
        if let Some((_, trajectory)) = line.split_once(TRAJECTORY_STARTED) {
            LogLine::TrajectoryStarted(trajectory.trim().to_string())
        } else if let Some((design, _)) = line.split_once(PASSED_ALL_FILTERS) {
            LogLine::DesignAccepted(design.trim().to_string())
        } else if line.contains(SCRIPT_EXECUTION_FOR) && line.contains(TRAJECTORIES_TOOK) {
            LogLine::RunCompleted(line.trim().to_string())
        } else {
            LogLine::Unmatched
        }
    }
}

/// Facts scanned out of a run log
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogSummary {
    /// One entry per started trajectory, in log order
    ///
    /// Trajectories that were restarted appear more than once.
    pub trajectories: Vec<String>,
    /// One entry per design that passed all filters, in log order
    pub accepted_designs: Vec<String>,
    /// The completion line of the run, if the run finished
    ///
    /// When the log holds more than one completion line the last one is kept.
    pub end_time: Option<String>,
}

impl LogSummary {
    /// Fold a classified line into the summary
    pub fn record(&mut self, line: LogLine) {
        match line {
            LogLine::TrajectoryStarted(trajectory) => self.trajectories.push(trajectory),
            LogLine::DesignAccepted(design) => self.accepted_designs.push(design),
            LogLine::RunCompleted(end_time) => self.end_time = Some(end_time),
            LogLine::Unmatched => {}
        }
    }

    /// Build a summary from log lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = Self::default();
        for line in lines {
            summary.record(LogLine::classify(line.as_ref()));
        }
        summary
    }

    /// Read a summary from a run log
    pub fn read<R: Read>(reader: R) -> std::io::Result<Self> {
        let mut summary = Self::default();
        for line in std::io::BufReader::new(reader).lines() {
            summary.record(LogLine::classify(&line?));
        }
        Ok(summary)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunLogError {
    #[error("Run log not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read run log {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load and scan the run log at `path`.
pub fn load_run_log(path: impl AsRef<Path>) -> Result<LogSummary, RunLogError> {
    let path = path.as_ref();
    log::debug!("Parsing run log {}", path.display());

    let summary = std::fs::File::open(path)
        .and_then(LogSummary::read)
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => RunLogError::NotFound {
                path: path.to_path_buf(),
            },
            _ => RunLogError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

    log::debug!(
        "Found {} trajectories and {} accepted designs",
        summary.trajectories.len(),
        summary.accepted_designs.len()
    );
    if summary.end_time.is_none() {
        log::warn!("No completion line found in {}", path.display());
    }

    Ok(summary)
}
