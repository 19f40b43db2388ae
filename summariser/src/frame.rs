use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-trajectory statistics written by BindCraft
pub const TRAJECTORY_STATS_FILE: &str = "trajectory_stats.csv";
/// Statistics of the designs that passed all filters
pub const FINAL_DESIGN_STATS_FILE: &str = "final_design_stats.csv";

pub const PLDDT: &str = "pLDDT";
pub const PTM: &str = "pTM";
pub const I_PLDDT: &str = "i_pLDDT";
pub const DESIGN_NAME: &str = "Design_Name";

pub const TRAJECTORY_COLUMNS: [&str; 3] = [PLDDT, PTM, I_PLDDT];
pub const FINAL_DESIGN_COLUMNS: [&str; 4] = [DESIGN_NAME, PLDDT, PTM, I_PLDDT];

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Statistics file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("Failed to open statistics file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read statistics file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Unexpected layout of {}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },
    #[error("Statistics file {} has no rows", path.display())]
    EmptyTable { path: PathBuf },
}

/// A CSV statistics table with its required columns checked.
#[derive(Debug, Clone)]
pub struct StatsTable {
    path: PathBuf,
    frame: DataFrame,
}

impl StatsTable {
    /// Load a CSV file with a header row and check that it has all of `required_columns`.
    pub fn load(path: impl AsRef<Path>, required_columns: &[&str]) -> Result<Self, StatsError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Loading statistics from {}", path.display());

        let file = std::fs::File::open(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => StatsError::FileNotFound { path: path.clone() },
            _ => StatsError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|source| StatsError::Read {
                path: path.clone(),
                source,
            })?;

        Self::from_frame(path, frame, required_columns)
    }

    /// Wrap an already loaded frame, checking that it has all of `required_columns`.
    pub fn from_frame(
        path: impl Into<PathBuf>,
        frame: DataFrame,
        required_columns: &[&str],
    ) -> Result<Self, StatsError> {
        let path = path.into();
        for column in required_columns {
            if frame.get_column_index(column).is_none() {
                return Err(StatsError::Schema {
                    path,
                    reason: format!("missing column `{column}`"),
                });
            }
        }

        log::debug!("Loaded {} rows from {}", frame.height(), path.display());
        Ok(Self { path, frame })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// A metric column as `f64` values.
    ///
    /// Integer columns are widened. Text that does not parse as a number is a schema error.
    pub(crate) fn metric(&self, column: &str) -> Result<Series, StatsError> {
        let series = self.series(column)?;
        series
            .strict_cast(&DataType::Float64)
            .map_err(|_| StatsError::Schema {
                path: self.path.clone(),
                reason: format!(
                    "column `{column}` is not numeric (found {})",
                    series.dtype()
                ),
            })
    }

    /// A column as text values
    pub(crate) fn text(&self, column: &str) -> Result<Series, StatsError> {
        self.series(column)?
            .cast(&DataType::String)
            .map_err(|source| self.read_error(source))
    }

    pub(crate) fn read_error(&self, source: PolarsError) -> StatsError {
        StatsError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn series(&self, column: &str) -> Result<&Series, StatsError> {
        self.frame
            .column(column)
            .map(|column| column.as_materialized_series())
            .map_err(|_| StatsError::Schema {
                path: self.path.clone(),
                reason: format!("missing column `{column}`"),
            })
    }
}

/// Load the trajectory table of a run from `stats_dir`.
pub fn load_trajectory_table(stats_dir: &Path) -> Result<StatsTable, StatsError> {
    StatsTable::load(stats_dir.join(TRAJECTORY_STATS_FILE), &TRAJECTORY_COLUMNS)
}

/// Load the final design table of a run from `stats_dir`.
pub fn load_final_design_table(stats_dir: &Path) -> Result<StatsTable, StatsError> {
    StatsTable::load(stats_dir.join(FINAL_DESIGN_STATS_FILE), &FINAL_DESIGN_COLUMNS)
}
