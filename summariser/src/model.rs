use bindcraft_summary_model::{LogSummary, RunSettings};
use serde::{Deserialize, Serialize};

/// Mean and best value of one metric column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricStats {
    pub mean: f64,
    pub max: f64,
}

/// Statistics over every trajectory of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrajectoryStats {
    /// Number of rows in the trajectory table
    pub count: usize,
    pub plddt: MetricStats,
    pub ptm: MetricStats,
    pub i_plddt: MetricStats,
}

/// One row of the final design table
///
/// Metrics are `None` when the cell was left empty upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcceptedDesign {
    pub design_name: String,
    pub plddt: Option<f64>,
    pub ptm: Option<f64>,
    pub i_plddt: Option<f64>,
}

/// Everything that went into a published summary page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryOutput {
    pub settings: RunSettings,
    pub log_summary: LogSummary,
    pub trajectory_stats: TrajectoryStats,
    pub accepted_designs: Vec<AcceptedDesign>,
    /// Where the page was published to
    pub destination: String,
}
