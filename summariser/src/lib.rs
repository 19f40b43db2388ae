use crate::analyze::{accepted_designs, trajectory_stats};
use crate::frame::{load_final_design_table, load_trajectory_table, StatsError};
use crate::model::{AcceptedDesign, SummaryOutput, TrajectoryStats};
use crate::publish::{Publish, PublishError, HTML_CONTENT_TYPE};
use crate::report::SummaryReport;
use crate::storage::BucketLayout;
use bindcraft_summary_model::{
    load_run_log, load_run_settings, ConfigError, LogSummary, RunLogError, RunSettings,
};
use std::path::{Path, PathBuf};

mod analyze;
pub mod frame;
pub mod model;
pub mod publish;
pub mod report;
pub mod storage;

/// The stage of the summary pipeline that failed
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    RunLog(#[from] RunLogError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("Failed to write summary output to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Inputs of a summary run
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Settings file of the design run
    pub settings_path: PathBuf,
    /// Log written by the design run
    pub log_path: PathBuf,
    /// Directory that the run's design path is resolved against to find the statistics tables
    pub stats_root: PathBuf,
    pub layout: BucketLayout,
    /// Where to write the [SummaryOutput] as JSON, if anywhere
    pub json_output: Option<PathBuf>,
}

/// A rendered summary page together with the statistics it shows
#[derive(Debug, Clone)]
pub struct RenderedSummary {
    pub html: String,
    pub trajectory_stats: TrajectoryStats,
    pub accepted_designs: Vec<AcceptedDesign>,
}

/// Render the summary page of a run.
///
/// Reads `trajectory_stats.csv` and `final_design_stats.csv` from `stats_dir`. Everything else
/// comes from the arguments, so the same inputs always produce the same page.
pub fn render_summary(
    settings: &RunSettings,
    log_summary: &LogSummary,
    layout: &BucketLayout,
    stats_dir: &Path,
) -> Result<RenderedSummary, StatsError> {
    let trajectory_table = load_trajectory_table(stats_dir)?;
    let trajectory_stats = trajectory_stats(&trajectory_table)?;

    let final_design_table = load_final_design_table(stats_dir)?;
    let accepted_designs = accepted_designs(&final_design_table)?;
    if accepted_designs.len() != log_summary.accepted_designs.len() {
        log::warn!(
            "The run log reports {} accepted designs but {} lists {}",
            log_summary.accepted_designs.len(),
            final_design_table.path().display(),
            accepted_designs.len()
        );
    }

    let html = SummaryReport {
        settings,
        log_summary,
        layout,
        trajectory_stats: &trajectory_stats,
        accepted_designs: &accepted_designs,
    }
    .to_string();

    Ok(RenderedSummary {
        html,
        trajectory_stats,
        accepted_designs,
    })
}

/// Run the whole pipeline: read the settings and the run log, render the summary page and
/// publish it to `results/<design_path>/summary.html`.
///
/// The first failure aborts the run. Nothing is published unless rendering succeeded.
pub fn execute_summary<P>(
    options: &SummaryOptions,
    publisher: &mut P,
) -> Result<SummaryOutput, SummaryError>
where
    P: Publish,
{
    let settings = load_run_settings(&options.settings_path)?;
    let design_path = settings.design_path().to_string();
    log::info!(
        "Summarising {} from {}",
        settings.binder_name,
        if design_path.is_empty() { "." } else { design_path.as_str() }
    );

    let log_summary = load_run_log(&options.log_path)?;

    let stats_dir = options.stats_root.join(&design_path);
    let rendered = render_summary(&settings, &log_summary, &options.layout, &stats_dir)?;
    log::debug!("Rendered summary page of {} bytes", rendered.html.len());

    let key = options.layout.summary_key(&design_path);
    let destination = publisher.publish(&key, &rendered.html, HTML_CONTENT_TYPE)?;

    let output = SummaryOutput {
        settings,
        log_summary,
        trajectory_stats: rendered.trajectory_stats,
        accepted_designs: rendered.accepted_designs,
        destination,
    };

    if let Some(path) = &options.json_output {
        write_summary_output(path, &output)?;
    }

    Ok(output)
}

fn write_summary_output(path: &Path, output: &SummaryOutput) -> Result<(), SummaryError> {
    log::debug!("Writing summary output to {}", path.display());
    let file = std::fs::File::create(path).map_err(|source| SummaryError::Output {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::to_writer_pretty(file, output).map_err(|e| SummaryError::Output {
        path: path.to_path_buf(),
        source: e.into(),
    })
}
