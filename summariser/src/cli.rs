use std::path::PathBuf;

use bindcraft_summariser::storage::{BucketLayout, DEFAULT_BUCKET, DEFAULT_STORAGE_HOST};
use bindcraft_summariser::SummaryOptions;
use clap::Parser;

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Path to the settings file of the design run.
    #[arg(long, default_value = "settings_target/cas12a_small.json")]
    pub settings: PathBuf,

    /// Path to the log written by the design run.
    #[arg(long, default_value = "bindcraft.log")]
    pub log: PathBuf,

    /// Directory that the design path from the settings is resolved against.
    #[arg(long, default_value = ".")]
    pub stats_root: PathBuf,

    /// Bucket to publish the summary page to.
    #[arg(long, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// Host that serves public links to the bucket.
    #[arg(long, default_value = DEFAULT_STORAGE_HOST)]
    pub storage_host: String,

    /// OAuth access token for uploads to Cloud Storage.
    #[arg(long, env = "GCS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Write the summary page beneath this directory instead of uploading it.
    #[arg(long, value_name = "PATH")]
    pub local_dir: Option<PathBuf>,

    /// Also write the summarised data as JSON to this file.
    #[arg(long, value_name = "PATH")]
    pub json_output: Option<PathBuf>,
}

impl CliArgs {
    pub fn layout(&self) -> BucketLayout {
        BucketLayout::new(&self.storage_host, &self.bucket)
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            settings_path: self.settings.clone(),
            log_path: self.log.clone(),
            stats_root: self.stats_root.clone(),
            layout: self.layout(),
            json_output: self.json_output.clone(),
        }
    }
}
