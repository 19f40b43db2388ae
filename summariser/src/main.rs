use anyhow::Context;
use bindcraft_summariser::execute_summary;
use bindcraft_summariser::publish::{FilePublisher, GcsPublisher};
use clap::Parser as _;

mod cli;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    env_logger::try_init()?;

    let args = cli::CliArgs::try_parse()?;
    log::info!("{CRATE_NAME} {CRATE_VERSION}");
    log::info!("Using settings file: {}", args.settings.display());
    log::info!("Using run log: {}", args.log.display());

    let options = args.summary_options();
    let output = match &args.local_dir {
        Some(dir) => {
            log::debug!("Publishing to local directory {}", dir.display());
            execute_summary(&options, &mut FilePublisher::new(dir))
        }
        None => execute_summary(
            &options,
            &mut GcsPublisher::new(args.layout(), args.access_token.clone()),
        ),
    }
    .context("Failed to generate the summary page")?;

    println!("Summary page uploaded to {}", output.destination);

    Ok(())
}
