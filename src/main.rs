//! activity-eda: exploratory data analysis CLI
//!
//! Parses arguments, sets up logging and runs the exploration procedure.

use activity_eda::{explore_activity_data, Args};
use anyhow::Result;
use clap::Parser;
use env_logger::Env;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let options = args.explore_options()?;
    log::debug!("Options: {:?}", options);

    let data = explore_activity_data(&args.input, &options)?;
    log::info!(
        "Explored {} rows x {} columns from {}",
        data.height(),
        data.width(),
        args.input.display()
    );

    Ok(())
}
