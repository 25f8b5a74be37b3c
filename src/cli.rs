//! Command-line interface definitions and argument parsing

use crate::explore::ExploreOptions;
use clap::Parser;
use std::path::PathBuf;

/// Exploratory data analysis of an activity-recognition CSV dataset
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "data/dataset.csv")]
    pub input: PathBuf,

    /// Directory the PNG plots are written to
    #[arg(short, long, default_value = "eda_plots")]
    pub output_dir: PathBuf,

    /// Categorical column used for the class distribution
    #[arg(long, default_value = "Activity")]
    pub label_column: String,

    /// Maximum number of numeric columns given a histogram
    #[arg(long, default_value = "5")]
    pub max_features: usize,

    /// Number of rows shown from the top of the dataset
    #[arg(long, default_value = "5")]
    pub head_rows: usize,

    /// Print the text report only, without rendering plots
    #[arg(long)]
    pub no_plots: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Validate the arguments and turn them into exploration options
    pub fn explore_options(&self) -> crate::Result<ExploreOptions> {
        if self.max_features == 0 {
            anyhow::bail!("--max-features must be at least 1");
        }

        let label_column = self.label_column.trim();
        if label_column.is_empty() {
            anyhow::bail!("--label-column must not be empty");
        }

        Ok(ExploreOptions {
            label_column: label_column.to_string(),
            max_features: self.max_features,
            head_rows: self.head_rows,
            output_dir: (!self.no_plots).then(|| self.output_dir.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["activity-eda"]);

        assert_eq!(args.input, PathBuf::from("data/dataset.csv"));
        assert_eq!(args.label_column, "Activity");
        assert_eq!(args.max_features, 5);
        assert!(!args.no_plots);
    }

    #[test]
    fn test_explore_options() {
        let mut args = Args::parse_from([
            "activity-eda",
            "--input",
            "har.csv",
            "--label-column",
            " Label ",
            "--max-features",
            "3",
        ]);

        let options = args.explore_options().unwrap();
        assert_eq!(options.label_column, "Label");
        assert_eq!(options.max_features, 3);
        assert_eq!(options.output_dir, Some(PathBuf::from("eda_plots")));

        args.no_plots = true;
        assert_eq!(args.explore_options().unwrap().output_dir, None);

        args.max_features = 0;
        assert!(args.explore_options().is_err());

        args.max_features = 5;
        args.label_column = "  ".to_string();
        assert!(args.explore_options().is_err());
    }
}
