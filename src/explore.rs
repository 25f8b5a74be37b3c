//! The exploration procedure: load, report, plot

use crate::data::{self, ColumnInfo, NumericColumn};
use crate::stats::{self, CorrelationMatrix};
use crate::viz;
use polars::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Knobs for a single exploration run
#[derive(Debug, Clone)]
pub struct ExploreOptions {
    /// Categorical column whose class distribution is reported
    pub label_column: String,
    /// Upper bound on the number of numeric columns given a histogram
    pub max_features: usize,
    /// Rows printed from the top of the table
    pub head_rows: usize,
    /// Where plots are written; `None` disables rendering
    pub output_dir: Option<PathBuf>,
}

impl Default for ExploreOptions {
    fn default() -> Self {
        Self {
            label_column: "Activity".to_string(),
            max_features: 5,
            head_rows: 5,
            output_dir: Some(PathBuf::from("eda_plots")),
        }
    }
}

/// Everything the exploration prints, computed once from the table
#[derive(Debug, Clone)]
pub struct ExplorationReport {
    /// (rows, columns)
    pub shape: (usize, usize),
    pub missing: Vec<(String, usize)>,
    pub duplicate_rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub estimated_size: usize,
    pub summary: DataFrame,
    /// Class counts sorted by descending count; `None` without a label column
    pub class_distribution: Option<Vec<(String, usize)>>,
    /// Class counts in order of first appearance, the bar order of the chart
    pub class_appearance: Option<Vec<(String, usize)>>,
    /// `None` when the table has no numeric column
    pub correlation: Option<CorrelationMatrix>,
    /// Numeric columns selected for histograms
    pub feature_columns: Vec<NumericColumn>,
}

impl ExplorationReport {
    /// Compute every diagnostic for `df`
    pub fn build(df: &DataFrame, options: &ExploreOptions) -> crate::Result<Self> {
        let numeric = data::numeric_columns(df)?;
        log::debug!("{} numeric columns out of {}", numeric.len(), df.width());

        let has_labels = df
            .get_column_names()
            .iter()
            .any(|name| *name == options.label_column.as_str());

        let (class_distribution, class_appearance) = if has_labels {
            (
                Some(stats::value_counts(df, &options.label_column)?),
                Some(stats::labels_in_appearance_order(
                    df,
                    &options.label_column,
                )?),
            )
        } else {
            log::debug!(
                "Column '{}' not present, skipping class distribution",
                options.label_column
            );
            (None, None)
        };

        let correlation = if numeric.is_empty() {
            None
        } else {
            Some(stats::correlation_matrix(&numeric))
        };

        let feature_columns = numeric
            .iter()
            .take(options.max_features)
            .cloned()
            .collect();

        Ok(Self {
            shape: df.shape(),
            missing: stats::missing_values(df),
            duplicate_rows: stats::duplicate_rows(df)?,
            columns: data::column_info(df),
            estimated_size: df.estimated_size(),
            summary: stats::summary_frame(df, &numeric)?,
            class_distribution,
            class_appearance,
            correlation,
            feature_columns,
        })
    }

    /// Sum of all class counts, zero without a label column
    pub fn labelled_rows(&self) -> usize {
        self.class_distribution
            .iter()
            .flatten()
            .map(|(_, count)| count)
            .sum()
    }
}

/// Explore an activity-recognition CSV, reporting on standard output
///
/// Prints shape, head rows, missing values, duplicates, schema information and
/// summary statistics, then the class distribution when the label column is
/// present, and renders the class chart, the correlation heatmap and the
/// feature histograms.
///
/// # Arguments
/// * `data_path` - Path to the dataset CSV file
/// * `options` - Label column, histogram cap, head size and plot directory
///
/// # Returns
/// * The table exactly as read from disk
pub fn explore_activity_data(
    data_path: impl AsRef<Path>,
    options: &ExploreOptions,
) -> crate::Result<DataFrame> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_exploration(data_path, options, &mut out)
}

/// Run the exploration, writing the text report to `out`
pub fn write_exploration<W: Write>(
    data_path: impl AsRef<Path>,
    options: &ExploreOptions,
    out: &mut W,
) -> crate::Result<DataFrame> {
    let data_path = data_path.as_ref();
    let start_time = Instant::now();
    writeln!(out, "Starting Data Exploration...")?;

    writeln!(out, "\n=== Step 1: Loading and Initial Inspection ===")?;
    let df = data::load_dataset(data_path)?;
    let report = ExplorationReport::build(&df, options)?;

    writeln!(out, "Dataset loaded with shape: {:?}", report.shape)?;
    writeln!(out, "\nFirst few rows of the dataset:")?;
    writeln!(out, "{}", df.head(Some(options.head_rows)))?;

    writeln!(out, "\n=== Step 2: Data Quality Analysis ===")?;
    write_missing_values(out, &report)?;
    writeln!(out, "\nNumber of duplicate rows: {}", report.duplicate_rows)?;
    writeln!(out, "\nDataset Information:")?;
    write_info(out, &report)?;

    writeln!(out, "\n=== Step 3: Statistical Analysis ===")?;
    writeln!(out, "\nSummary Statistics:")?;
    writeln!(out, "{}", report.summary)?;

    let mut plots = Vec::new();
    let output_dir = options.output_dir.as_deref();

    if let Some(distribution) = &report.class_distribution {
        writeln!(out, "\n=== Step 4: Activity Distribution ===")?;
        writeln!(out, "\nClass Distribution:")?;
        write_class_distribution(out, &options.label_column, distribution)?;

        if let (Some(dir), Some(appearance)) = (output_dir, &report.class_appearance) {
            if !appearance.is_empty() {
                let path = prepare_output(dir, viz::CLASS_DISTRIBUTION_FILE)?;
                viz::create_class_distribution_chart(appearance, &path)?;
                plots.push(path);
            }
        }
    }

    writeln!(out, "\n=== Step 5: Feature Analysis ===")?;
    match (&report.correlation, output_dir) {
        (Some(matrix), Some(dir)) => {
            let path = prepare_output(dir, viz::CORRELATION_HEATMAP_FILE)?;
            viz::create_correlation_heatmap(matrix, &path)?;
            plots.push(path);
        }
        (None, _) => log::warn!("No numeric columns, skipping correlation heatmap"),
        (Some(_), None) => {}
    }

    writeln!(out, "\n=== Step 6: Feature Distributions ===")?;
    match (report.feature_columns.is_empty(), output_dir) {
        (false, Some(dir)) => {
            let path = prepare_output(dir, viz::FEATURE_DISTRIBUTIONS_FILE)?;
            viz::create_feature_distributions(&report.feature_columns, &path)?;
            plots.push(path);
        }
        (true, _) => log::warn!("No numeric columns, skipping feature distributions"),
        (false, None) => {}
    }

    for path in &plots {
        writeln!(out, "Plot saved to: {}", path.display())?;
    }
    log::info!(
        "Exploration finished in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(df)
}

fn prepare_output(dir: &Path, file_name: &str) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.join(file_name))
}

fn write_missing_values<W: Write>(out: &mut W, report: &ExplorationReport) -> io::Result<()> {
    writeln!(out, "\nMissing Values Summary:")?;
    if report.missing.is_empty() {
        return writeln!(out, "No missing values found");
    }

    let width = name_width(report.missing.iter().map(|(name, _)| name.as_str()));
    for (name, count) in &report.missing {
        writeln!(out, "{:<width$}  {}", name, count, width = width)?;
    }
    Ok(())
}

fn write_info<W: Write>(out: &mut W, report: &ExplorationReport) -> io::Result<()> {
    let (rows, cols) = report.shape;
    writeln!(out, "RangeIndex: {} entries, 0 to {}", rows, rows.saturating_sub(1))?;
    writeln!(out, "Data columns (total {} columns):", cols)?;

    let width = name_width(report.columns.iter().map(|c| c.name.as_str())).max("Column".len());
    writeln!(
        out,
        " {:>3}  {:<width$}  {:<14}  {}",
        "#",
        "Column",
        "Non-Null Count",
        "Dtype",
        width = width
    )?;
    for info in &report.columns {
        writeln!(
            out,
            " {:>3}  {:<width$}  {:<14}  {}",
            info.position,
            info.name,
            format!("{} non-null", info.non_null),
            info.dtype,
            width = width
        )?;
    }

    let mut dtype_counts: Vec<(&str, usize)> = Vec::new();
    for info in &report.columns {
        match dtype_counts.iter_mut().find(|(d, _)| *d == info.dtype) {
            Some(entry) => entry.1 += 1,
            None => dtype_counts.push((info.dtype.as_str(), 1)),
        }
    }
    let dtypes: Vec<String> = dtype_counts
        .iter()
        .map(|(dtype, count)| format!("{}({})", dtype, count))
        .collect();
    writeln!(out, "dtypes: {}", dtypes.join(", "))?;
    writeln!(out, "memory usage: {}", format_bytes(report.estimated_size))
}

fn write_class_distribution<W: Write>(
    out: &mut W,
    label_column: &str,
    distribution: &[(String, usize)],
) -> io::Result<()> {
    let width = name_width(distribution.iter().map(|(label, _)| label.as_str()))
        .max(label_column.len());
    writeln!(out, "{:<width$}", label_column, width = width)?;
    for (label, count) in distribution {
        writeln!(out, "{:<width$}  {}", label, count, width = width)?;
    }
    Ok(())
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0)
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["bytes", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} bytes", bytes)
    } else {
        format!("{:.1}+ {}", size, UNITS[unit])
    }
}
