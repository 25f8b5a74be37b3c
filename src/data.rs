//! Data loading and column extraction using Polars

use anyhow::Context;
use polars::prelude::*;
use std::path::Path;

/// Strings read as missing values, matching the markers pandas treats as NaN
pub const DEFAULT_NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A numeric column converted to `f64`, one entry per table row
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    /// `None` for missing cells
    pub values: Vec<Option<f64>>,
}

impl NumericColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Present, non-NaN values in row order
    pub fn observed(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|v| *v)
            .filter(|v| !v.is_nan())
            .collect()
    }
}

/// Schema line for one column, as shown in the dataset information block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub position: usize,
    pub name: String,
    pub non_null: usize,
    pub dtype: String,
}

/// Load a CSV file with a header row into a `DataFrame`
///
/// The schema is inferred from every row and the usual missing-value markers
/// (`NA`, `NaN`, `null`, ...) are read as nulls.
///
/// # Arguments
/// * `file_path` - Path to the CSV file
///
/// # Returns
/// * The parsed table, unmodified
pub fn load_dataset(file_path: impl AsRef<Path>) -> crate::Result<DataFrame> {
    let path = file_path.as_ref();
    log::debug!("Reading CSV from {}", path.display());

    let null_values = NullValues::AllColumns(
        DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
    );

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("failed to parse {} as CSV", path.display()))?;

    log::debug!("Parsed {} rows x {} columns", df.height(), df.width());
    Ok(df)
}

/// Extract every numeric (integer or float) column, in table order
pub fn numeric_columns(df: &DataFrame) -> crate::Result<Vec<NumericColumn>> {
    let mut columns = Vec::new();

    for series in df.get_columns() {
        if !series.dtype().is_numeric() {
            continue;
        }

        let values: Vec<Option<f64>> = series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .collect();

        columns.push(NumericColumn::new(series.name(), values));
    }

    Ok(columns)
}

/// Position, name, non-null count and dtype of every column
pub fn column_info(df: &DataFrame) -> Vec<ColumnInfo> {
    let height = df.height();
    df.get_columns()
        .iter()
        .enumerate()
        .map(|(position, series)| ColumnInfo {
            position,
            name: series.name().to_string(),
            non_null: height - series.null_count(),
            dtype: series.dtype().to_string(),
        })
        .collect()
}
