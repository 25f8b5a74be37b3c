//! Descriptive statistics, data-quality checks, correlation and density estimates

use crate::data::NumericColumn;
use ndarray::Array2;
use polars::prelude::*;

/// Number of points the KDE curve is evaluated on
pub const KDE_GRID_SIZE: usize = 200;

/// Summary statistics of one numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Pairwise Pearson correlation between numeric columns
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Bin edges and per-bin counts
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) if !self.counts.is_empty() => {
                (last - first) / self.counts.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Null counts of the columns that have at least one missing value
pub fn missing_values(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .filter(|series| series.null_count() > 0)
        .map(|series| (series.name().to_string(), series.null_count()))
        .collect()
}

/// Count rows that exactly repeat an earlier row
///
/// The first occurrence of a row is not counted. Nulls compare equal to
/// nulls and `-0.0` equals `0.0`.
pub fn duplicate_rows(df: &DataFrame) -> crate::Result<usize> {
    let unique = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    Ok(df.height() - unique.height())
}

/// Compute count, mean, std, min, quartiles and max of a numeric column
///
/// Missing and NaN values are ignored. Quantiles use linear interpolation.
pub fn describe(df: &DataFrame, column: &str) -> crate::Result<ColumnSummary> {
    let x = col(column).cast(DataType::Float64);
    let v = x.clone().filter(x.is_not_nan());

    let stats = df
        .clone()
        .lazy()
        .select([
            v.clone().count().alias("count"),
            v.clone().mean().alias("mean"),
            v.clone().std(1).alias("std"),
            v.clone().min().alias("min"),
            v.clone()
                .quantile(lit(0.25), QuantileInterpolOptions::Linear)
                .alias("q25"),
            v.clone().median().alias("median"),
            v.clone()
                .quantile(lit(0.75), QuantileInterpolOptions::Linear)
                .alias("q75"),
            v.max().alias("max"),
        ])
        .collect()?;

    let value = |name: &str| -> crate::Result<f64> {
        Ok(stats
            .column(name)?
            .cast(&DataType::Float64)?
            .f64()?
            .get(0)
            .unwrap_or(f64::NAN))
    };

    Ok(ColumnSummary {
        name: column.to_string(),
        count: value("count")? as usize,
        mean: value("mean")?,
        std: value("std")?,
        min: value("min")?,
        q25: value("q25")?,
        median: value("median")?,
        q75: value("q75")?,
        max: value("max")?,
    })
}

/// Summary statistics as a printable table, one row per statistic
///
/// With numeric columns the rows are count, mean, std, min, quartiles and
/// max of each numeric column. A table without numeric columns is described
/// by count, unique, top and freq of every column instead.
pub fn summary_frame(df: &DataFrame, columns: &[NumericColumn]) -> crate::Result<DataFrame> {
    if columns.is_empty() {
        return categorical_summary_frame(df);
    }

    let labels = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    let mut series = vec![Series::new("statistic", &labels)];

    for column in columns {
        let s = describe(df, &column.name)?;
        let values = vec![
            s.count as f64,
            s.mean,
            s.std,
            s.min,
            s.q25,
            s.median,
            s.q75,
            s.max,
        ];
        series.push(Series::new(&s.name, values));
    }

    Ok(DataFrame::new(series)?)
}

fn categorical_summary_frame(df: &DataFrame) -> crate::Result<DataFrame> {
    let labels = ["count", "unique", "top", "freq"];
    let mut series = vec![Series::new("statistic", &labels)];

    for column in df.get_column_names() {
        let counts = value_counts(df, column)?;
        let non_null = df.height() - df.column(column)?.null_count();
        let (top, freq) = match counts.first() {
            Some((label, freq)) => (label.clone(), freq.to_string()),
            None => (String::new(), String::new()),
        };
        let values = vec![non_null.to_string(), counts.len().to_string(), top, freq];
        series.push(Series::new(column, values));
    }

    Ok(DataFrame::new(series)?)
}

/// Count occurrences of each label in `column`
///
/// Sorted by descending count; ties keep the order of first appearance.
/// Missing labels are not counted.
pub fn value_counts(df: &DataFrame, column: &str) -> crate::Result<Vec<(String, usize)>> {
    let mut counts = labels_in_appearance_order(df, column)?;
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}

/// Label counts in the order each label first appears in the table
pub fn labels_in_appearance_order(
    df: &DataFrame,
    column: &str,
) -> crate::Result<Vec<(String, usize)>> {
    const LABEL: &str = "__label";
    const COUNT: &str = "__count";

    let grouped = df
        .clone()
        .lazy()
        .select([col(column).cast(DataType::String).alias(LABEL)])
        .filter(col(LABEL).is_not_null())
        .group_by_stable([col(LABEL)])
        .agg([len().alias(COUNT)])
        .collect()?;

    let labels = grouped.column(LABEL)?.str()?;
    let counts = grouped.column(COUNT)?.cast(&DataType::UInt64)?;

    let pairs = labels
        .into_iter()
        .zip(counts.u64()?.into_iter())
        .filter_map(|(label, count)| Some((label?.to_string(), count? as usize)))
        .collect();

    Ok(pairs)
}

/// Pearson correlation of every pair of columns
///
/// Each pair uses only the rows where both values are present. A pair with
/// fewer than two complete rows or zero variance yields NaN, the diagonal
/// included.
pub fn correlation_matrix(columns: &[NumericColumn]) -> CorrelationMatrix {
    let n = columns.len();
    let mut values = Array2::from_elem((n, n), f64::NAN);

    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i].values, &columns[j].values);
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }

    CorrelationMatrix {
        names: columns.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}

fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }

    (cov / denom).clamp(-1.0, 1.0)
}

/// Bin edges chosen with numpy's `"auto"` rule
///
/// Uses the smaller of the Sturges and Freedman-Diaconis bin widths, falling
/// back to Sturges when the interquartile range is zero. A constant sample
/// gets a single bin of width 1 centred on the value.
pub fn auto_bin_edges(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return vec![0.0, 1.0];
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    if first == last {
        return vec![first - 0.5, last + 0.5];
    }

    let n = sorted.len() as f64;
    let range = last - first;
    let sturges = range / (n.log2() + 1.0);
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);

    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let bins = ((range / width).ceil() as usize).max(1);

    linspace(first, last, bins + 1)
}

/// Histogram of `values` over [`auto_bin_edges`]
///
/// Every bin is half-open except the last, which includes its right edge.
/// Fails when a value is infinite, as no finite range covers it.
pub fn histogram(values: &[f64]) -> crate::Result<Histogram> {
    if values.iter().any(|v| v.is_infinite()) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        anyhow::bail!("autodetected range of [{}, {}] is not finite", min, max);
    }

    let edges = auto_bin_edges(values);
    let bins = edges.len() - 1;
    let mut counts = vec![0; bins];

    let first = edges[0];
    let last = edges[bins];
    let width = (last - first) / bins as f64;

    for &v in values {
        if v < first || v > last {
            continue;
        }
        let bin = (((v - first) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Ok(Histogram { edges, counts })
}

/// Gaussian kernel density estimate with Scott's bandwidth
///
/// Evaluated on [`KDE_GRID_SIZE`] points spanning the data range. The density
/// is multiplied by `scale` (sample size times bin width to overlay counts).
/// Returns `None` when fewer than two values are given or they have no spread.
pub fn kde(values: &[f64], scale: f64) -> Option<Vec<(f64, f64)>> {
    if values.len() < 2 {
        return None;
    }

    let (_, std) = mean_and_std(values);
    if std.is_nan() || std <= 0.0 {
        return None;
    }

    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let curve = linspace(min, max, KDE_GRID_SIZE)
        .into_iter()
        .map(|x| {
            let density: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect();

    Some(curve)
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, f64::NAN);
    }

    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// Linear-interpolation quantile of an ascending slice
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        len => {
            let pos = q * (len - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let frac = pos - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    if points < 2 {
        return vec![start];
    }
    let step = (end - start) / (points - 1) as f64;
    (0..points)
        .map(|i| if i == points - 1 { end } else { start + step * i as f64 })
        .collect()
}
