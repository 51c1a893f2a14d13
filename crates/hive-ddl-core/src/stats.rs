//! Column statistics extraction from `DESCRIBE FORMATTED <column>` results.
//!
//! The first row of a result set is the header. Its non-empty cells name
//! the statistic found at that index; every later row is a data row whose
//! first cell is a column name.

use serde::{Deserialize, Serialize};

/// Errors raised while extracting column statistics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// The result set has no rows at all.
    #[error("No results for this job")]
    NoResults,

    /// No data row names the requested column.
    #[error("Column stats not found for column '{column}'")]
    ColumnNotFound {
        /// Requested column.
        column: String,
    },
}

/// Statistics of a single column. Absent values stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    pub column_name: Option<String>,
    pub data_type: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub num_nulls: Option<String>,
    pub distinct_count: Option<String>,
    pub avg_col_len: Option<String>,
    pub max_col_len: Option<String>,
    pub num_trues: Option<String>,
    pub num_falses: Option<String>,
    pub comment: Option<String>,
}

/// A statistic a header cell can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    ColumnName,
    DataType,
    Min,
    Max,
    NumNulls,
    DistinctCount,
    AvgColLen,
    MaxColLen,
    NumTrues,
    NumFalses,
    Comment,
}

impl StatField {
    /// Resolves a header cell. Unknown names yield `None`.
    #[must_use]
    pub fn from_header(name: &str) -> Option<Self> {
        let field = match name.trim() {
            "# col_name" | "col_name" => Self::ColumnName,
            "data_type" => Self::DataType,
            "min" => Self::Min,
            "max" => Self::Max,
            "num_nulls" => Self::NumNulls,
            "distinct_count" => Self::DistinctCount,
            "avg_col_len" => Self::AvgColLen,
            "max_col_len" => Self::MaxColLen,
            "num_trues" => Self::NumTrues,
            "num_falses" => Self::NumFalses,
            "comment" => Self::Comment,
            _ => return None,
        };
        Some(field)
    }

    fn slot(self, stats: &mut ColumnStats) -> &mut Option<String> {
        match self {
            Self::ColumnName => &mut stats.column_name,
            Self::DataType => &mut stats.data_type,
            Self::Min => &mut stats.min,
            Self::Max => &mut stats.max,
            Self::NumNulls => &mut stats.num_nulls,
            Self::DistinctCount => &mut stats.distinct_count,
            Self::AvgColLen => &mut stats.avg_col_len,
            Self::MaxColLen => &mut stats.max_col_len,
            Self::NumTrues => &mut stats.num_trues,
            Self::NumFalses => &mut stats.num_falses,
            Self::Comment => &mut stats.comment,
        }
    }
}

/// Resolves the header row into `(index, field)` pairs. Blank and unknown
/// cells are skipped, so indices are not contiguous.
fn resolve_header<S: AsRef<str>>(header: &[S]) -> Vec<(usize, StatField)> {
    header
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| StatField::from_header(cell.as_ref()).map(|f| (i, f)))
        .collect()
}

/// Extracts the statistics of `column` from a result set.
///
/// The first data row whose first cell equals `column` (case-sensitive,
/// after trimming) wins. Cells are trimmed; empty cells are absent.
///
/// The engine pads its cells, so a first cell of `"id "` matches `id`
/// even though the raw text differs.
///
/// # Errors
///
/// Returns [`StatsError::NoResults`] for an empty result set and
/// [`StatsError::ColumnNotFound`] when no data row matches.
pub fn parse_column_stats<R, S>(rows: &[R], column: &str) -> Result<ColumnStats, StatsError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let Some((header, data)) = rows.split_first() else {
        return Err(StatsError::NoResults);
    };
    let fields = resolve_header(header.as_ref());

    let row = data
        .iter()
        .map(AsRef::as_ref)
        .filter(|row| !row.is_empty())
        .find(|row| row[0].as_ref().trim() == column)
        .ok_or_else(|| StatsError::ColumnNotFound {
            column: column.to_string(),
        })?;

    let mut stats = ColumnStats::default();
    for &(index, field) in &fields {
        let value = row
            .get(index)
            .map(|cell| cell.as_ref().trim())
            .filter(|cell| !cell.is_empty());
        if let Some(value) = value {
            *field.slot(&mut stats) = Some(value.to_string());
        }
    }
    Ok(stats)
}
