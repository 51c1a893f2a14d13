//! Collaborators that read back what the engine produced.

use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// Which slice of a result set to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Index of the first row.
    pub offset: usize,
    /// Maximum number of rows. `None` lets the service decide.
    pub limit: Option<usize>,
}

impl Pagination {
    /// The first page, of at most `limit` rows.
    #[must_use]
    pub fn first(limit: Option<usize>) -> Self {
        Self { offset: 0, limit }
    }
}

/// One page of a job's results. Cells are strings; the first row of the
/// first page is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    /// Whether the job produced a result set at all.
    pub has_results: bool,
    /// Rows of string cells.
    pub rows: Vec<Vec<String>>,
}

/// The external results service.
pub trait ResultsService: Send + Sync {
    /// Fetches a page of the results of `job_id`.
    fn fetch(&self, job_id: &str, page: Pagination) -> Result<ResultPage, BoxError>;
}

/// Runs `DESCRIBE FORMATTED` against the engine.
pub trait TableDescriber: Send + Sync {
    /// Returns the describe output rows for `database.table`.
    fn describe_formatted(&self, database: &str, table: &str)
    -> Result<Vec<Vec<String>>, BoxError>;
}
