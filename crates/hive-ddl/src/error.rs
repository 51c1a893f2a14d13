//! Error types for the DDL service.

use std::time::Duration;

use hive_ddl_core::parser::MetaParseError;

/// Boxed failure raised by an external collaborator (catalog, job manager,
/// results service).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of a [`ServiceError`], for callers that map
/// errors onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A database, table or column does not exist.
    NotFound,
    /// A required generator produced no statement.
    GenerationFailure,
    /// The catalog did not answer within its deadline.
    Timeout,
    /// The catalog channel or a collaborator transport failed.
    TransportFailure,
    /// The job manager rejected a job.
    SubmissionFailure,
    /// Bad input: configuration, job request, describe output.
    Invalid,
}

/// Errors that can occur in the DDL service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Database is not in the catalog.
    #[error("Database '{0}' not found")]
    DatabaseNotFound(String),

    /// Table is not in the database.
    #[error("Table '{table}' not found in database '{database}'")]
    TableNotFound {
        /// Database searched.
        database: String,
        /// Missing table.
        table: String,
    },

    /// No statistics row for the column.
    #[error("Column stats not found for column '{column}' in job {job_id}")]
    ColumnStatsNotFound {
        /// Requested column.
        column: String,
        /// Job whose results were searched.
        job_id: String,
    },

    /// The job produced no result rows.
    #[error("No results for job {job_id}")]
    NoResults {
        /// Job whose results were fetched.
        job_id: String,
    },

    /// A generator produced no statement.
    #[error("{0}")]
    Generation(String),

    /// The catalog did not answer in time.
    #[error("Catalog request for user '{user}' timed out after {bound:?}")]
    Timeout {
        /// User the catalog was fetched for.
        user: String,
        /// Deadline that expired.
        bound: Duration,
    },

    /// A collaborator failed.
    #[error("{operation} failed: {source}")]
    Transport {
        /// What was being done.
        operation: String,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },

    /// The catalog answered with something other than a database listing.
    #[error("Unexpected catalog response for user '{user}': {message}")]
    UnexpectedCatalogResponse {
        /// User the catalog was fetched for.
        user: String,
        /// Description of the response.
        message: String,
    },

    /// The job manager rejected a job.
    #[error("Failed to submit job '{title}': {source}")]
    Submission {
        /// Job title.
        title: String,
        /// Statement the job would have run.
        query: String,
        /// Job manager failure.
        #[source]
        source: BoxError,
    },

    /// A job request is missing required fields.
    #[error("Invalid job request: {0}")]
    InvalidJobRequest(String),

    /// Describe output could not be parsed.
    #[error("Failed to read table properties: {0}")]
    MetaParse(#[from] MetaParseError),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ServiceError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DatabaseNotFound(_)
            | Self::TableNotFound { .. }
            | Self::ColumnStatsNotFound { .. }
            | Self::NoResults { .. } => ErrorKind::NotFound,
            Self::Generation(_) => ErrorKind::GenerationFailure,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Transport { .. } | Self::UnexpectedCatalogResponse { .. } => {
                ErrorKind::TransportFailure
            }
            Self::Submission { .. } => ErrorKind::SubmissionFailure,
            Self::InvalidJobRequest(_) | Self::MetaParse(_) | Self::Config(_) => ErrorKind::Invalid,
        }
    }

    pub(crate) fn transport(operation: impl Into<String>, source: BoxError) -> Self {
        Self::Transport {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ServiceError::DatabaseNotFound("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ServiceError::Timeout {
                user: "u".into(),
                bound: Duration::from_secs(60),
            }
            .kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            ServiceError::Generation("no statement".into()).kind(),
            ErrorKind::GenerationFailure
        );
    }

    #[test]
    fn test_submission_keeps_cause() {
        let err = ServiceError::Submission {
            title: "Create database x".into(),
            query: "CREATE DATABASE `x`".into(),
            source: "queue full".into(),
        };
        assert_eq!(err.to_string(), "Failed to submit job 'Create database x': queue full");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("queue full"));
    }
}
