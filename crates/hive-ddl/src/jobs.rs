//! Job submission.
//!
//! Generated statements run as jobs on an external job manager. This
//! module builds the job request, submits it and wraps any failure; it
//! never waits for the job to finish.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{BoxError, Result, ServiceError};

/// Who asked for a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Referrer {
    /// Generated by this service.
    #[default]
    Internal,
    /// Typed by a user.
    User,
}

/// Lifecycle state of a job, as reported by the job manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Initialized,
    Running,
    Succeeded,
    Canceled,
    Error,
}

/// A validated job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// Human-readable title.
    pub title: String,
    /// Statement text to run.
    pub sql: String,
    /// Database the statement runs in.
    pub database: String,
    /// Who asked for the job.
    pub referrer: Referrer,
    /// When the request was built.
    pub date_submitted: DateTime<Utc>,
}

impl JobRequest {
    /// Builds an internal job request.
    ///
    /// Title, statement and database must all be non-blank.
    pub fn new(
        title: impl Into<String>,
        sql: impl Into<String>,
        database: impl Into<String>,
    ) -> Result<Self> {
        let request = Self {
            title: title.into(),
            sql: sql.into(),
            database: database.into(),
            referrer: Referrer::Internal,
            date_submitted: Utc::now(),
        };
        for (field, value) in [
            ("title", &request.title),
            ("sql", &request.sql),
            ("database", &request.database),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::InvalidJobRequest(format!("{field} is blank")));
            }
        }
        Ok(request)
    }

    /// Sets the referrer.
    #[must_use]
    pub fn referrer(mut self, referrer: Referrer) -> Self {
        self.referrer = referrer;
        self
    }
}

/// A job accepted by the job manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Identifier assigned by the job manager.
    pub id: String,
    pub title: String,
    pub sql: String,
    pub database: String,
    pub referrer: Referrer,
    pub status: JobStatus,
    pub date_submitted: DateTime<Utc>,
}

impl Job {
    /// Creates the accepted form of `request`.
    #[must_use]
    pub fn accepted(id: impl Into<String>, request: JobRequest) -> Self {
        Self {
            id: id.into(),
            title: request.title,
            sql: request.sql,
            database: request.database,
            referrer: request.referrer,
            status: JobStatus::Initialized,
            date_submitted: request.date_submitted,
        }
    }
}

/// The external job manager.
pub trait JobManager: Send + Sync {
    /// Submits a job. Returns once the job is accepted, not once it runs.
    fn submit(&self, request: JobRequest) -> std::result::Result<Job, BoxError>;
}

/// Builds and submits jobs for generated statements.
#[derive(Clone)]
pub struct JobOrchestrator {
    manager: Arc<dyn JobManager>,
}

impl std::fmt::Debug for JobOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobOrchestrator").finish_non_exhaustive()
    }
}

impl JobOrchestrator {
    /// Creates an orchestrator over `manager`.
    pub fn new(manager: Arc<dyn JobManager>) -> Self {
        Self { manager }
    }

    /// Submits `sql` as an internal job titled `title`, run in `database`.
    ///
    /// Any failure, whether building the request or submitting it, comes
    /// back as [`ServiceError::Submission`] carrying the title and the
    /// statement.
    pub fn submit(&self, sql: &str, title: &str, database: &str) -> Result<Job> {
        info!(title = %title, query = %sql, database = %database, "Creating job");

        let submitted = JobRequest::new(title, sql, database)
            .map_err(BoxError::from)
            .and_then(|request| self.manager.submit(request));

        match submitted {
            Ok(job) => {
                info!(job_id = %job.id, title = %title, "Job submitted");
                Ok(job)
            }
            Err(source) => {
                error!(title = %title, query = %sql, error = %source, "Error submitting job");
                Err(ServiceError::Submission {
                    title: title.to_string(),
                    query: sql.to_string(),
                    source,
                })
            }
        }
    }
}
