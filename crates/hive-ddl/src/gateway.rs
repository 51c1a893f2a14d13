//! Bounded-time catalog access.

use std::time::{Duration, Instant};

use hive_ddl_core::schema::{DatabaseInfo, TableInfo};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::catalog::{CatalogEnvelope, CatalogRequest, CatalogResponse};
use crate::config::DEFAULT_CATALOG_TIMEOUT_SECS;
use crate::error::{Result, ServiceError};

/// The databases and tables observed by one catalog fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    databases: Vec<DatabaseInfo>,
}

impl CatalogSnapshot {
    /// Wraps a listing.
    #[must_use]
    pub fn new(databases: Vec<DatabaseInfo>) -> Self {
        Self { databases }
    }

    /// Returns every database in listing order.
    #[must_use]
    pub fn databases(&self) -> &[DatabaseInfo] {
        &self.databases
    }

    /// Finds a database by name, case-insensitively. First match wins.
    #[must_use]
    pub fn find_database(&self, name: &str) -> Option<&DatabaseInfo> {
        self.databases
            .iter()
            .find(|db| db.name.eq_ignore_ascii_case(name))
    }

    /// Finds a table, case-insensitively on both names.
    #[must_use]
    pub fn find_table(&self, database: &str, table: &str) -> Option<&TableInfo> {
        self.find_database(database)?.find_table(table)
    }

    /// Consumes the snapshot.
    #[must_use]
    pub fn into_databases(self) -> Vec<DatabaseInfo> {
        self.databases
    }
}

/// Fetches catalog snapshots over a channel with a fixed deadline.
///
/// Every fetch is independent: there is no caching, no retry and no
/// sharing of in-flight requests between callers.
#[derive(Debug, Clone)]
pub struct MetadataGateway {
    sender: mpsc::Sender<CatalogEnvelope>,
    timeout: Duration,
}

impl MetadataGateway {
    /// Creates a gateway with the default 60 second deadline.
    #[must_use]
    pub fn new(sender: mpsc::Sender<CatalogEnvelope>) -> Self {
        Self {
            sender,
            timeout: Duration::from_secs(DEFAULT_CATALOG_TIMEOUT_SECS),
        }
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the deadline.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches every database and table visible to `user`.
    ///
    /// The whole exchange, including queueing the request, must finish
    /// within the deadline.
    pub async fn fetch_catalog(&self, user: &str) -> Result<CatalogSnapshot> {
        let request = CatalogRequest::ListDatabases {
            user: user.to_string(),
        };
        let operation = request.operation();
        let started = Instant::now();
        let (reply, receiver) = oneshot::channel();

        let exchange = async {
            self.sender
                .send(CatalogEnvelope { request, reply })
                .await
                .map_err(|_| ServiceError::transport(operation, "catalog channel closed".into()))?;
            receiver.await.map_err(|_| {
                ServiceError::transport(operation, "catalog dropped the request".into())
            })
        };

        let response = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(
                    user = %user,
                    operation,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Catalog request failed"
                );
                return Err(e);
            }
            Err(_) => {
                error!(
                    user = %user,
                    operation,
                    bound_secs = self.timeout.as_secs_f64(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Catalog request timed out"
                );
                return Err(ServiceError::Timeout {
                    user: user.to_string(),
                    bound: self.timeout,
                });
            }
        };

        match response {
            CatalogResponse::Databases(databases) => {
                debug!(
                    user = %user,
                    databases = databases.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Fetched catalog"
                );
                Ok(CatalogSnapshot::new(databases))
            }
            CatalogResponse::Failure(message) => {
                error!(user = %user, operation, error = %message, "Catalog reported a failure");
                Err(ServiceError::transport(operation, message.into()))
            }
            CatalogResponse::Unrecognized(message) => {
                error!(user = %user, operation, response = %message, "Unexpected catalog response");
                Err(ServiceError::UnexpectedCatalogResponse {
                    user: user.to_string(),
                    message,
                })
            }
        }
    }
}
