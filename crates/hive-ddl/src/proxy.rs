//! The DDL service.
//!
//! [`DdlProxy`] is what an API layer calls: it reads the catalog through
//! the [`MetadataGateway`], generates statements with `hive-ddl-core` and
//! hands them to the [`JobOrchestrator`]. Every collaborator is passed in
//! at construction.

use std::sync::Arc;

use hive_ddl_core::operations::DdlOperation;
use hive_ddl_core::parser::TableMetaParser;
use hive_ddl_core::schema::{TableMeta, qualified_name};
use hive_ddl_core::stats::{ColumnStats, StatsError, parse_column_stats};
use tracing::{error, info};

use crate::config::DdlConfig;
use crate::error::{Result, ServiceError};
use crate::gateway::{CatalogSnapshot, MetadataGateway};
use crate::jobs::{Job, JobManager, JobOrchestrator};
use crate::response::{DatabaseResponse, TableResponse};
use crate::results::{Pagination, ResultsService, TableDescriber};

/// DDL operations on behalf of one user.
#[derive(Clone)]
pub struct DdlProxy {
    user: String,
    gateway: MetadataGateway,
    orchestrator: JobOrchestrator,
    results: Arc<dyn ResultsService>,
    describer: Arc<dyn TableDescriber>,
    config: DdlConfig,
}

impl std::fmt::Debug for DdlProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdlProxy")
            .field("user", &self.user)
            .field("gateway", &self.gateway)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DdlProxy {
    /// Creates a proxy for `user` with the default configuration.
    pub fn new(
        user: impl Into<String>,
        gateway: MetadataGateway,
        jobs: Arc<dyn JobManager>,
        results: Arc<dyn ResultsService>,
        describer: Arc<dyn TableDescriber>,
    ) -> Self {
        let user = user.into();
        info!(user = %user, "Creating DDL proxy");
        Self {
            user,
            gateway,
            orchestrator: JobOrchestrator::new(jobs),
            results,
            describer,
            config: DdlConfig::default(),
        }
    }

    /// Applies `config`, including its catalog deadline.
    #[must_use]
    pub fn with_config(mut self, config: DdlConfig) -> Self {
        self.gateway = self.gateway.with_timeout(config.catalog_timeout());
        self.config = config;
        self
    }

    /// Returns the user this proxy acts for.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    // ================================================================
    // Catalog
    // ================================================================

    async fn catalog(&self) -> Result<CatalogSnapshot> {
        self.gateway.fetch_catalog(&self.user).await
    }

    /// Lists databases as `{id, name}`.
    pub async fn list_databases(&self) -> Result<Vec<DatabaseResponse>> {
        let snapshot = self.catalog().await?;
        Ok(snapshot
            .databases()
            .iter()
            .map(DatabaseResponse::summary)
            .collect())
    }

    /// Returns one database with its tables.
    pub async fn get_database(&self, database_id: &str) -> Result<DatabaseResponse> {
        let snapshot = self.catalog().await?;
        snapshot
            .find_database(database_id)
            .map(DatabaseResponse::detailed)
            .ok_or_else(|| ServiceError::DatabaseNotFound(database_id.to_string()))
    }

    /// Lists the tables of a database.
    pub async fn get_tables(&self, database_id: &str) -> Result<Vec<TableResponse>> {
        let snapshot = self.catalog().await?;
        let database = snapshot
            .find_database(database_id)
            .ok_or_else(|| ServiceError::DatabaseNotFound(database_id.to_string()))?;
        Ok(database
            .tables
            .iter()
            .map(|t| TableResponse::new(&database.name, t))
            .collect())
    }

    /// Returns one table of a database.
    pub async fn get_table(&self, database_id: &str, table_name: &str) -> Result<TableResponse> {
        let snapshot = self.catalog().await?;
        let database = snapshot
            .find_database(database_id)
            .ok_or_else(|| ServiceError::DatabaseNotFound(database_id.to_string()))?;
        database
            .find_table(table_name)
            .map(|t| TableResponse::new(&database.name, t))
            .ok_or_else(|| ServiceError::TableNotFound {
                database: database_id.to_string(),
                table: table_name.to_string(),
            })
    }

    /// Reads the engine's current descriptor of a table.
    pub fn table_properties(&self, database: &str, table: &str) -> Result<TableMeta> {
        let rows = self
            .describer
            .describe_formatted(database, table)
            .map_err(|e| {
                error!(database = %database, table = %table, error = %e, "Error describing table");
                ServiceError::transport(
                    format!("describe table {}", qualified_name(database, table)),
                    e,
                )
            })?;
        Ok(TableMetaParser::parse(database, table, &rows)?)
    }

    // ================================================================
    // Tables
    // ================================================================

    /// Generates CREATE TABLE. A blank database on `meta` becomes
    /// `database`.
    pub fn generate_create_table_ddl(&self, database: &str, mut meta: TableMeta) -> Result<String> {
        if meta.database.trim().is_empty() {
            meta.database = database.to_string();
        }
        let name = meta.qualified_name();
        let query = DdlOperation::create_table(meta).to_sql().ok_or_else(|| {
            ServiceError::Generation(format!("Failed to generate create table query for table {name}"))
        })?;
        info!(table = %name, query = %query, "Generated create table query");
        Ok(query)
    }

    /// Same as [`generate_create_table_ddl`](Self::generate_create_table_ddl);
    /// nothing is submitted.
    pub fn preview_create_table_ddl(&self, database: &str, meta: TableMeta) -> Result<String> {
        self.generate_create_table_ddl(database, meta)
    }

    /// Submits CREATE TABLE.
    ///
    /// The title names the table the statement creates; the job runs in
    /// `database`.
    pub fn create_table(&self, database: &str, mut meta: TableMeta) -> Result<Job> {
        if meta.database.trim().is_empty() {
            meta.database = database.to_string();
        }
        let title = format!("Create table {}", meta.qualified_name());
        let query = self.generate_create_table_ddl(database, meta)?;
        self.orchestrator.submit(&query, &title, database)
    }

    /// Generates DROP TABLE.
    pub fn generate_delete_table_ddl(&self, database: &str, table: &str) -> Result<String> {
        let name = qualified_name(database, table);
        let query = DdlOperation::drop_table(database, table)
            .to_sql()
            .ok_or_else(|| {
                ServiceError::Generation(format!("Failed to generate query for delete table {name}"))
            })?;
        info!(table = %name, query = %query, "Deleting table");
        Ok(query)
    }

    /// Submits DROP TABLE.
    pub fn delete_table(&self, database: &str, table: &str) -> Result<Job> {
        let query = self.generate_delete_table_ddl(database, table)?;
        let title = format!("Delete table {}", qualified_name(database, table));
        self.orchestrator.submit(&query, &title, database)
    }

    /// Generates the ALTER statements turning `old` into `new`.
    ///
    /// Two identical descriptors are an error: there is nothing to run.
    pub fn generate_alter_table_query(&self, old: &TableMeta, new: &TableMeta) -> Result<String> {
        DdlOperation::alter_table(old.clone(), new.clone())
            .to_sql()
            .ok_or_else(|| {
                ServiceError::Generation(format!(
                    "Failed to generate alter table query for table {}. No difference was found.",
                    old.qualified_name()
                ))
            })
    }

    /// Submits the ALTER statements turning the engine's current
    /// `database.table` into `new`.
    pub fn alter_table(&self, database: &str, table: &str, mut new: TableMeta) -> Result<Job> {
        let old = self.table_properties(database, table)?;
        if new.database.trim().is_empty() {
            new.database = database.to_string();
        }
        let query = self.generate_alter_table_query(&old, &new)?;
        let title = format!("Alter table {}", qualified_name(database, table));
        self.orchestrator.submit(&query, &title, database)
    }

    /// Submits a rename. The job runs in the old database.
    pub fn rename_table(
        &self,
        old_database: &str,
        old_table: &str,
        new_database: &str,
        new_table: &str,
    ) -> Result<Job> {
        let old_name = qualified_name(old_database, old_table);
        let new_name = qualified_name(new_database, new_table);
        let query = DdlOperation::rename_table(old_database, old_table, new_database, new_table)
            .to_sql()
            .ok_or_else(|| {
                ServiceError::Generation(format!(
                    "Failed to generate rename table query for table {old_name} to {new_name}"
                ))
            })?;
        let title = format!("Rename table {old_name} to {new_name}");
        self.orchestrator.submit(&query, &title, old_database)
    }

    // ================================================================
    // Databases
    // ================================================================

    /// Submits CREATE DATABASE. The job runs in the configured default
    /// database, since the new one does not exist yet.
    pub fn create_database(&self, database: &str) -> Result<Job> {
        let query = DdlOperation::create_database(database)
            .to_sql()
            .ok_or_else(|| {
                ServiceError::Generation(format!(
                    "Failed to generate create database query for database '{database}'"
                ))
            })?;
        let title = format!("Create database {database}");
        self.orchestrator
            .submit(&query, &title, &self.config.default_database)
    }

    /// Submits DROP DATABASE.
    pub fn delete_database(&self, database: &str, cascade: bool) -> Result<Job> {
        let query = DdlOperation::drop_database(database, cascade)
            .to_sql()
            .ok_or_else(|| {
                ServiceError::Generation(format!(
                    "Failed to generate delete database query for database '{database}'"
                ))
            })?;
        let title = format!("Delete database {database}");
        self.orchestrator.submit(&query, &title, database)
    }

    // ================================================================
    // Statistics
    // ================================================================

    /// Submits ANALYZE TABLE, with FOR COLUMNS when `analyze_columns`.
    pub fn analyze_table(&self, database: &str, table: &str, analyze_columns: bool) -> Result<Job> {
        let title = format!("Analyze table {}", qualified_name(database, table));
        let query = DdlOperation::analyze_table(database, table, analyze_columns)
            .to_sql()
            .ok_or_else(|| ServiceError::Generation(format!("Failed to generate job for {title}")))?;
        self.orchestrator.submit(&query, &title, database)
    }

    /// Submits the statement whose results [`fetch_column_stats`](Self::fetch_column_stats)
    /// reads.
    pub fn column_stats_job(&self, database: &str, table: &str, column: &str) -> Result<Job> {
        let operation = DdlOperation::fetch_column_stats(database, table, column);
        let title = operation.title();
        let query = operation
            .to_sql()
            .ok_or_else(|| ServiceError::Generation(format!("Failed to generate job for {title}")))?;
        self.orchestrator.submit(&query, &title, database)
    }

    /// Reads the statistics of `column` from the results of `job_id`.
    pub fn fetch_column_stats(&self, column: &str, job_id: &str) -> Result<ColumnStats> {
        let page = self
            .results
            .fetch(job_id, Pagination::first(self.config.results_page_size))
            .map_err(|e| {
                error!(job_id = %job_id, error = %e, "Error fetching results for column statistics");
                ServiceError::transport(format!("fetch results of job {job_id}"), e)
            })?;

        if !page.has_results {
            return Err(ServiceError::NoResults {
                job_id: job_id.to_string(),
            });
        }

        parse_column_stats(&page.rows, column).map_err(|e| match e {
            StatsError::NoResults => ServiceError::NoResults {
                job_id: job_id.to_string(),
            },
            StatsError::ColumnNotFound { column } => {
                error!(column = %column, job_id = %job_id, "Column stats not found in the fetched results");
                ServiceError::ColumnStatsNotFound {
                    column,
                    job_id: job_id.to_string(),
                }
            }
        })
    }
}
