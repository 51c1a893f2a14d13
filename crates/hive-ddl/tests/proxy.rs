//! Integration tests for the DDL proxy over in-process collaborators.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use hive_ddl::prelude::*;
use tokio_test::{assert_err, assert_ok};

// =============================================================================
// Catalog lookups
// =============================================================================

#[tokio::test]
async fn test_list_databases() {
    let h = common::harness();
    let databases = assert_ok!(h.proxy.list_databases().await);

    let names: Vec<&str> = databases.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["default", "sales"]);
    assert!(databases.iter().all(|d| d.tables.is_none()));
}

#[tokio::test]
async fn test_get_database_is_case_insensitive() {
    let h = common::harness();
    let database = assert_ok!(h.proxy.get_database("SALES").await);

    assert_eq!(database.id, "sales");
    assert_eq!(database.tables.map(|t| t.len()), Some(3));
}

#[tokio::test]
async fn test_missing_database() {
    let h = common::harness();
    let err = assert_err!(h.proxy.get_database("hr").await);

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Database 'hr' not found");
}

#[tokio::test]
async fn test_get_tables_and_table() {
    let h = common::harness();

    let tables = assert_ok!(h.proxy.get_tables("sales").await);
    assert_eq!(tables.len(), 3);
    assert_eq!(tables[0].id, "sales/orders");

    let refunds = assert_ok!(h.proxy.get_table("Sales", "refunds").await);
    assert_eq!(refunds.name, "Refunds");
    assert_eq!(refunds.table_type, TableType::External);
    assert_eq!(refunds.database_id, "sales");

    let err = assert_err!(h.proxy.get_table("sales", "customers").await);
    assert!(matches!(err, ServiceError::TableNotFound { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_catalog_timeout() {
    let proxy = DdlProxy::new(
        "bob",
        MetadataGateway::new(common::silent_catalog()),
        Arc::new(common::RecordingJobs::default()),
        Arc::new(common::BrokenResults),
        Arc::new(common::FixedDescriber(Vec::new())),
    )
    .with_config(DdlConfig {
        catalog_timeout_secs: 5,
        ..DdlConfig::default()
    });

    let err = assert_err!(proxy.list_databases().await);
    match err {
        ServiceError::Timeout { user, bound } => {
            assert_eq!(user, "bob");
            assert_eq!(bound, Duration::from_secs(5));
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blocking_catalog_still_times_out() {
    let (sender, _actor) = spawn_catalog_actor(common::BlockingCatalog(Duration::from_millis(800)));
    let proxy = DdlProxy::new(
        "carol",
        MetadataGateway::new(sender).with_timeout(Duration::from_millis(100)),
        Arc::new(common::RecordingJobs::default()),
        Arc::new(common::BrokenResults),
        Arc::new(common::FixedDescriber(Vec::new())),
    );

    let started = Instant::now();
    let err = assert_err!(proxy.list_databases().await);
    assert!(started.elapsed() < Duration::from_millis(700));
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(matches!(err, ServiceError::Timeout { user, .. } if user == "carol"));
}

// =============================================================================
// Statement generation and submission
// =============================================================================

#[tokio::test]
async fn test_preview_defaults_database() {
    let h = common::harness();
    let meta = TableMeta::new("", "customers").column(ColumnInfo::new("id", "bigint"));

    let sql = assert_ok!(h.proxy.preview_create_table_ddl("crm", meta));
    assert!(sql.starts_with("CREATE TABLE `crm`.`customers` ("));
    assert_eq!(h.jobs.count(), 0);
}

#[tokio::test]
async fn test_create_table_without_columns_fails() {
    let h = common::harness();
    let err = assert_err!(h.proxy.create_table("crm", TableMeta::new("", "empty")));

    assert_eq!(err.kind(), ErrorKind::GenerationFailure);
    assert!(err.to_string().contains("crm.empty"));
    assert_eq!(h.jobs.count(), 0);
}

#[tokio::test]
async fn test_create_and_delete_table_jobs() {
    let h = common::harness();
    let meta = TableMeta::new("", "customers").column(ColumnInfo::new("id", "bigint"));

    let job = assert_ok!(h.proxy.create_table("crm", meta));
    assert_eq!(job.title, "Create table crm.customers");
    assert_eq!(job.database, "crm");
    assert_eq!(job.referrer, Referrer::Internal);

    assert_ok!(h.proxy.delete_table("crm", "customers"));
    let request = h.jobs.last();
    assert_eq!(request.title, "Delete table crm.customers");
    assert_eq!(request.sql, "DROP TABLE `crm`.`customers`");
}

#[tokio::test]
async fn test_create_table_title_follows_descriptor_database() {
    let h = common::harness();
    let meta = TableMeta::new("marketing", "leads").column(ColumnInfo::new("id", "bigint"));

    let job = assert_ok!(h.proxy.create_table("crm", meta));
    assert_eq!(job.title, "Create table marketing.leads");
    assert_eq!(job.database, "crm");
    assert!(h.jobs.last().sql.starts_with("CREATE TABLE `marketing`.`leads` ("));
}

#[tokio::test]
async fn test_rename_failure_names_both_tables() {
    let h = common::harness();
    let err = assert_err!(h.proxy.rename_table("sales", "orders", "archive", ""));

    assert_eq!(err.kind(), ErrorKind::GenerationFailure);
    let message = err.to_string();
    assert!(message.contains("sales.orders"));
    assert!(message.contains("archive."));
}

#[tokio::test]
async fn test_rename_runs_in_old_database() {
    let h = common::harness();
    let job = assert_ok!(h.proxy.rename_table("sales", "orders", "archive", "orders_2023"));

    assert_eq!(job.title, "Rename table sales.orders to archive.orders_2023");
    assert_eq!(job.database, "sales");
    assert_eq!(
        job.sql,
        "ALTER TABLE `sales`.`orders` RENAME TO `archive`.`orders_2023`"
    );
}

#[tokio::test]
async fn test_database_jobs() {
    let h = common::harness();

    let job = assert_ok!(h.proxy.create_database("staging"));
    assert_eq!(job.title, "Create database staging");
    assert_eq!(job.database, "default");

    let job = assert_ok!(h.proxy.delete_database("staging", true));
    assert_eq!(job.title, "Delete database staging");
    assert_eq!(job.sql, "DROP DATABASE `staging` CASCADE");
    assert_eq!(job.database, "staging");
}

#[tokio::test]
async fn test_alter_table_reads_current_definition() {
    let h = common::harness();
    let wanted = TableMeta::new("", "orders")
        .column(ColumnInfo::new("id", "bigint"))
        .column(ColumnInfo::new("total", "decimal(10,2)"))
        .stored_as("ORC");

    let job = assert_ok!(h.proxy.alter_table("sales", "orders", wanted));
    assert_eq!(job.title, "Alter table sales.orders");
    assert_eq!(
        job.sql,
        "ALTER TABLE `sales`.`orders` CHANGE COLUMN `amount` `total` decimal(10,2)"
    );
}

#[tokio::test]
async fn test_alter_without_changes_is_an_error() {
    let h = common::harness();
    let current = assert_ok!(h.proxy.table_properties("sales", "orders"));

    let err = assert_err!(h.proxy.generate_alter_table_query(&current, &current));
    assert_eq!(err.kind(), ErrorKind::GenerationFailure);
    assert!(err.to_string().contains("No difference was found"));
}

#[tokio::test]
async fn test_analyze_and_column_stats_jobs() {
    let h = common::harness();

    let job = assert_ok!(h.proxy.analyze_table("sales", "orders", true));
    assert_eq!(job.title, "Analyze table sales.orders");
    assert_eq!(
        job.sql,
        "ANALYZE TABLE `sales`.`orders` COMPUTE STATISTICS FOR COLUMNS"
    );

    let job = assert_ok!(h.proxy.column_stats_job("sales", "orders", "amount"));
    assert_eq!(job.title, "Fetch column stats for sales.orders.amount");
    assert_eq!(job.sql, "DESCRIBE FORMATTED `sales`.`orders` `amount`");
}

// =============================================================================
// Column statistics
// =============================================================================

fn stats_page() -> ResultPage {
    ResultPage {
        has_results: true,
        rows: common::rows(&[
            &["# col_name", "data_type", "min", "max"],
            &["age", "int", "0", "99"],
        ]),
    }
}

#[tokio::test]
async fn test_fetch_column_stats() {
    let h = common::harness_with(stats_page(), Duration::from_secs(60));
    let stats = assert_ok!(h.proxy.fetch_column_stats("age", "7"));

    assert_eq!(stats.column_name.as_deref(), Some("age"));
    assert_eq!(stats.data_type.as_deref(), Some("int"));
    assert_eq!(stats.min.as_deref(), Some("0"));
    assert_eq!(stats.max.as_deref(), Some("99"));
}

#[tokio::test]
async fn test_fetch_column_stats_not_found() {
    let h = common::harness_with(stats_page(), Duration::from_secs(60));
    let err = assert_err!(h.proxy.fetch_column_stats("height", "7"));

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, ServiceError::ColumnStatsNotFound { ref column, .. } if column == "height"));
}

#[tokio::test]
async fn test_fetch_column_stats_without_results() {
    let h = common::harness();
    let err = assert_err!(h.proxy.fetch_column_stats("age", "7"));
    assert!(matches!(err, ServiceError::NoResults { ref job_id } if job_id == "7"));
}

#[tokio::test]
async fn test_results_failure_is_transport() {
    let (sender, _actor) = spawn_catalog_actor(common::StaticCatalog(common::catalog()));
    let proxy = DdlProxy::new(
        "alice",
        MetadataGateway::new(sender),
        Arc::new(common::RecordingJobs::default()),
        Arc::new(common::BrokenResults),
        Arc::new(common::FixedDescriber(Vec::new())),
    );

    let err = assert_err!(proxy.fetch_column_stats("age", "7"));
    assert_eq!(err.kind(), ErrorKind::TransportFailure);

    let err = assert_err!(proxy.table_properties("sales", "orders"));
    assert!(matches!(err, ServiceError::MetaParse(_)));
}
