#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hive_ddl::prelude::*;
use tokio::sync::mpsc;

/// A catalog with a fixed listing.
pub struct StaticCatalog(pub Vec<DatabaseInfo>);

impl CatalogSource for StaticCatalog {
    fn list_databases(&self, _user: &str) -> std::result::Result<Vec<DatabaseInfo>, BoxError> {
        Ok(self.0.clone())
    }
}

pub fn catalog() -> Vec<DatabaseInfo> {
    vec![
        DatabaseInfo::new("default"),
        DatabaseInfo::new("sales")
            .table(TableInfo::new("orders", TableType::Managed))
            .table(TableInfo::new("Refunds", TableType::External))
            .table(TableInfo::new("orders_by_day", TableType::VirtualView)),
    ]
}

/// A catalog whose listing blocks the calling thread for a while.
pub struct BlockingCatalog(pub Duration);

impl CatalogSource for BlockingCatalog {
    fn list_databases(&self, _user: &str) -> std::result::Result<Vec<DatabaseInfo>, BoxError> {
        std::thread::sleep(self.0);
        Ok(catalog())
    }
}

/// A catalog channel whose requests are accepted and never answered.
pub fn silent_catalog() -> mpsc::Sender<CatalogEnvelope> {
    let (sender, mut receiver) = mpsc::channel::<CatalogEnvelope>(8);
    tokio::spawn(async move {
        let mut parked = Vec::new();
        while let Some(envelope) = receiver.recv().await {
            parked.push(envelope);
        }
    });
    sender
}

/// Records every submitted job.
#[derive(Default)]
pub struct RecordingJobs {
    pub submitted: Mutex<Vec<JobRequest>>,
}

impl RecordingJobs {
    pub fn last(&self) -> JobRequest {
        self.submitted
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("a job was submitted")
    }

    pub fn count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

impl JobManager for RecordingJobs {
    fn submit(&self, request: JobRequest) -> std::result::Result<Job, BoxError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        Ok(Job::accepted(submitted.len().to_string(), request))
    }
}

/// Serves one fixed page for any job id.
pub struct FixedResults(pub ResultPage);

impl ResultsService for FixedResults {
    fn fetch(&self, _job_id: &str, _page: Pagination) -> std::result::Result<ResultPage, BoxError> {
        Ok(self.0.clone())
    }
}

/// Always fails.
pub struct BrokenResults;

impl ResultsService for BrokenResults {
    fn fetch(&self, job_id: &str, _page: Pagination) -> std::result::Result<ResultPage, BoxError> {
        Err(format!("job {job_id} has expired").into())
    }
}

/// Describes every table with the same rows.
pub struct FixedDescriber(pub Vec<Vec<String>>);

impl TableDescriber for FixedDescriber {
    fn describe_formatted(
        &self,
        _database: &str,
        _table: &str,
    ) -> std::result::Result<Vec<Vec<String>>, BoxError> {
        Ok(self.0.clone())
    }
}

pub fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect()
}

pub fn orders_describe() -> Vec<Vec<String>> {
    rows(&[
        &["# col_name", "data_type", "comment"],
        &["id", "bigint", ""],
        &["amount", "decimal(10,2)", ""],
        &["", "NULL", "NULL"],
        &["# Detailed Table Information", "NULL", "NULL"],
        &["Database:", "sales", "NULL"],
        &["Table Type:", "MANAGED_TABLE", "NULL"],
        &["# Storage Information", "NULL", "NULL"],
        &["InputFormat:", "org.apache.hadoop.hive.ql.io.orc.OrcInputFormat", "NULL"],
        &["Num Buckets:", "-1", "NULL"],
    ])
}

pub struct Harness {
    pub proxy: DdlProxy,
    pub jobs: Arc<RecordingJobs>,
}

/// A proxy over the static catalog with working collaborators.
pub fn harness() -> Harness {
    harness_with(ResultPage::default(), Duration::from_secs(60))
}

pub fn harness_with(page: ResultPage, timeout: Duration) -> Harness {
    let (sender, _actor) = spawn_catalog_actor(StaticCatalog(catalog()));
    let jobs = Arc::new(RecordingJobs::default());
    let proxy = DdlProxy::new(
        "alice",
        MetadataGateway::new(sender).with_timeout(timeout),
        jobs.clone(),
        Arc::new(FixedResults(page)),
        Arc::new(FixedDescriber(orders_describe())),
    );
    Harness { proxy, jobs }
}
