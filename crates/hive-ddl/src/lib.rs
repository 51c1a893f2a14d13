//! HiveQL DDL proxy.
//!
//! `hive-ddl` sits between a catalog-browsing API and a Hive engine:
//!
//! - **Catalog** - Request/response protocol and an actor serving it
//! - **Gateway** - Catalog fetches with a fixed deadline
//! - **Jobs** - Job requests and submission to an external job manager
//! - **Results** - Results service and table describer collaborators
//! - **Proxy** - The service an API layer calls
//!
//! Statement generation, diffing and result parsing live in
//! [`hive_ddl_core`] and are re-exported from the prelude.
//!
//! # Example
//!
//! ```rust,ignore
//! use hive_ddl::prelude::*;
//!
//! let (sender, _actor) = spawn_catalog_actor(my_catalog);
//! let proxy = DdlProxy::new("alice", MetadataGateway::new(sender), jobs, results, describer);
//!
//! let databases = proxy.list_databases().await?;
//! let job = proxy.rename_table("sales", "orders", "archive", "orders_2023")?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Preview the statement for a new table
//! hive-ddl create-table --database sales --meta orders.json
//!
//! # Preview the ALTER statements between two descriptors
//! hive-ddl alter-table --old current.json --new wanted.json
//!
//! # Extract column statistics from saved result rows
//! hive-ddl column-stats --column age --rows results.json
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod jobs;
pub mod proxy;
pub mod response;
pub mod results;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{
        CatalogEnvelope, CatalogRequest, CatalogResponse, CatalogSource, spawn_catalog_actor,
    };
    pub use crate::config::DdlConfig;
    pub use crate::error::{BoxError, ErrorKind, Result, ServiceError};
    pub use crate::gateway::{CatalogSnapshot, MetadataGateway};
    pub use crate::jobs::{Job, JobManager, JobOrchestrator, JobRequest, JobStatus, Referrer};
    pub use crate::proxy::DdlProxy;
    pub use crate::response::{DatabaseResponse, TableResponse};
    pub use crate::results::{Pagination, ResultPage, ResultsService, TableDescriber};
    pub use hive_ddl_core::prelude::*;
}
