//! Deterministic HiveQL DDL generation for catalog-browsing services.
//!
//! `hive-ddl-core` is the pure half of the `hive-ddl` workspace. It does no
//! I/O and holds no state, so every function here is safe to call from any
//! number of threads:
//!
//! - **Schema** - Table and database descriptors (`TableMeta`, `ColumnInfo`, ...)
//! - **Operations** - Every supported command as one `DdlOperation` variant
//! - **Dialect** - HiveQL rendering of operations, quoting rules
//! - **Diff** - ALTER TABLE synthesis from an old and a new descriptor
//! - **Stats** - Column statistics extraction from result rows
//! - **Parser** - `DESCRIBE FORMATTED` output back into a `TableMeta`
//!
//! Generators return `Option<String>`: `None` means the parameters cannot
//! be expressed as a statement, and the caller decides whether that is an
//! error.
//!
//! # Example
//!
//! ```rust
//! use hive_ddl_core::prelude::*;
//!
//! let old = TableMeta::new("crm", "users")
//!     .column(ColumnInfo::new("id", "bigint"))
//!     .column(ColumnInfo::new("email", "string"));
//! let mut new = old.clone();
//! new.columns[1].name = "mail".to_string();
//!
//! let sql = DdlOperation::alter_table(old, new).to_sql().unwrap();
//! assert_eq!(sql, "ALTER TABLE `crm`.`users` CHANGE COLUMN `email` `mail` string");
//! ```

pub mod dialect;
pub mod diff;
pub mod operations;
pub mod parser;
pub mod schema;
pub mod stats;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dialect::{DdlDialect, HiveDialect};
    pub use crate::diff::{AlterClause, AlterTableDiff, FileFormat, diff_tables};
    pub use crate::operations::DdlOperation;
    pub use crate::parser::{MetaParseError, TableMetaParser};
    pub use crate::schema::{
        ColumnInfo, ColumnOrder, DatabaseInfo, SortOrder, StorageInfo, TableInfo, TableMeta,
        TableType,
    };
    pub use crate::stats::{ColumnStats, StatField, StatsError, parse_column_stats};
}
