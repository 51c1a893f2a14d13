//! DDL operations.
//!
//! Every schema change this crate can express is one [`DdlOperation`]
//! variant. A dialect turns an operation into statement text, or into
//! `None` when the parameters cannot be expressed as a statement.

use serde::{Deserialize, Serialize};

use crate::dialect::{DdlDialect, HiveDialect};
use crate::schema::{TableMeta, qualified_name};

/// A single DDL (or catalog command) operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum DdlOperation {
    /// Create a database.
    CreateDatabase {
        /// Database name.
        name: String,
    },

    /// Drop a database.
    DropDatabase {
        /// Database name.
        name: String,
        /// Whether to drop contained tables too.
        cascade: bool,
    },

    /// Create a table from a full descriptor.
    CreateTable {
        /// Table descriptor.
        meta: Box<TableMeta>,
    },

    /// Drop a table.
    DropTable {
        /// Database name.
        database: String,
        /// Table name.
        table: String,
        /// Whether to skip the trash.
        purge: bool,
    },

    /// Rename (and possibly move) a table.
    RenameTable {
        /// Current database.
        old_database: String,
        /// Current table name.
        old_table: String,
        /// Target database.
        new_database: String,
        /// Target table name.
        new_table: String,
    },

    /// Alter a table so that `old` becomes `new`.
    AlterTable {
        /// Descriptor as the engine currently has it.
        old: Box<TableMeta>,
        /// Desired descriptor.
        new: Box<TableMeta>,
    },

    /// Compute table (and optionally column) statistics.
    AnalyzeTable {
        /// Database name.
        database: String,
        /// Table name.
        table: String,
        /// Partition columns to analyze across.
        partition_columns: Vec<String>,
        /// Whether to compute column statistics too.
        for_columns: bool,
    },

    /// Describe a single column's statistics.
    FetchColumnStats {
        /// Database name.
        database: String,
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
}

impl DdlOperation {
    // Convenience constructors

    /// Creates a CreateDatabase operation.
    #[must_use]
    pub fn create_database(name: impl Into<String>) -> Self {
        Self::CreateDatabase { name: name.into() }
    }

    /// Creates a DropDatabase operation.
    #[must_use]
    pub fn drop_database(name: impl Into<String>, cascade: bool) -> Self {
        Self::DropDatabase {
            name: name.into(),
            cascade,
        }
    }

    /// Creates a CreateTable operation.
    #[must_use]
    pub fn create_table(meta: TableMeta) -> Self {
        Self::CreateTable {
            meta: Box::new(meta),
        }
    }

    /// Creates a DropTable operation.
    #[must_use]
    pub fn drop_table(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self::DropTable {
            database: database.into(),
            table: table.into(),
            purge: false,
        }
    }

    /// Creates a RenameTable operation.
    #[must_use]
    pub fn rename_table(
        old_database: impl Into<String>,
        old_table: impl Into<String>,
        new_database: impl Into<String>,
        new_table: impl Into<String>,
    ) -> Self {
        Self::RenameTable {
            old_database: old_database.into(),
            old_table: old_table.into(),
            new_database: new_database.into(),
            new_table: new_table.into(),
        }
    }

    /// Creates an AlterTable operation.
    #[must_use]
    pub fn alter_table(old: TableMeta, new: TableMeta) -> Self {
        Self::AlterTable {
            old: Box::new(old),
            new: Box::new(new),
        }
    }

    /// Creates an AnalyzeTable operation.
    #[must_use]
    pub fn analyze_table(
        database: impl Into<String>,
        table: impl Into<String>,
        for_columns: bool,
    ) -> Self {
        Self::AnalyzeTable {
            database: database.into(),
            table: table.into(),
            partition_columns: Vec::new(),
            for_columns,
        }
    }

    /// Creates a FetchColumnStats operation.
    #[must_use]
    pub fn fetch_column_stats(
        database: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self::FetchColumnStats {
            database: database.into(),
            table: table.into(),
            column: column.into(),
        }
    }

    /// Sets PURGE on a DropTable operation. Other variants are unchanged.
    #[must_use]
    pub fn purge(mut self) -> Self {
        if let Self::DropTable { purge, .. } = &mut self {
            *purge = true;
        }
        self
    }

    /// Sets the partition columns of an AnalyzeTable operation.
    #[must_use]
    pub fn partitioned_by(mut self, columns: Vec<String>) -> Self {
        if let Self::AnalyzeTable {
            partition_columns, ..
        } = &mut self
        {
            *partition_columns = columns;
        }
        self
    }

    /// Human-readable title for the job that runs this operation.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::CreateDatabase { name } => format!("Create database {name}"),
            Self::DropDatabase { name, .. } => format!("Delete database {name}"),
            Self::CreateTable { meta } => format!("Create table {}", meta.qualified_name()),
            Self::DropTable {
                database, table, ..
            } => format!("Delete table {}", qualified_name(database, table)),
            Self::RenameTable {
                old_database,
                old_table,
                new_database,
                new_table,
            } => format!(
                "Rename table {} to {}",
                qualified_name(old_database, old_table),
                qualified_name(new_database, new_table)
            ),
            Self::AlterTable { old, .. } => format!("Alter table {}", old.qualified_name()),
            Self::AnalyzeTable {
                database, table, ..
            } => format!("Analyze table {}", qualified_name(database, table)),
            Self::FetchColumnStats {
                database,
                table,
                column,
            } => format!(
                "Fetch column stats for {}.{column}",
                qualified_name(database, table)
            ),
        }
    }

    /// Generates HiveQL for this operation.
    #[must_use]
    pub fn to_sql(&self) -> Option<String> {
        HiveDialect::new().generate_sql(self)
    }
}
