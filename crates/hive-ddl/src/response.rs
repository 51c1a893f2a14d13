//! Catalog views returned to the API layer.

use hive_ddl_core::schema::{DatabaseInfo, TableInfo, TableType};
use serde::{Deserialize, Serialize};

/// A database, optionally with its tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseResponse {
    /// Database id. Databases are identified by name.
    pub id: String,
    pub name: String,
    /// Tables, only present on single-database lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableResponse>>,
}

impl DatabaseResponse {
    /// The `{id, name}` form used in listings.
    #[must_use]
    pub fn summary(database: &DatabaseInfo) -> Self {
        Self {
            id: database.name.clone(),
            name: database.name.clone(),
            tables: None,
        }
    }

    /// The form carrying every table.
    #[must_use]
    pub fn detailed(database: &DatabaseInfo) -> Self {
        Self {
            tables: Some(
                database
                    .tables
                    .iter()
                    .map(|t| TableResponse::new(&database.name, t))
                    .collect(),
            ),
            ..Self::summary(database)
        }
    }
}

/// A table of some database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    /// `database/table`.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub table_type: TableType,
    pub database_id: String,
}

impl TableResponse {
    /// Describes `table` of `database`.
    #[must_use]
    pub fn new(database: &str, table: &TableInfo) -> Self {
        Self {
            id: format!("{database}/{}", table.name),
            name: table.name.clone(),
            table_type: table.table_type.clone(),
            database_id: database.to_string(),
        }
    }
}
