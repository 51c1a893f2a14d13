//! Dialect implementations.
//!
//! A dialect knows how to turn a [`DdlOperation`] into statement text for
//! one engine, and how to quote identifiers and literals for it.

mod hive;

pub use hive::HiveDialect;

use std::collections::BTreeMap;

use crate::diff::{AlterClause, AlterTableDiff};
use crate::operations::DdlOperation;
use crate::schema::{ColumnInfo, TableMeta};

/// Trait for engine-specific statement generation.
///
/// Every generator returns `None` when its parameters cannot be expressed
/// as a statement (blank names, a table without columns, two identical
/// descriptors). Callers decide whether that is an error.
pub trait DdlDialect {
    /// Generates text for an operation.
    fn generate_sql(&self, operation: &DdlOperation) -> Option<String> {
        match operation {
            DdlOperation::CreateDatabase { name } => self.create_database(name),
            DdlOperation::DropDatabase { name, cascade } => self.drop_database(name, *cascade),
            DdlOperation::CreateTable { meta } => self.create_table(meta),
            DdlOperation::DropTable {
                database,
                table,
                purge,
            } => self.drop_table(database, table, *purge),
            DdlOperation::RenameTable {
                old_database,
                old_table,
                new_database,
                new_table,
            } => self.rename_table(old_database, old_table, new_database, new_table),
            DdlOperation::AlterTable { old, new } => self.alter_table(old, new),
            DdlOperation::AnalyzeTable {
                database,
                table,
                partition_columns,
                for_columns,
            } => self.analyze_table(database, table, partition_columns, *for_columns),
            DdlOperation::FetchColumnStats {
                database,
                table,
                column,
            } => self.fetch_column_stats(database, table, column),
        }
    }

    /// Generates CREATE DATABASE.
    fn create_database(&self, name: &str) -> Option<String>;

    /// Generates DROP DATABASE.
    fn drop_database(&self, name: &str, cascade: bool) -> Option<String>;

    /// Generates CREATE TABLE.
    fn create_table(&self, meta: &TableMeta) -> Option<String>;

    /// Generates DROP TABLE.
    fn drop_table(&self, database: &str, table: &str, purge: bool) -> Option<String>;

    /// Generates a table rename.
    fn rename_table(
        &self,
        old_database: &str,
        old_table: &str,
        new_database: &str,
        new_table: &str,
    ) -> Option<String>;

    /// Generates the ALTER statements that turn `old` into `new`.
    fn alter_table(&self, old: &TableMeta, new: &TableMeta) -> Option<String> {
        AlterTableDiff::between(old, new).map(|diff| diff.to_sql(self))
    }

    /// Generates a statistics computation command.
    fn analyze_table(
        &self,
        database: &str,
        table: &str,
        partition_columns: &[String],
        for_columns: bool,
    ) -> Option<String>;

    /// Generates the command that describes one column's statistics.
    fn fetch_column_stats(&self, database: &str, table: &str, column: &str) -> Option<String>;

    /// Renders one ALTER TABLE action (without the `ALTER TABLE x` prefix).
    fn alter_clause(&self, clause: &AlterClause) -> String;

    /// Quote an identifier (database, table, column).
    fn quote_identifier(&self, name: &str) -> String;

    /// Quote a string literal.
    fn quote_literal(&self, value: &str) -> String;

    /// Returns the quoted `database.table` reference. A blank database
    /// leaves the table unqualified.
    fn qualified_table(&self, database: &str, table: &str) -> String {
        if database.trim().is_empty() {
            self.quote_identifier(table)
        } else {
            format!(
                "{}.{}",
                self.quote_identifier(database),
                self.quote_identifier(table)
            )
        }
    }

    /// Generates a column definition.
    fn column_definition(&self, column: &ColumnInfo) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name),
            column.type_sql()
        );
        if let Some(comment) = column.comment.as_deref().filter(|c| !c.trim().is_empty()) {
            sql.push_str(" COMMENT ");
            sql.push_str(&self.quote_literal(comment));
        }
        sql
    }

    /// Renders `('k'='v', ...)`.
    fn property_list(&self, properties: &BTreeMap<String, String>) -> String {
        let pairs: Vec<String> = properties
            .iter()
            .map(|(k, v)| format!("{}={}", self.quote_literal(k), self.quote_literal(v)))
            .collect();
        format!("({})", pairs.join(", "))
    }
}
