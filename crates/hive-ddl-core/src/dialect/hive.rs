//! HiveQL dialect.
//!
//! Identifiers are quoted with backticks (embedded backticks doubled) and
//! string literals with single quotes (backslash-escaped). HiveQL accepts
//! a single action per ALTER TABLE, so an alter diff renders as several
//! statements.

use crate::diff::{AlterClause, FileFormat};
use crate::schema::{ColumnInfo, ColumnOrder, TableMeta, TableType, non_blank};

use super::DdlDialect;

/// HiveQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiveDialect;

impl HiveDialect {
    /// Creates a new Hive dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn column_list(&self, columns: &[ColumnInfo]) -> String {
        columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn identifier_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.quote_identifier(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Generates the `CLUSTERED BY ... INTO n BUCKETS` clause.
    fn clustered_by(
        &self,
        bucket_columns: &[String],
        sort_columns: &[ColumnOrder],
        num_buckets: u32,
    ) -> String {
        let mut sql = format!("CLUSTERED BY ({})", self.identifier_list(bucket_columns));
        if !sort_columns.is_empty() {
            let sorted: Vec<String> = sort_columns
                .iter()
                .map(|s| format!("{} {}", self.quote_identifier(&s.column), s.order.to_sql()))
                .collect();
            sql.push_str(&format!(" SORTED BY ({})", sorted.join(", ")));
        }
        sql.push_str(&format!(" INTO {num_buckets} BUCKETS"));
        sql
    }

    /// Generates the `STORED AS` clause, if the descriptor names a format.
    fn stored_as(&self, meta: &TableMeta) -> Option<String> {
        let storage = &meta.storage;
        if let Some(format) = non_blank(storage.file_format.as_deref()) {
            return Some(format!("STORED AS {}", format.to_ascii_uppercase()));
        }
        match (
            non_blank(storage.input_format.as_deref()),
            non_blank(storage.output_format.as_deref()),
        ) {
            (Some(input), Some(output)) => Some(format!(
                "STORED AS INPUTFORMAT {}\nOUTPUTFORMAT {}",
                self.quote_literal(input),
                self.quote_literal(output)
            )),
            _ => None,
        }
    }
}

impl DdlDialect for HiveDialect {
    fn create_database(&self, name: &str) -> Option<String> {
        non_blank(Some(name))?;
        Some(format!("CREATE DATABASE {}", self.quote_identifier(name)))
    }

    fn drop_database(&self, name: &str, cascade: bool) -> Option<String> {
        non_blank(Some(name))?;
        let mut sql = format!("DROP DATABASE {}", self.quote_identifier(name));
        if cascade {
            sql.push_str(" CASCADE");
        }
        Some(sql)
    }

    fn create_table(&self, meta: &TableMeta) -> Option<String> {
        non_blank(Some(&meta.table))?;
        if meta.columns.is_empty() {
            return None;
        }

        let mut sql = String::from("CREATE ");
        if meta.table_type == TableType::External {
            sql.push_str("EXTERNAL ");
        }
        sql.push_str("TABLE ");
        sql.push_str(&self.qualified_table(&meta.database, &meta.table));
        sql.push_str(" (\n");

        // Column definitions
        let col_defs: Vec<String> = meta
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();
        sql.push_str("  ");
        sql.push_str(&col_defs.join(",\n  "));
        sql.push_str("\n)");

        if let Some(comment) = non_blank(meta.comment.as_deref()) {
            sql.push_str("\nCOMMENT ");
            sql.push_str(&self.quote_literal(comment));
        }

        if !meta.partition_columns.is_empty() {
            sql.push_str("\nPARTITIONED BY (");
            sql.push_str(&self.column_list(&meta.partition_columns));
            sql.push(')');
        }

        let storage = &meta.storage;
        if storage.is_bucketed() {
            sql.push('\n');
            sql.push_str(&self.clustered_by(
                &storage.bucket_columns,
                &storage.sort_columns,
                storage.num_buckets.unwrap_or_default(),
            ));
        }

        if let Some(serde) = non_blank(storage.serde_library.as_deref()) {
            sql.push_str("\nROW FORMAT SERDE ");
            sql.push_str(&self.quote_literal(serde));
            if !storage.serde_properties.is_empty() {
                sql.push_str("\nWITH SERDEPROPERTIES ");
                sql.push_str(&self.property_list(&storage.serde_properties));
            }
        }

        if let Some(stored_as) = self.stored_as(meta) {
            sql.push('\n');
            sql.push_str(&stored_as);
        }

        if let Some(location) = non_blank(meta.location.as_deref()) {
            sql.push_str("\nLOCATION ");
            sql.push_str(&self.quote_literal(location));
        }

        // The comment is already rendered above
        let mut properties = meta.table_properties.clone();
        if meta.comment.is_some() {
            properties.remove("comment");
        }
        if !properties.is_empty() {
            sql.push_str("\nTBLPROPERTIES ");
            sql.push_str(&self.property_list(&properties));
        }

        Some(sql)
    }

    fn drop_table(&self, database: &str, table: &str, purge: bool) -> Option<String> {
        non_blank(Some(table))?;
        let mut sql = format!("DROP TABLE {}", self.qualified_table(database, table));
        if purge {
            sql.push_str(" PURGE");
        }
        Some(sql)
    }

    fn rename_table(
        &self,
        old_database: &str,
        old_table: &str,
        new_database: &str,
        new_table: &str,
    ) -> Option<String> {
        non_blank(Some(old_table))?;
        non_blank(Some(new_table))?;
        Some(format!(
            "ALTER TABLE {} RENAME TO {}",
            self.qualified_table(old_database, old_table),
            self.qualified_table(new_database, new_table)
        ))
    }

    fn analyze_table(
        &self,
        database: &str,
        table: &str,
        partition_columns: &[String],
        for_columns: bool,
    ) -> Option<String> {
        non_blank(Some(table))?;
        let mut sql = format!("ANALYZE TABLE {}", self.qualified_table(database, table));
        if !partition_columns.is_empty() {
            sql.push_str(&format!(
                " PARTITION({})",
                self.identifier_list(partition_columns)
            ));
        }
        sql.push_str(" COMPUTE STATISTICS");
        if for_columns {
            sql.push_str(" FOR COLUMNS");
        }
        Some(sql)
    }

    fn fetch_column_stats(&self, database: &str, table: &str, column: &str) -> Option<String> {
        non_blank(Some(table))?;
        non_blank(Some(column))?;
        Some(format!(
            "DESCRIBE FORMATTED {} {}",
            self.qualified_table(database, table),
            self.quote_identifier(column)
        ))
    }

    fn alter_clause(&self, clause: &AlterClause) -> String {
        match clause {
            AlterClause::ReplaceColumns(columns) => {
                format!("REPLACE COLUMNS ({})", self.column_list(columns))
            }
            AlterClause::AddColumns(columns) => {
                format!("ADD COLUMNS ({})", self.column_list(columns))
            }
            AlterClause::ChangeColumn { old_name, column } => format!(
                "CHANGE COLUMN {} {}",
                self.quote_identifier(old_name),
                self.column_definition(column)
            ),
            AlterClause::SetFileFormat(FileFormat::Named(format)) => {
                format!("SET FILEFORMAT {}", format.to_ascii_uppercase())
            }
            AlterClause::SetFileFormat(FileFormat::Classes {
                input_format,
                output_format,
                serde_library,
            }) => {
                let mut sql = format!(
                    "SET FILEFORMAT INPUTFORMAT {} OUTPUTFORMAT {}",
                    self.quote_literal(input_format),
                    self.quote_literal(output_format)
                );
                if let Some(serde) = serde_library {
                    sql.push_str(&format!(" SERDE {}", self.quote_literal(serde)));
                }
                sql
            }
            AlterClause::SetSerde {
                library,
                properties,
            } => {
                let mut sql = format!("SET SERDE {}", self.quote_literal(library));
                if !properties.is_empty() {
                    sql.push_str(" WITH SERDEPROPERTIES ");
                    sql.push_str(&self.property_list(properties));
                }
                sql
            }
            AlterClause::SetSerdeProperties(properties) => {
                format!("SET SERDEPROPERTIES {}", self.property_list(properties))
            }
            AlterClause::Clustered {
                bucket_columns,
                sort_columns,
                num_buckets,
            } => self.clustered_by(bucket_columns, sort_columns, *num_buckets),
            AlterClause::NotClustered => "NOT CLUSTERED".to_string(),
            AlterClause::SetLocation(location) => {
                format!("SET LOCATION {}", self.quote_literal(location))
            }
            AlterClause::SetTableProperties(properties) => {
                format!("SET TBLPROPERTIES {}", self.property_list(properties))
            }
            AlterClause::UnsetTableProperties(keys) => {
                let quoted: Vec<String> = keys.iter().map(|k| self.quote_literal(k)).collect();
                format!("UNSET TBLPROPERTIES IF EXISTS ({})", quoted.join(", "))
            }
        }
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::DdlOperation;
    use crate::schema::SortOrder;

    #[test]
    fn test_create_database() {
        let dialect = HiveDialect::new();
        assert_eq!(
            dialect.create_database("sales"),
            Some("CREATE DATABASE `sales`".to_string())
        );
        assert_eq!(dialect.create_database("  "), None);
    }

    #[test]
    fn test_drop_database() {
        let dialect = HiveDialect::new();
        assert_eq!(
            dialect.drop_database("sales", false),
            Some("DROP DATABASE `sales`".to_string())
        );
        assert_eq!(
            dialect.drop_database("sales", true),
            Some("DROP DATABASE `sales` CASCADE".to_string())
        );
    }

    #[test]
    fn test_quoting() {
        let dialect = HiveDialect::new();
        assert_eq!(dialect.quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(dialect.quote_literal(r"it's a\b"), r"'it\'s a\\b'");
        assert_eq!(dialect.qualified_table("", "t"), "`t`");
        assert_eq!(dialect.qualified_table("db", "t"), "`db`.`t`");
    }

    #[test]
    fn test_create_table_full() {
        let mut meta = TableMeta::new("sales", "orders")
            .external()
            .column(ColumnInfo::new("id", "bigint"))
            .column(ColumnInfo::new("amount", "decimal(10,2)").comment("gross"))
            .partition_column(ColumnInfo::new("dt", "string"))
            .clustered_by(vec!["id".into()], 4)
            .serde("org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe")
            .serde_property("field.delim", ",")
            .stored_as("textfile")
            .location("/data/orders")
            .comment("all orders")
            .property("skip.header.line.count", "1");
        meta.storage.sort_columns = vec![ColumnOrder::new("id", SortOrder::Asc)];

        let sql = HiveDialect::new().create_table(&meta).unwrap();
        assert_eq!(
            sql,
            "CREATE EXTERNAL TABLE `sales`.`orders` (\n\
             \x20 `id` bigint,\n\
             \x20 `amount` decimal(10,2) COMMENT 'gross'\n\
             )\n\
             COMMENT 'all orders'\n\
             PARTITIONED BY (`dt` string)\n\
             CLUSTERED BY (`id`) SORTED BY (`id` ASC) INTO 4 BUCKETS\n\
             ROW FORMAT SERDE 'org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe'\n\
             WITH SERDEPROPERTIES ('field.delim'=',')\n\
             STORED AS TEXTFILE\n\
             LOCATION '/data/orders'\n\
             TBLPROPERTIES ('skip.header.line.count'='1')"
        );
    }

    #[test]
    fn test_create_table_with_format_classes() {
        let mut meta = TableMeta::new("", "raw").column(ColumnInfo::new("line", "string"));
        meta.storage.input_format = Some("org.example.In".into());
        meta.storage.output_format = Some("org.example.Out".into());

        let sql = HiveDialect::new().create_table(&meta).unwrap();
        assert!(sql.starts_with("CREATE TABLE `raw` (\n"));
        assert!(sql.ends_with(
            "STORED AS INPUTFORMAT 'org.example.In'\nOUTPUTFORMAT 'org.example.Out'"
        ));
    }

    #[test]
    fn test_create_table_without_columns_is_absent() {
        let dialect = HiveDialect::new();
        assert_eq!(dialect.create_table(&TableMeta::new("db", "empty")), None);
        assert_eq!(
            dialect.create_table(&TableMeta::new("db", "").column(ColumnInfo::new("a", "int"))),
            None
        );
    }

    #[test]
    fn test_drop_and_rename_table() {
        let dialect = HiveDialect::new();
        assert_eq!(
            dialect.drop_table("db", "t", true),
            Some("DROP TABLE `db`.`t` PURGE".to_string())
        );
        assert_eq!(
            dialect.rename_table("db", "t", "archive", "t_2023"),
            Some("ALTER TABLE `db`.`t` RENAME TO `archive`.`t_2023`".to_string())
        );
        assert_eq!(dialect.rename_table("db", "t", "db", ""), None);
    }

    #[test]
    fn test_analyze_table() {
        let sql = DdlOperation::analyze_table("web", "clicks", true)
            .partitioned_by(vec!["dt".into(), "hour".into()])
            .to_sql();
        assert_eq!(
            sql.as_deref(),
            Some("ANALYZE TABLE `web`.`clicks` PARTITION(`dt`, `hour`) COMPUTE STATISTICS FOR COLUMNS")
        );
        assert_eq!(
            DdlOperation::analyze_table("web", "clicks", false).to_sql().as_deref(),
            Some("ANALYZE TABLE `web`.`clicks` COMPUTE STATISTICS")
        );
    }

    #[test]
    fn test_fetch_column_stats() {
        assert_eq!(
            DdlOperation::fetch_column_stats("web", "clicks", "user_id")
                .to_sql()
                .as_deref(),
            Some("DESCRIBE FORMATTED `web`.`clicks` `user_id`")
        );
        assert_eq!(
            DdlOperation::fetch_column_stats("web", "clicks", "").to_sql(),
            None
        );
    }

    #[test]
    fn test_alter_clauses() {
        let dialect = HiveDialect::new();
        assert_eq!(
            dialect.alter_clause(&AlterClause::UnsetTableProperties(vec![
                "a".into(),
                "b".into()
            ])),
            "UNSET TBLPROPERTIES IF EXISTS ('a', 'b')"
        );
        assert_eq!(
            dialect.alter_clause(&AlterClause::SetFileFormat(FileFormat::Classes {
                input_format: "I".into(),
                output_format: "O".into(),
                serde_library: Some("S".into()),
            })),
            "SET FILEFORMAT INPUTFORMAT 'I' OUTPUTFORMAT 'O' SERDE 'S'"
        );
        assert_eq!(
            dialect.alter_clause(&AlterClause::SetFileFormat(FileFormat::Named("parquet".into()))),
            "SET FILEFORMAT PARQUET"
        );
        assert_eq!(dialect.alter_clause(&AlterClause::NotClustered), "NOT CLUSTERED");
    }
}
