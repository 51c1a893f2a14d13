//! `DESCRIBE FORMATTED <table>` output parsing.
//!
//! Reconstructs a [`TableMeta`] from the three-cell rows the engine returns
//! for a formatted describe. The output is split into sections by rows
//! whose first cell starts with `#`; key/value blocks such as
//! `Table Parameters:` continue on rows with a blank first cell until the
//! next blank row.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{ColumnInfo, ColumnOrder, SortOrder, TableMeta, TableType};

static SORT_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Order\(\s*col:\s*([^,\s)]+)\s*,\s*order:\s*(\d+)\s*\)")
        .expect("valid sort column pattern")
});

/// Input format classes and the short file format they correspond to.
const KNOWN_FORMATS: &[(&str, &str)] = &[
    ("org.apache.hadoop.hive.ql.io.orc.OrcInputFormat", "ORC"),
    (
        "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat",
        "PARQUET",
    ),
    ("org.apache.hadoop.mapred.TextInputFormat", "TEXTFILE"),
    (
        "org.apache.hadoop.hive.ql.io.avro.AvroContainerInputFormat",
        "AVRO",
    ),
    ("org.apache.hadoop.mapred.SequenceFileInputFormat", "SEQUENCEFILE"),
    ("org.apache.hadoop.hive.ql.io.RCFileInputFormat", "RCFILE"),
];

/// Errors raised while parsing describe output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetaParseError {
    /// The describe output has no content.
    #[error("Describe output for '{table}' is empty")]
    Empty {
        /// Described table.
        table: String,
    },

    /// A column row has no type.
    #[error("Malformed row {row}: {message}")]
    MalformedRow {
        /// Zero-based row index.
        row: usize,
        /// What is wrong with it.
        message: String,
    },

    /// A numeric field could not be parsed.
    #[error("Invalid number for '{field}': '{value}'")]
    InvalidNumber {
        /// Field name.
        field: String,
        /// Raw value.
        value: String,
    },
}

/// Returns the short file format for a known input format class.
#[must_use]
pub fn file_format_for(input_format: &str) -> Option<&'static str> {
    KNOWN_FORMATS
        .iter()
        .find(|(class, _)| *class == input_format)
        .map(|(_, format)| *format)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Columns,
    Partitions,
    Detailed,
    Storage,
    View,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    TableParameters,
    StorageParameters,
}

/// Parser for `DESCRIBE FORMATTED` output.
#[derive(Debug)]
pub struct TableMetaParser {
    meta: TableMeta,
    section: Section,
    block: Option<Block>,
}

impl TableMetaParser {
    /// Parses describe rows for `database.table`.
    ///
    /// A `Database:` row in the output overrides `database`.
    ///
    /// # Errors
    ///
    /// Returns an error when the output is empty, a column row has no
    /// type, or `Num Buckets` is not a number.
    pub fn parse<R, S>(database: &str, table: &str, rows: &[R]) -> Result<TableMeta, MetaParseError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut parser = Self {
            meta: TableMeta::new(database, table),
            section: Section::Columns,
            block: None,
        };

        let mut seen_content = false;
        for (index, row) in rows.iter().enumerate() {
            let cells: Vec<&str> = row.as_ref().iter().map(|c| cell(c.as_ref())).collect();
            if cells.iter().all(|c| c.is_empty()) {
                parser.block = None;
                continue;
            }
            seen_content = true;
            parser.row(index, &cells)?;
        }

        if !seen_content {
            return Err(MetaParseError::Empty {
                table: table.to_string(),
            });
        }
        Ok(parser.finish())
    }

    fn row(&mut self, index: usize, cells: &[&str]) -> Result<(), MetaParseError> {
        let key = cells.first().copied().unwrap_or_default();
        let value = cells.get(1).copied().unwrap_or_default();
        let extra = cells.get(2).copied().unwrap_or_default();

        if key.starts_with('#') {
            self.enter_section(key);
            return Ok(());
        }

        if key.is_empty() {
            if let Some(block) = self.block {
                let target = match block {
                    Block::TableParameters => &mut self.meta.table_properties,
                    Block::StorageParameters => &mut self.meta.storage.serde_properties,
                };
                target.insert(value.to_string(), extra.to_string());
            }
            return Ok(());
        }

        match self.section {
            Section::Columns | Section::Partitions => {
                if value.is_empty() {
                    return Err(MetaParseError::MalformedRow {
                        row: index,
                        message: format!("column '{key}' has no type"),
                    });
                }
                let mut column = ColumnInfo::new(key, value);
                if !extra.is_empty() {
                    column = column.comment(extra);
                }
                if self.section == Section::Columns {
                    self.meta.columns.push(column);
                } else {
                    self.meta.partition_columns.push(column);
                }
            }
            Section::Detailed => self.detailed(key, value),
            Section::Storage => self.storage(key, value)?,
            Section::View => {
                if field_name(key) == "View Original Text" && !value.is_empty() {
                    self.meta.view_text = Some(value.to_string());
                }
            }
            Section::Other => {}
        }
        Ok(())
    }

    fn enter_section(&mut self, header: &str) {
        self.block = None;
        let name = header.trim_start_matches('#').trim();
        self.section = match name {
            // Repeated inside the partition section
            "col_name" if self.section == Section::Partitions => Section::Partitions,
            "col_name" => Section::Columns,
            "Partition Information" => Section::Partitions,
            "Detailed Table Information" => Section::Detailed,
            "Storage Information" => Section::Storage,
            n if n.starts_with("View Information") => Section::View,
            _ => Section::Other,
        };
    }

    fn detailed(&mut self, key: &str, value: &str) {
        match field_name(key) {
            "Database" if !value.is_empty() => self.meta.database = value.to_string(),
            "Owner" if !value.is_empty() => self.meta.owner = Some(value.to_string()),
            "Location" if !value.is_empty() => self.meta.location = Some(value.to_string()),
            "Table Type" if !value.is_empty() => self.meta.table_type = TableType::from(value),
            "Table Parameters" => self.block = Some(Block::TableParameters),
            _ => {}
        }
    }

    fn storage(&mut self, key: &str, value: &str) -> Result<(), MetaParseError> {
        let storage = &mut self.meta.storage;
        match field_name(key) {
            "SerDe Library" if !value.is_empty() => {
                storage.serde_library = Some(value.to_string());
            }
            "InputFormat" if !value.is_empty() => storage.input_format = Some(value.to_string()),
            "OutputFormat" if !value.is_empty() => {
                storage.output_format = Some(value.to_string());
            }
            "Num Buckets" => {
                let buckets: i64 = value.parse().map_err(|_| MetaParseError::InvalidNumber {
                    field: "Num Buckets".to_string(),
                    value: value.to_string(),
                })?;
                // -1 means "not bucketed"
                storage.num_buckets = u32::try_from(buckets).ok().filter(|n| *n > 0);
            }
            "Bucket Columns" => storage.bucket_columns = parse_list(value),
            "Sort Columns" => storage.sort_columns = parse_sort_columns(value),
            "Storage Desc Params" => self.block = Some(Block::StorageParameters),
            _ => {}
        }
        Ok(())
    }

    fn finish(mut self) -> TableMeta {
        if let Some(comment) = self.meta.table_properties.remove("comment") {
            if !comment.is_empty() {
                self.meta.comment = Some(comment);
            }
        }
        let storage = &mut self.meta.storage;
        storage.file_format = storage
            .input_format
            .as_deref()
            .and_then(file_format_for)
            .map(str::to_string);
        self.meta
    }
}

/// Trims a cell. The engine pads cells and writes `NULL` for nothing.
fn cell(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        ""
    } else {
        trimmed
    }
}

fn field_name(key: &str) -> &str {
    key.trim_end_matches(':').trim()
}

/// Parses `[a, b]`.
fn parse_list(value: &str) -> Vec<String> {
    value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `[Order(col:a, order:1), Order(col:b, order:0)]`.
fn parse_sort_columns(value: &str) -> Vec<ColumnOrder> {
    SORT_COLUMN
        .captures_iter(value)
        .map(|caps| {
            let order = if &caps[2] == "0" {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            };
            ColumnOrder::new(&caps[1], order)
        })
        .collect()
}
