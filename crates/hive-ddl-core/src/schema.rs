//! Schema descriptor types.
//!
//! These types describe databases and tables as the engine reports them
//! and as callers want them to be. They are the inputs of every generator
//! and the output of the `DESCRIBE FORMATTED` parser. Generators only ever
//! read them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::file_format_for;

static SIZED_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\)\s*$")
        .expect("valid sized type pattern")
});

/// The kind of table the engine reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TableType {
    /// Engine-managed table (`MANAGED_TABLE`).
    #[default]
    Managed,
    /// External table (`EXTERNAL_TABLE`).
    External,
    /// Logical view (`VIRTUAL_VIEW`).
    VirtualView,
    /// Materialized view (`MATERIALIZED_VIEW`).
    MaterializedView,
    /// Any other engine-reported type, kept verbatim.
    Other(String),
}

impl TableType {
    /// Returns the engine's name for this table type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Managed => "MANAGED_TABLE",
            Self::External => "EXTERNAL_TABLE",
            Self::VirtualView => "VIRTUAL_VIEW",
            Self::MaterializedView => "MATERIALIZED_VIEW",
            Self::Other(name) => name,
        }
    }

    /// Returns true for view types.
    #[must_use]
    pub fn is_view(&self) -> bool {
        matches!(self, Self::VirtualView | Self::MaterializedView)
    }
}

impl From<String> for TableType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "MANAGED_TABLE" | "MANAGED" => Self::Managed,
            "EXTERNAL_TABLE" | "EXTERNAL" => Self::External,
            "VIRTUAL_VIEW" | "VIEW" => Self::VirtualView,
            "MATERIALIZED_VIEW" => Self::MaterializedView,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for TableType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<TableType> for String {
    fn from(value: TableType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column definition.
///
/// Sized types such as `decimal(10,2)` or `varchar(20)` are split into a
/// base type plus precision and scale, the way the engine's metastore
/// stores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Base data type (e.g. `int`, `decimal`, `map<string,int>`).
    #[serde(rename = "type")]
    pub data_type: String,
    /// Precision (or length) of sized types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Scale of decimal types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Column comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ColumnInfo {
    /// Creates a column, splitting a sized type into its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl AsRef<str>) -> Self {
        let (data_type, precision, scale) = split_sized_type(data_type.as_ref());
        Self {
            name: name.into(),
            data_type,
            precision,
            scale,
            comment: None,
        }
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns the full type as it appears in DDL, e.g. `decimal(10,2)`.
    #[must_use]
    pub fn type_sql(&self) -> String {
        match (self.precision, self.scale) {
            (Some(p), Some(s)) => format!("{}({p},{s})", self.data_type),
            (Some(p), None) => format!("{}({p})", self.data_type),
            _ => self.data_type.clone(),
        }
    }

    fn normalized_type(&self) -> String {
        self.type_sql()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase()
    }

    /// Case-insensitive identity key. The engine folds column names.
    #[must_use]
    pub fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Returns true if type or comment differ from `other`.
    ///
    /// Types compare case-insensitively; a blank comment equals no comment.
    #[must_use]
    pub fn definition_differs(&self, other: &Self) -> bool {
        self.normalized_type() != other.normalized_type()
            || non_blank(self.comment.as_deref()) != non_blank(other.comment.as_deref())
    }
}

/// Splits `decimal(10,2)` into `("decimal", Some(10), Some(2))`.
///
/// Types that are not simple sized types are returned unchanged.
#[must_use]
pub fn split_sized_type(raw: &str) -> (String, Option<u32>, Option<u32>) {
    match SIZED_TYPE.captures(raw) {
        Some(caps) => {
            let precision = caps.get(2).and_then(|m| m.as_str().parse().ok());
            let scale = caps.get(3).and_then(|m| m.as_str().parse().ok());
            (caps[1].to_string(), precision, scale)
        }
        None => (raw.trim().to_string(), None, None),
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Sort direction of a bucket sort column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the SQL keyword.
    #[must_use]
    pub fn to_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A `SORTED BY` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnOrder {
    /// Column name.
    pub column: String,
    /// Sort direction.
    #[serde(default)]
    pub order: SortOrder,
}

impl ColumnOrder {
    /// Creates a sort column.
    #[must_use]
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }
}

/// Physical storage description of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageInfo {
    /// Short file format (`ORC`, `PARQUET`, `TEXTFILE`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
    /// Fully-qualified SerDe class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serde_library: Option<String>,
    /// Fully-qualified input format class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    /// Fully-qualified output format class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    /// Number of buckets, if bucketed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_buckets: Option<u32>,
    /// Bucketing columns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bucket_columns: Vec<String>,
    /// Sort columns within buckets.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort_columns: Vec<ColumnOrder>,
    /// SerDe properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub serde_properties: BTreeMap<String, String>,
}

impl StorageInfo {
    /// Returns the short file format, or the one implied by a known input
    /// format class.
    #[must_use]
    pub fn short_format(&self) -> Option<&str> {
        non_blank(self.file_format.as_deref()).or_else(|| {
            non_blank(self.input_format.as_deref()).and_then(file_format_for)
        })
    }

    fn format_unspecified(&self) -> bool {
        non_blank(self.file_format.as_deref()).is_none()
            && non_blank(self.input_format.as_deref()).is_none()
            && non_blank(self.output_format.as_deref()).is_none()
    }

    /// Returns true if both describe the same on-disk format.
    ///
    /// Short file formats are compared when both sides have one, directly
    /// or through a known input format class. Only one side having one
    /// means the formats differ. Otherwise the input/output format classes
    /// are compared. An `other` that says nothing about its format matches
    /// anything.
    #[must_use]
    pub fn same_format(&self, other: &Self) -> bool {
        if other.format_unspecified() {
            return true;
        }
        match (self.short_format(), other.short_format()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => {
                self.input_format == other.input_format && self.output_format == other.output_format
            }
            _ => false,
        }
    }

    /// Returns true if the table is bucketed.
    #[must_use]
    pub fn is_bucketed(&self) -> bool {
        !self.bucket_columns.is_empty() && self.num_buckets.is_some_and(|n| n > 0)
    }
}

/// Full table descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableMeta {
    /// Database the table lives in. May be blank on input.
    pub database: String,
    /// Table name.
    pub table: String,
    /// Table type.
    pub table_type: TableType,
    /// Table owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Table comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Data columns in declaration order.
    pub columns: Vec<ColumnInfo>,
    /// Partition columns in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partition_columns: Vec<ColumnInfo>,
    /// Storage location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Storage description.
    pub storage: StorageInfo,
    /// Table properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub table_properties: BTreeMap<String, String>,
    /// Original view text, for views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_text: Option<String>,
}

impl TableMeta {
    /// Creates an empty managed table descriptor.
    #[must_use]
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            ..Self::default()
        }
    }

    /// Marks the table as external.
    #[must_use]
    pub fn external(mut self) -> Self {
        self.table_type = TableType::External;
        self
    }

    /// Adds a data column.
    #[must_use]
    pub fn column(mut self, column: ColumnInfo) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a partition column.
    #[must_use]
    pub fn partition_column(mut self, column: ColumnInfo) -> Self {
        self.partition_columns.push(column);
        self
    }

    /// Sets the table comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the storage location.
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the short file format.
    #[must_use]
    pub fn stored_as(mut self, file_format: impl Into<String>) -> Self {
        self.storage.file_format = Some(file_format.into());
        self
    }

    /// Sets the SerDe class.
    #[must_use]
    pub fn serde(mut self, library: impl Into<String>) -> Self {
        self.storage.serde_library = Some(library.into());
        self
    }

    /// Adds a SerDe property.
    #[must_use]
    pub fn serde_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.storage.serde_properties.insert(key.into(), value.into());
        self
    }

    /// Buckets the table.
    #[must_use]
    pub fn clustered_by(mut self, columns: Vec<String>, num_buckets: u32) -> Self {
        self.storage.bucket_columns = columns;
        self.storage.num_buckets = Some(num_buckets);
        self
    }

    /// Adds a table property.
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.table_properties.insert(key.into(), value.into());
        self
    }

    /// Returns `database.table`, or just the table when the database is blank.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.database, &self.table)
    }
}

/// Returns `database.table` for titles and messages.
#[must_use]
pub fn qualified_name(database: &str, table: &str) -> String {
    if database.trim().is_empty() {
        table.to_string()
    } else {
        format!("{database}.{table}")
    }
}

/// A table as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name.
    pub name: String,
    /// Table type.
    #[serde(rename = "type", default)]
    pub table_type: TableType,
}

impl TableInfo {
    /// Creates a table listing entry.
    #[must_use]
    pub fn new(name: impl Into<String>, table_type: impl Into<TableType>) -> Self {
        Self {
            name: name.into(),
            table_type: table_type.into(),
        }
    }
}

/// A database as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// Database name.
    pub name: String,
    /// Tables in listing order.
    #[serde(default)]
    pub tables: Vec<TableInfo>,
}

impl DatabaseInfo {
    /// Creates a database listing entry with no tables.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Adds a table.
    #[must_use]
    pub fn table(mut self, table: TableInfo) -> Self {
        self.tables.push(table);
        self
    }

    /// Finds a table by name, case-insensitively. First match wins.
    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}
