#![allow(dead_code)]

use hive_ddl_core::prelude::*;

pub fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect()
}

/// `DESCRIBE FORMATTED web.events` as the engine prints it.
pub fn events_describe() -> Vec<Vec<String>> {
    rows(&[
        &["# col_name            ", "data_type           ", "comment             "],
        &["", "NULL", "NULL"],
        &["event_id", "bigint", ""],
        &["user_id", "bigint", "anonymous when null"],
        &["payload", "string", ""],
        &["", "NULL", "NULL"],
        &["# Partition Information", "NULL", "NULL"],
        &["# col_name            ", "data_type           ", "comment             "],
        &["dt", "string", ""],
        &["", "NULL", "NULL"],
        &["# Detailed Table Information", "NULL", "NULL"],
        &["Database:           ", "web                 ", "NULL"],
        &["Owner:              ", "ingest              ", "NULL"],
        &["Location:           ", "hdfs://nn/warehouse/web.db/events", "NULL"],
        &["Table Type:         ", "MANAGED_TABLE       ", "NULL"],
        &["Table Parameters:", "NULL", "NULL"],
        &["", "COLUMN_STATS_ACCURATE", "{\"BASIC_STATS\":\"true\"}"],
        &["", "numFiles            ", "12                  "],
        &["", "retention.days      ", "90                  "],
        &["", "transient_lastDdlTime", "1700000000          "],
        &["", "NULL", "NULL"],
        &["# Storage Information", "NULL", "NULL"],
        &["SerDe Library:      ", "org.apache.hadoop.hive.ql.io.orc.OrcSerde", "NULL"],
        &["InputFormat:        ", "org.apache.hadoop.hive.ql.io.orc.OrcInputFormat", "NULL"],
        &["OutputFormat:       ", "org.apache.hadoop.hive.ql.io.orc.OrcOutputFormat", "NULL"],
        &["Compressed:         ", "No                  ", "NULL"],
        &["Num Buckets:        ", "-1                  ", "NULL"],
        &["Bucket Columns:     ", "[]                  ", "NULL"],
        &["Sort Columns:       ", "[]                  ", "NULL"],
        &["Storage Desc Params:", "NULL", "NULL"],
        &["", "serialization.format", "1                   "],
    ])
}

/// `events_describe` with the value of the `key` row replaced, and `extra`
/// rows inserted after the row whose first cell is `after`.
fn events_describe_with(
    key: &str,
    value: &str,
    after: Option<(&str, &[&[&str]])>,
) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for mut row in events_describe() {
        if row[0].trim() == key {
            row[1] = value.to_string();
        }
        let first = row[0].trim().to_string();
        out.push(row);
        if let Some((anchor, extra)) = after {
            if first == anchor {
                out.extend(rows(extra));
            }
        }
    }
    out
}

/// `events_describe` for an external table.
pub fn external_events_describe() -> Vec<Vec<String>> {
    events_describe_with(
        "Table Type:",
        "EXTERNAL_TABLE",
        Some((
            "Table Parameters:",
            &[&["", "EXTERNAL            ", "TRUE                "]],
        )),
    )
}

/// `events_describe` for a table read through an input format class
/// with no short format.
pub fn hudi_events_describe() -> Vec<Vec<String>> {
    events_describe_with(
        "InputFormat:",
        "org.apache.hudi.hadoop.HoodieParquetInputFormat",
        None,
    )
}

/// The table `events_describe` describes, as a caller would write it.
pub fn events_meta() -> TableMeta {
    TableMeta::new("web", "events")
        .column(ColumnInfo::new("event_id", "bigint"))
        .column(ColumnInfo::new("user_id", "bigint").comment("anonymous when null"))
        .column(ColumnInfo::new("payload", "string"))
        .partition_column(ColumnInfo::new("dt", "string"))
        .stored_as("ORC")
        .location("hdfs://nn/warehouse/web.db/events")
        .property("retention.days", "90")
}
