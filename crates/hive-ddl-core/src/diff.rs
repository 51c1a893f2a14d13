//! ALTER TABLE synthesis from two table descriptors.
//!
//! Compares the descriptor the engine currently has with the desired
//! descriptor and produces the ALTER clauses needed to get from one to the
//! other. Clauses always come out in the same order: column drops, column
//! adds, renames/retypes, then table-level changes.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::dialect::DdlDialect;
use crate::schema::{ColumnInfo, ColumnOrder, StorageInfo, TableMeta, non_blank};

/// Table properties the engine maintains itself. They are never diffed.
const ENGINE_MANAGED_PROPERTIES: &[&str] = &[
    "COLUMN_STATS_ACCURATE",
    "bucketing_version",
    "last_modified_by",
    "last_modified_time",
    "numFiles",
    "numFilesErasureCoded",
    "numRows",
    "rawDataSize",
    "totalSize",
    "transient_lastDdlTime",
];

/// Table property key carrying the table comment.
const COMMENT_PROPERTY: &str = "comment";

/// Table property the engine derives from the table type. Unsetting it
/// turns an external table into a managed one.
const EXTERNAL_PROPERTY: &str = "EXTERNAL";

/// A file format as it can be named in a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFormat {
    /// Short name such as `ORC`.
    Named(String),
    /// Explicit input and output format classes.
    Classes {
        /// Input format class.
        input_format: String,
        /// Output format class.
        output_format: String,
        /// SerDe class.
        serde_library: Option<String>,
    },
}

impl FileFormat {
    /// Returns how `storage` names its format, if it can be named at all.
    ///
    /// A known input format class is named by its short format. Unknown
    /// classes need both the input and the output class.
    #[must_use]
    pub fn of(storage: &StorageInfo) -> Option<Self> {
        if let Some(format) = storage.short_format() {
            return Some(Self::Named(format.to_ascii_uppercase()));
        }
        match (
            non_blank(storage.input_format.as_deref()),
            non_blank(storage.output_format.as_deref()),
        ) {
            (Some(input), Some(output)) => Some(Self::Classes {
                input_format: input.to_string(),
                output_format: output.to_string(),
                serde_library: non_blank(storage.serde_library.as_deref()).map(str::to_string),
            }),
            _ => None,
        }
    }
}

/// A single ALTER TABLE action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterClause {
    /// Replace the whole column list. Used whenever a column is removed or
    /// the column order changes.
    ReplaceColumns(Vec<ColumnInfo>),
    /// Append columns.
    AddColumns(Vec<ColumnInfo>),
    /// Rename and/or retype a column.
    ChangeColumn {
        /// Current column name.
        old_name: String,
        /// New definition (name, type, comment).
        column: ColumnInfo,
    },
    /// Change the on-disk format.
    SetFileFormat(FileFormat),
    /// Change the SerDe class (and its properties).
    SetSerde {
        /// SerDe class.
        library: String,
        /// SerDe properties.
        properties: BTreeMap<String, String>,
    },
    /// Add or change SerDe properties.
    SetSerdeProperties(BTreeMap<String, String>),
    /// Change bucketing.
    Clustered {
        /// Bucketing columns.
        bucket_columns: Vec<String>,
        /// Sort columns.
        sort_columns: Vec<ColumnOrder>,
        /// Number of buckets.
        num_buckets: u32,
    },
    /// Remove bucketing.
    NotClustered,
    /// Change the storage location.
    SetLocation(String),
    /// Add or change table properties.
    SetTableProperties(BTreeMap<String, String>),
    /// Remove table properties.
    UnsetTableProperties(Vec<String>),
}

/// The ALTER clauses for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTableDiff {
    /// Database of the altered table.
    pub database: String,
    /// Name of the altered table.
    pub table: String,
    /// Clauses in emission order.
    pub clauses: Vec<AlterClause>,
}

impl AlterTableDiff {
    /// Compares two descriptors of the same logical table.
    ///
    /// Returns `None` when nothing differs. The target of every clause is
    /// the old descriptor's database and table.
    #[must_use]
    pub fn between(old: &TableMeta, new: &TableMeta) -> Option<Self> {
        let mut clauses = diff_columns(&old.columns, &new.columns);
        clauses.extend(diff_storage(old, new));
        clauses.extend(diff_properties(old, new));

        if clauses.is_empty() {
            None
        } else {
            Some(Self {
                database: old.database.clone(),
                table: old.table.clone(),
                clauses,
            })
        }
    }

    /// Renders the clauses, one `ALTER TABLE` per clause, joined by `;\n`.
    #[must_use]
    pub fn to_sql(&self, dialect: &(impl DdlDialect + ?Sized)) -> String {
        let target = dialect.qualified_table(&self.database, &self.table);
        self.clauses
            .iter()
            .map(|clause| format!("ALTER TABLE {target} {}", dialect.alter_clause(clause)))
            .collect::<Vec<_>>()
            .join(";\n")
    }
}

/// Shorthand for [`AlterTableDiff::between`].
#[must_use]
pub fn diff_tables(old: &TableMeta, new: &TableMeta) -> Option<AlterTableDiff> {
    AlterTableDiff::between(old, new)
}

// ================================================================
// Column diff
// ================================================================

fn diff_columns(old: &[ColumnInfo], new: &[ColumnInfo]) -> Vec<AlterClause> {
    let old_keys: HashSet<String> = old.iter().map(ColumnInfo::key).collect();
    let new_keys: HashSet<String> = new.iter().map(ColumnInfo::key).collect();

    // ---- renames: a vanished name and an appeared name in the same slot
    let renamed: BTreeSet<usize> = old
        .iter()
        .zip(new)
        .enumerate()
        .filter(|(_, (o, n))| !new_keys.contains(&o.key()) && !old_keys.contains(&n.key()))
        .map(|(position, _)| position)
        .collect();

    let dropped = old
        .iter()
        .enumerate()
        .any(|(i, c)| !new_keys.contains(&c.key()) && !renamed.contains(&i));

    // ---- slot each surviving column lands in; the engine only appends
    let slots: Vec<usize> = old
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            if renamed.contains(&i) {
                Some(i)
            } else {
                new.iter().position(|n| n.key() == c.key())
            }
        })
        .collect();
    let in_place = slots.iter().enumerate().all(|(i, slot)| i == *slot);

    // ---- drops and reorders: the engine can only replace the whole list
    if dropped || !in_place {
        return vec![AlterClause::ReplaceColumns(new.to_vec())];
    }

    let mut clauses = Vec::new();

    // ---- adds
    let added: Vec<ColumnInfo> = new
        .iter()
        .enumerate()
        .filter(|(i, c)| !old_keys.contains(&c.key()) && !renamed.contains(i))
        .map(|(_, c)| c.clone())
        .collect();
    if !added.is_empty() {
        clauses.push(AlterClause::AddColumns(added));
    }

    // ---- renames and retypes, in new column order
    for (position, new_col) in new.iter().enumerate() {
        let old_col = if renamed.contains(&position) {
            &old[position]
        } else {
            match old.iter().find(|c| c.key() == new_col.key()) {
                Some(c) if c.definition_differs(new_col) => c,
                _ => continue,
            }
        };
        clauses.push(AlterClause::ChangeColumn {
            old_name: old_col.name.clone(),
            column: new_col.clone(),
        });
    }

    clauses
}

// ================================================================
// Table-level diff
// ================================================================

fn diff_storage(old: &TableMeta, new: &TableMeta) -> Vec<AlterClause> {
    let mut clauses = Vec::new();
    let (o, n) = (&old.storage, &new.storage);

    if !o.same_format(n) {
        if let Some(format) = FileFormat::of(n) {
            clauses.push(AlterClause::SetFileFormat(format));
        }
    }

    let serde_changed = match (&o.serde_library, &n.serde_library) {
        (Some(a), Some(b)) => a != b,
        (None, Some(_)) => true,
        _ => false,
    };
    match &n.serde_library {
        Some(library) if serde_changed => clauses.push(AlterClause::SetSerde {
            library: library.clone(),
            properties: n.serde_properties.clone(),
        }),
        _ => {
            let changed = changed_entries(&o.serde_properties, &n.serde_properties);
            if !changed.is_empty() {
                clauses.push(AlterClause::SetSerdeProperties(changed));
            }
        }
    }

    let bucketing_changed = o.is_bucketed() != n.is_bucketed()
        || (n.is_bucketed()
            && (o.bucket_columns != n.bucket_columns
                || o.sort_columns != n.sort_columns
                || o.num_buckets != n.num_buckets));
    if bucketing_changed {
        match n.num_buckets {
            Some(num_buckets) if n.is_bucketed() => clauses.push(AlterClause::Clustered {
                bucket_columns: n.bucket_columns.clone(),
                sort_columns: n.sort_columns.clone(),
                num_buckets,
            }),
            _ => clauses.push(AlterClause::NotClustered),
        }
    }

    if let Some(location) = non_blank(new.location.as_deref()) {
        if non_blank(old.location.as_deref()) != Some(location) {
            clauses.push(AlterClause::SetLocation(location.to_string()));
        }
    }

    clauses
}

fn diff_properties(old: &TableMeta, new: &TableMeta) -> Vec<AlterClause> {
    let old_props = user_properties(old);
    let new_props = user_properties(new);

    let mut clauses = Vec::new();
    let changed = changed_entries(&old_props, &new_props);
    if !changed.is_empty() {
        clauses.push(AlterClause::SetTableProperties(changed));
    }

    let removed: Vec<String> = old_props
        .keys()
        .filter(|k| !new_props.contains_key(*k))
        .cloned()
        .collect();
    if !removed.is_empty() {
        clauses.push(AlterClause::UnsetTableProperties(removed));
    }
    clauses
}

/// Table properties the user controls, with the comment folded in.
fn user_properties(meta: &TableMeta) -> BTreeMap<String, String> {
    let mut props: BTreeMap<String, String> = meta
        .table_properties
        .iter()
        .filter(|(k, _)| {
            !ENGINE_MANAGED_PROPERTIES.contains(&k.as_str())
                && !k.eq_ignore_ascii_case(EXTERNAL_PROPERTY)
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if let Some(comment) = non_blank(meta.comment.as_deref()) {
        props.insert(COMMENT_PROPERTY.to_string(), comment.to_string());
    }
    props
}

/// Entries of `new` that are missing from or different in `old`.
fn changed_entries(
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    new.iter()
        .filter(|(k, v)| old.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
