//! hive-ddl CLI
//!
//! Offline preview of the statements the DDL proxy would submit, and of
//! what it would read back from saved result sets.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use hive_ddl::prelude::*;

/// HiveQL DDL generation and result parsing.
#[derive(Parser)]
#[command(name = "hive-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, env = "HIVE_DDL_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show CREATE DATABASE.
    CreateDatabase {
        /// Database name.
        name: String,
    },

    /// Show DROP DATABASE.
    DropDatabase {
        /// Database name.
        name: String,

        /// Drop contained tables too.
        #[arg(long)]
        cascade: bool,
    },

    /// Show CREATE TABLE for a JSON table descriptor.
    CreateTable {
        /// Database used when the descriptor names none.
        #[arg(short, long)]
        database: String,

        /// Table descriptor (JSON file).
        #[arg(short, long)]
        meta: PathBuf,
    },

    /// Show DROP TABLE.
    DropTable {
        database: String,
        table: String,

        /// Skip the trash.
        #[arg(long)]
        purge: bool,
    },

    /// Show a table rename.
    RenameTable {
        database: String,
        table: String,
        new_database: String,
        new_table: String,
    },

    /// Show the ALTER statements between two JSON table descriptors.
    AlterTable {
        /// Current descriptor (JSON file).
        #[arg(long)]
        old: PathBuf,

        /// Desired descriptor (JSON file).
        #[arg(long)]
        new: PathBuf,
    },

    /// Show ANALYZE TABLE.
    AnalyzeTable {
        database: String,
        table: String,

        /// Compute column statistics too.
        #[arg(long)]
        columns: bool,

        /// Partition column to analyze across (repeatable).
        #[arg(short, long = "partition")]
        partitions: Vec<String>,
    },

    /// Show the statement that describes a column's statistics.
    ColumnStatsQuery {
        database: String,
        table: String,
        column: String,
    },

    /// Extract a column's statistics from saved result rows.
    ColumnStats {
        /// Column name.
        #[arg(short, long)]
        column: String,

        /// Result rows (JSON array of string arrays).
        #[arg(short, long)]
        rows: PathBuf,
    },

    /// Rebuild a table descriptor from saved `DESCRIBE FORMATTED` rows.
    Describe {
        #[arg(short, long)]
        database: String,

        #[arg(short, long)]
        table: String,

        /// Describe rows (JSON array of string arrays).
        #[arg(short, long)]
        rows: PathBuf,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("cannot parse {}", path.display()))
}

/// Prints a generated statement, or fails naming what could not be built.
fn emit(operation: &DdlOperation) -> anyhow::Result<()> {
    let title = operation.title();
    let Some(sql) = operation.to_sql() else {
        bail!("Failed to generate a statement for: {title}");
    };
    debug!(title = %title, "Generated statement");
    println!("{sql};");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => DdlConfig::from_file(path)?,
        None => DdlConfig::default(),
    };
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::CreateDatabase { name } => {
            info!(database = %config.default_database, "Job would run in the default database");
            emit(&DdlOperation::create_database(name))?;
        }

        Commands::DropDatabase { name, cascade } => {
            emit(&DdlOperation::drop_database(name, cascade))?;
        }

        Commands::CreateTable { database, meta } => {
            let mut meta: TableMeta = read_json(&meta)?;
            if meta.database.trim().is_empty() {
                meta.database = database;
            }
            emit(&DdlOperation::create_table(meta))?;
        }

        Commands::DropTable {
            database,
            table,
            purge,
        } => {
            let mut operation = DdlOperation::drop_table(database, table);
            if purge {
                operation = operation.purge();
            }
            emit(&operation)?;
        }

        Commands::RenameTable {
            database,
            table,
            new_database,
            new_table,
        } => {
            emit(&DdlOperation::rename_table(
                database,
                table,
                new_database,
                new_table,
            ))?;
        }

        Commands::AlterTable { old, new } => {
            let old: TableMeta = read_json(&old)?;
            let new: TableMeta = read_json(&new)?;
            let Some(diff) = diff_tables(&old, &new) else {
                bail!(
                    "No difference was found between the two definitions of {}",
                    old.qualified_name()
                );
            };
            info!(clauses = diff.clauses.len(), "Computed table diff");
            println!("{};", diff.to_sql(&HiveDialect::new()));
        }

        Commands::AnalyzeTable {
            database,
            table,
            columns,
            partitions,
        } => {
            emit(&DdlOperation::analyze_table(database, table, columns).partitioned_by(partitions))?;
        }

        Commands::ColumnStatsQuery {
            database,
            table,
            column,
        } => {
            emit(&DdlOperation::fetch_column_stats(database, table, column))?;
        }

        Commands::ColumnStats { column, rows } => {
            let rows: Vec<Vec<String>> = read_json(&rows)?;
            let stats = parse_column_stats(&rows, &column)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        Commands::Describe {
            database,
            table,
            rows,
        } => {
            let rows: Vec<Vec<String>> = read_json(&rows)?;
            let meta = TableMetaParser::parse(&database, &table, &rows)?;
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
    }

    Ok(())
}
