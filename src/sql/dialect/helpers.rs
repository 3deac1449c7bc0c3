//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use crate::sql::value::SqlType;

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB, Snowflake, Redshift, SQLite, H2, HSQLDB, Firebird
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL, BigQuery, Databricks
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: T-SQL (SQL Server, Azure Synapse)
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with N prefix for Unicode (T-SQL).
/// Used by: T-SQL for non-ASCII strings
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres, DuckDB, Snowflake, BigQuery, Spark, H2, HSQLDB, Firebird
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: T-SQL, MySQL, SQLite
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap functions for Postgres dialect.
pub fn remap_function_postgres(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        "ISNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for DuckDB dialect.
pub fn remap_function_duckdb(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        "ISNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for MySQL dialect.
pub fn remap_function_mysql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        "SUBSTR" => Some("SUBSTRING"),
        _ => None,
    }
}

/// Remap functions for T-SQL dialect.
pub fn remap_function_tsql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "LENGTH" => Some("LEN"),
        "SUBSTR" => Some("SUBSTRING"),
        "NOW" => Some("GETDATE"),
        "NVL" => Some("ISNULL"),
        "IFNULL" => Some("ISNULL"),
        "VAR_POP" => Some("VARP"),
        "VAR_SAMP" => Some("VAR"),
        "STDDEV_POP" => Some("STDEVP"),
        "STDDEV_SAMP" => Some("STDEV"),
        _ => None,
    }
}

/// Remap functions for Snowflake dialect.
pub fn remap_function_snowflake(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => None, // NVL is native to Snowflake
        "IFNULL" => Some("NVL"),
        "ISNULL" => Some("NVL"),
        _ => None,
    }
}

/// Remap functions for BigQuery dialect.
pub fn remap_function_bigquery(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        "LENGTH" => Some("CHAR_LENGTH"),
        _ => None,
    }
}

/// Remap functions for Redshift dialect.
/// Redshift is Postgres-based, so we delegate to Postgres remapping.
pub fn remap_function_redshift(name: &str) -> Option<&'static str> {
    remap_function_postgres(name)
}

/// Remap functions for Databricks (Spark SQL) dialect.
pub fn remap_function_databricks(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("COALESCE"),
        "ISNULL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for SQLite dialect.
pub fn remap_function_sqlite(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        "SUBSTRING" => Some("SUBSTR"),
        _ => None,
    }
}

/// Remap functions for Firebird dialect.
pub fn remap_function_firebird(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        "LENGTH" => Some("CHAR_LENGTH"),
        _ => None,
    }
}

// =============================================================================
// Data Type Emission
// =============================================================================

/// CAST target names for ANSI/Postgres style.
/// Used by: Postgres, DuckDB, H2
pub fn emit_data_type_ansi(ty: SqlType) -> String {
    match ty {
        SqlType::Integer => "INTEGER".into(),
        SqlType::Double => "DOUBLE PRECISION".into(),
        SqlType::Numeric => "NUMERIC".into(),
        SqlType::Varchar => "VARCHAR".into(),
        SqlType::Boolean => "BOOLEAN".into(),
    }
}

/// CAST target names for Redshift.
///
/// A bare NUMERIC is NUMERIC(18, 0) on Redshift, so a scale is spelled out.
pub fn emit_data_type_redshift(ty: SqlType) -> String {
    match ty {
        SqlType::Numeric => "DECIMAL(38, 10)".into(),
        other => emit_data_type_ansi(other),
    }
}

/// CAST target names for MySQL.
pub fn emit_data_type_mysql(ty: SqlType) -> String {
    match ty {
        SqlType::Integer => "SIGNED".into(),
        SqlType::Double => "DOUBLE".into(),
        SqlType::Numeric => "DECIMAL(65, 30)".into(),
        SqlType::Varchar => "CHAR".into(),
        SqlType::Boolean => "SIGNED".into(),
    }
}

/// CAST target names for T-SQL.
pub fn emit_data_type_tsql(ty: SqlType) -> String {
    match ty {
        SqlType::Integer => "INT".into(),
        SqlType::Double => "FLOAT".into(),
        SqlType::Numeric => "DECIMAL(38, 10)".into(),
        SqlType::Varchar => "NVARCHAR(MAX)".into(),
        SqlType::Boolean => "BIT".into(),
    }
}

/// CAST target names for Snowflake.
pub fn emit_data_type_snowflake(ty: SqlType) -> String {
    match ty {
        SqlType::Integer => "INTEGER".into(),
        SqlType::Double => "DOUBLE".into(),
        SqlType::Numeric => "NUMBER(38, 10)".into(),
        SqlType::Varchar => "VARCHAR".into(),
        SqlType::Boolean => "BOOLEAN".into(),
    }
}

/// CAST target names for BigQuery.
pub fn emit_data_type_bigquery(ty: SqlType) -> String {
    match ty {
        SqlType::Integer => "INT64".into(),
        SqlType::Double => "FLOAT64".into(),
        SqlType::Numeric => "NUMERIC".into(),
        SqlType::Varchar => "STRING".into(),
        SqlType::Boolean => "BOOL".into(),
    }
}

/// CAST target names for Databricks (Spark SQL).
pub fn emit_data_type_databricks(ty: SqlType) -> String {
    match ty {
        SqlType::Integer => "INT".into(),
        SqlType::Double => "DOUBLE".into(),
        SqlType::Numeric => "DECIMAL(38, 10)".into(),
        SqlType::Varchar => "STRING".into(),
        SqlType::Boolean => "BOOLEAN".into(),
    }
}

/// CAST target names for SQLite (type affinity names).
pub fn emit_data_type_sqlite(ty: SqlType) -> String {
    match ty {
        SqlType::Integer => "INTEGER".into(),
        SqlType::Double => "DOUBLE".into(),
        SqlType::Numeric => "NUMERIC".into(),
        SqlType::Varchar => "TEXT".into(),
        SqlType::Boolean => "INTEGER".into(),
    }
}

/// CAST target names for HSQLDB.
pub fn emit_data_type_hsqldb(ty: SqlType) -> String {
    match ty {
        SqlType::Double => "DOUBLE".into(),
        SqlType::Varchar => "LONGVARCHAR".into(),
        other => emit_data_type_ansi(other),
    }
}

/// CAST target names for Firebird.
///
/// Firebird requires a length on VARCHAR casts.
pub fn emit_data_type_firebird(ty: SqlType) -> String {
    match ty {
        SqlType::Varchar => "VARCHAR(8191)".into(),
        SqlType::Numeric => "NUMERIC(18, 6)".into(),
        other => emit_data_type_ansi(other),
    }
}
