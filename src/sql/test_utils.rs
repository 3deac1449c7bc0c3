//! Test utilities for SQL emission validation.
//!
//! Rendered expressions are wrapped in a SELECT and parsed with sqlparser-rs
//! so that emulated output is checked for syntax, not just string shape.

use sqlparser::dialect::{
    DuckDbDialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect,
    SnowflakeDialect,
};
use sqlparser::parser::Parser;

use super::dialect::Dialect;

/// Validates that a SQL statement is syntactically valid for the given dialect.
///
/// Dialects sqlparser has no parser for fall back to its generic dialect.
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::Postgres | Dialect::Redshift => Box::new(PostgreSqlDialect {}),
        Dialect::DuckDb => Box::new(DuckDbDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::TSql => Box::new(MsSqlDialect {}),
        Dialect::Snowflake => Box::new(SnowflakeDialect {}),
        Dialect::Sqlite => Box::new(SQLiteDialect {}),
        Dialect::BigQuery
        | Dialect::Databricks
        | Dialect::H2
        | Dialect::Hsqldb
        | Dialect::Firebird => Box::new(GenericDialect {}),
    };

    Parser::parse_sql(&*parser_dialect, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {:?}: {}\nSQL: {}", dialect, e, sql))
}

/// Validates a rendered expression as the projection of a SELECT.
pub fn validate_expr_sql(expr_sql: &str, dialect: Dialect) -> Result<(), String> {
    validate_sql(&format!("SELECT {} FROM t", expr_sql), dialect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT * FROM users", Dialect::Postgres).unwrap();
        validate_sql("SELECT * FROM users", Dialect::MySql).unwrap();
        validate_expr_sql("CAST(\"x\" AS NUMERIC)", Dialect::DuckDb).unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        let result = validate_sql("SELEC * FORM users", Dialect::Postgres);
        assert!(result.is_err());
    }
}
