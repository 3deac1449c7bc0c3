//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (ANSI/PG/DuckDB), `` ` `` (MySQL), `[]` (T-SQL)
//! - Bind placeholders: `?`, `$1`, `@p1`
//! - Boolean literals: true/false vs 1/0
//! - String concatenation: `||` vs `+` vs CONCAT()
//! - CAST target type names
//! - The set of natively supported [`Feature`]s
//!
//! Feature support is declared per dialect but queried through
//! [`CapabilityRegistry`](crate::sql::capability::CapabilityRegistry), never
//! by comparing dialect names in rendering code.
//!
//! # Usage
//!
//! ```ignore
//! use sqlmorph::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```

mod bigquery;
mod databricks;
mod duckdb;
mod firebird;
mod h2;
pub mod helpers;
mod hsqldb;
mod mysql;
mod postgres;
mod redshift;
mod snowflake;
mod sqlite;
mod tsql;

pub use bigquery::BigQuery;
pub use databricks::Databricks;
pub use duckdb::DuckDb;
pub use firebird::Firebird;
pub use h2::H2;
pub use hsqldb::Hsqldb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use redshift::Redshift;
pub use snowflake::Snowflake;
pub use sqlite::Sqlite;
pub use tsql::TSql;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::capability::Feature;
use super::value::SqlType;

/// Bind placeholder syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamStyle {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `@p1`, `@p2`, ...
    At,
    /// `:1`, `:2`, ...
    Colon,
}

impl ParamStyle {
    /// Placeholder text for the 1-based bind position `n`.
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            ParamStyle::Question => "?".into(),
            ParamStyle::Dollar => format!("${}", n),
            ParamStyle::At => format!("@p{}", n),
            ParamStyle::Colon => format!(":{}", n),
        }
    }
}

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (column, table qualifier, window name).
    ///
    /// - ANSI/PostgreSQL/DuckDB: `"identifier"`
    /// - MySQL: `` `identifier` ``
    /// - T-SQL: `[identifier]`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    /// Override for Unicode prefix (T-SQL N'...').
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    ///
    /// - PostgreSQL/DuckDB: `true`/`false`
    /// - MySQL/T-SQL: `1`/`0`
    fn format_bool(&self, b: bool) -> &'static str;

    // =========================================================================
    // Binds
    // =========================================================================

    /// Placeholder syntax the driver for this dialect expects.
    fn param_style(&self) -> ParamStyle {
        ParamStyle::Question
    }

    // =========================================================================
    // Operators
    // =========================================================================

    /// String concatenation operator.
    ///
    /// - ANSI/PostgreSQL/DuckDB: `||`
    /// - T-SQL: `+`
    ///
    /// Dialects without [`Feature::ConcatOperator`] get `CONCAT()` instead.
    fn concat_operator(&self) -> &'static str {
        "||"
    }

    // =========================================================================
    // Function Remapping
    // =========================================================================

    /// Remap a function name for this dialect.
    ///
    /// Different databases use different names for the same functions:
    /// - `NVL` → `COALESCE` (PostgreSQL) / `ISNULL` (T-SQL) / `IFNULL` (MySQL)
    /// - `VAR_POP` → `VARP` (T-SQL)
    /// - `LENGTH` → `LEN` (T-SQL)
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to keep original.
    /// The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Type name used as a CAST target.
    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_ansi(ty)
    }

    // =========================================================================
    // Capabilities
    // =========================================================================

    /// Features this dialect renders natively.
    ///
    /// Read once when the capability registry is built.
    fn native_features(&self) -> &'static [Feature];
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    DuckDb,
    TSql,
    MySql,
    Postgres,
    Snowflake,
    BigQuery,
    Redshift,
    Databricks,
    Sqlite,
    H2,
    Hsqldb,
    Firebird,
}

impl Dialect {
    /// Every dialect, in declaration order.
    pub const ALL: [Dialect; 12] = [
        Dialect::DuckDb,
        Dialect::TSql,
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Snowflake,
        Dialect::BigQuery,
        Dialect::Redshift,
        Dialect::Databricks,
        Dialect::Sqlite,
        Dialect::H2,
        Dialect::Hsqldb,
        Dialect::Firebird,
    ];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::DuckDb => &DuckDb,
            Dialect::Postgres => &Postgres,
            Dialect::TSql => &TSql,
            Dialect::MySql => &MySql,
            Dialect::Snowflake => &Snowflake,
            Dialect::BigQuery => &BigQuery,
            Dialect::Redshift => &Redshift,
            Dialect::Databricks => &Databricks,
            Dialect::Sqlite => &Sqlite,
            Dialect::H2 => &H2,
            Dialect::Hsqldb => &Hsqldb,
            Dialect::Firebird => &Firebird,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn param_style(&self) -> ParamStyle {
        self.dialect().param_style()
    }

    fn concat_operator(&self) -> &'static str {
        self.dialect().concat_operator()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        self.dialect().emit_data_type(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        self.dialect().native_features()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Dialect::ALL
            .into_iter()
            .find(|d| d.name() == lower)
            .ok_or_else(|| format!("Unknown dialect: {}", s))
    }
}
