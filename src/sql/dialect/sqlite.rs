//! SQLite dialect.
//!
//! SQLite features:
//! - ANSI identifier quoting (`"`)
//! - Booleans are integers (1/0)
//! - FILTER clause (3.30+), GROUPS frames and named windows (3.28+)
//! - No statistical aggregates at all; they are rebuilt from SUM/COUNT
//!   over DOUBLE casts

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// SQLite dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_sqlite(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_sqlite(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::AggregateFilter,
            Feature::NullsOrdering,
            Feature::GroupsFrame,
            Feature::NamedWindows,
            Feature::ConcatOperator,
        ]
    }
}
