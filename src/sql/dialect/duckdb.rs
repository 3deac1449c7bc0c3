//! DuckDB SQL dialect.
//!
//! DuckDB follows PostgreSQL syntax closely:
//! - ANSI identifier quoting (`"`)
//! - FILTER clause for aggregates
//! - GROUPS frames and named windows
//! - No row-value DISTINCT inside aggregates

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_duckdb(name)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::AggregateFilter,
            Feature::NullsOrdering,
            Feature::GroupsFrame,
            Feature::NamedWindows,
            Feature::ConcatOperator,
            Feature::SplitPart,
            Feature::VarianceAggregates,
            Feature::CovarianceAggregates,
            Feature::RegressionAggregates,
        ]
    }
}
