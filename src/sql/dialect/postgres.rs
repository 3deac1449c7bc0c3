//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (true/false)
//! - `$n` bind placeholders
//! - FILTER clause for aggregates
//! - Row-value DISTINCT in aggregates: `COUNT(DISTINCT(a, b))`
//! - Full statistical aggregate family (VAR_*, STDDEV_*, COVAR_*, REGR_*)

use super::helpers;
use super::{ParamStyle, SqlDialect};
use crate::sql::capability::Feature;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn param_style(&self) -> ParamStyle {
        ParamStyle::Dollar
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_postgres(name)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::AggregateFilter,
            Feature::DistinctRowValue,
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
