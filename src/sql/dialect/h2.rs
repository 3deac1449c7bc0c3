//! H2 dialect.
//!
//! H2 features:
//! - ANSI identifier quoting (`"`)
//! - FILTER clause and row-value DISTINCT in aggregates
//! - NVL2 is native
//! - Full statistical aggregate family

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;

/// H2 dialect.
#[derive(Debug, Clone, Copy)]
pub struct H2;

impl SqlDialect for H2 {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::AggregateFilter,
            Feature::DistinctRowValue,
            Feature::NullsOrdering,
            Feature::GroupsFrame,
            Feature::NamedWindows,
            Feature::ConcatOperator,
            Feature::Nvl2,
            Feature::VarianceAggregates,
            Feature::CovarianceAggregates,
            Feature::RegressionAggregates,
        ]
    }
}
