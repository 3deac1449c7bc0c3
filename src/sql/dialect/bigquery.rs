//! BigQuery SQL dialect.
//!
//! BigQuery features:
//! - Backtick identifier quoting
//! - Named windows (WINDOW clause)
//! - VAR_*, STDDEV_* and COVAR_* aggregates but no REGR_*
//! - No FILTER clause, no SPLIT_PART (SPLIT returns an array)

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// BigQuery SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct BigQuery;

impl SqlDialect for BigQuery {
    fn name(&self) -> &'static str {
        "bigquery"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_bigquery(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_bigquery(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::NullsOrdering,
            Feature::NamedWindows,
            Feature::ConcatOperator,
            Feature::VarianceAggregates,
            Feature::CovarianceAggregates,
        ]
    }
}
