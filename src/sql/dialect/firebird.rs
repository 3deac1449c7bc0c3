//! Firebird dialect.
//!
//! Firebird features:
//! - ANSI identifier quoting (`"`)
//! - Named windows, COVAR_* and REGR_* aggregates (4.0+)
//! - No VAR_*/STDDEV_*; emulations cast to DOUBLE PRECISION
//! - No FILTER clause

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// Firebird dialect.
#[derive(Debug, Clone, Copy)]
pub struct Firebird;

impl SqlDialect for Firebird {
    fn name(&self) -> &'static str {
        "firebird"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_firebird(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_firebird(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::NullsOrdering,
            Feature::NamedWindows,
            Feature::ConcatOperator,
            Feature::CovarianceAggregates,
            Feature::RegressionAggregates,
        ]
    }
}
