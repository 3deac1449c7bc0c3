//! HSQLDB dialect.
//!
//! HSQLDB features:
//! - ANSI identifier quoting (`"`)
//! - FILTER clause for aggregates
//! - NVL2 is native
//! - No REGR_* aggregates; emulations cast to DOUBLE

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// HSQLDB dialect.
#[derive(Debug, Clone, Copy)]
pub struct Hsqldb;

impl SqlDialect for Hsqldb {
    fn name(&self) -> &'static str {
        "hsqldb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_hsqldb(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::AggregateFilter,
            Feature::NullsOrdering,
            Feature::ConcatOperator,
            Feature::Nvl2,
            Feature::VarianceAggregates,
            Feature::CovarianceAggregates,
        ]
    }
}
