//! Databricks (Spark SQL) dialect.
//!
//! Databricks features:
//! - Backtick identifier quoting
//! - GROUPS frames and named windows
//! - NVL2 and SPLIT_PART are native
//! - Full statistical aggregate family

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// Databricks SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Databricks;

impl SqlDialect for Databricks {
    fn name(&self) -> &'static str {
        "databricks"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_databricks(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_databricks(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::NullsOrdering,
            Feature::GroupsFrame,
            Feature::NamedWindows,
            Feature::ConcatOperator,
            Feature::SplitPart,
            Feature::Nvl2,
            Feature::VarianceAggregates,
            Feature::CovarianceAggregates,
            Feature::RegressionAggregates,
        ]
    }
}
