//! Snowflake SQL dialect.
//!
//! Snowflake features:
//! - ANSI identifier quoting (`"`)
//! - NVL/NVL2 are native
//! - GROUPS frames
//! - Full statistical aggregate family
//! - No FILTER clause and no WINDOW clause

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// Snowflake SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Snowflake;

impl SqlDialect for Snowflake {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_snowflake(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_snowflake(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::NullsOrdering,
            Feature::GroupsFrame,
            Feature::ConcatOperator,
            Feature::SplitPart,
            Feature::Nvl2,
            Feature::VarianceAggregates,
            Feature::CovarianceAggregates,
            Feature::RegressionAggregates,
        ]
    }
}
