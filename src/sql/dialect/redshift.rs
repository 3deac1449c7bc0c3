//! Amazon Redshift SQL dialect.
//!
//! Redshift features:
//! - PostgreSQL-based syntax
//! - ANSI identifier quoting (`"`)
//! - `$n` bind placeholders
//! - NVL2 and SPLIT_PART are native
//! - No FILTER clause, no GROUPS frames, no COVAR_*/REGR_*

use super::helpers;
use super::{ParamStyle, SqlDialect};
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// Amazon Redshift SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Redshift;

impl SqlDialect for Redshift {
    fn name(&self) -> &'static str {
        "redshift"
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
        helpers::remap_function_redshift(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_redshift(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[
            Feature::NullsOrdering,
            Feature::ConcatOperator,
            Feature::SplitPart,
            Feature::Nvl2,
            Feature::VarianceAggregates,
        ]
    }
}
