//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! T-SQL has significant differences from ANSI:
//! - Square bracket identifier quoting (`[name]`)
//! - No native boolean in SELECT (must use IIF/CASE)
//! - N'...' prefix for Unicode strings
//! - `@p1` bind placeholders
//! - String concatenation with `+`
//! - VARP/VAR/STDEVP/STDEV instead of VAR_POP/VAR_SAMP/STDDEV_POP/STDDEV_SAMP
//! - No FILTER clause, no NULLS FIRST/LAST, no WINDOW clause

use super::helpers;
use super::{ParamStyle, SqlDialect};
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// T-SQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        // N prefix only when the literal needs it
        if !s.is_ascii() {
            helpers::quote_string_unicode(s)
        } else {
            helpers::quote_string_single(s)
        }
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn param_style(&self) -> ParamStyle {
        ParamStyle::At
    }

    fn concat_operator(&self) -> &'static str {
        "+"
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_tsql(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_tsql(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[Feature::ConcatOperator, Feature::VarianceAggregates]
    }
}
