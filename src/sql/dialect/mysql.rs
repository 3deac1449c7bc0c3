//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - Boolean is TINYINT(1), returns 1/0
//! - `||` is logical OR by default (use CONCAT())
//! - No NULLS FIRST/LAST
//! - No FILTER clause, no SPLIT_PART, no COVAR_*/REGR_*
//! - CAST targets are SIGNED/DECIMAL/CHAR rather than ANSI type names

use super::helpers;
use super::SqlDialect;
use crate::sql::capability::Feature;
use crate::sql::value::SqlType;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_mysql(name)
    }

    fn emit_data_type(&self, ty: SqlType) -> String {
        helpers::emit_data_type_mysql(ty)
    }

    fn native_features(&self) -> &'static [Feature] {
        &[Feature::NamedWindows, Feature::VarianceAggregates]
    }
}
