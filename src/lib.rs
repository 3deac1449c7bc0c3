//! # sqlmorph
//!
//! Renders dialect-neutral SQL expression trees into the SQL text of a
//! specific database, plus the ordered list of bind values for its
//! placeholders.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Expr tree (columns, literals, aggregates, ...)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [RenderContext::visit]
//! ┌─────────────────────────────────────────────────────────┐
//! │   CapabilityRegistry lookup ──► native or emulation      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [TokenStream::serialize]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Rendered { sql, binds }                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ```ignore
//! use sqlmorph::prelude::*;
//!
//! let expr = count_star().filter_where(col("active")).build()?;
//! let out = render(&expr, Dialect::MySql)?;
//! assert_eq!(out.sql, "COUNT(CASE WHEN `active` THEN 1 ELSE NULL END)");
//! ```

pub mod config;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::aggregate;
pub use sql::capability;
pub use sql::dialect;
pub use sql::expr;
pub use sql::render;
pub use sql::token;
pub use sql::window;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::aggregate::{
        // Constructors
        aggregate,
        array_agg,
        avg,
        count,
        count_distinct,
        count_star,
        covar_pop,
        covar_samp,
        max,
        min,
        regr_avgx,
        regr_avgy,
        regr_count,
        regr_intercept,
        regr_slope,
        regr_sxx,
        regr_sxy,
        regr_syy,
        stddev_pop,
        stddev_samp,
        string_agg,
        sum,
        var_pop,
        var_samp,
        // Types
        Aggregate,
        AggregateBuilder,
        AggregateFunction,
    };
    pub use crate::capability::{CapabilityRegistry, Feature};
    pub use crate::dialect::{Dialect, ParamStyle, SqlDialect};
    pub use crate::expr::{
        // Constructors
        case_when,
        cast,
        coalesce,
        col,
        func,
        inline_bool,
        inline_float,
        inline_int,
        inline_null,
        inline_str,
        nvl2,
        one,
        param,
        split_part,
        star,
        table_col,
        table_star,
        typed_null,
        val_bool,
        val_float,
        val_int,
        val_str,
        // Types
        BinaryOperator,
        Expr,
        ExprExt,
        UnaryOperator,
    };
    pub use crate::render::{render, Rendered, Renderer, StatementExecutor};
    pub use crate::sql::error::{Result, SqlError};
    pub use crate::sql::value::{BindValue, SqlType, Value};
    pub use crate::window::{
        NullsOrder, OrderByExpr, SortDir, WindowDefinition, WindowExt, WindowFrame,
        WindowFrameBound, WindowFrameKind, WindowSpec,
    };
}

// Also export at crate root for convenience
pub use config::Settings;
pub use dialect::Dialect;
pub use expr::{col, Expr, ExprExt};
pub use render::{Rendered, Renderer};
pub use sql::error::SqlError;
