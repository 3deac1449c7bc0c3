//! SQL expression rendering.
//!
//! This module turns dialect-neutral expression trees into dialect SQL:
//!
//! - [`expr`] - Expression AST and builder DSL
//! - [`aggregate`] - Aggregate calls and their rendering pipeline
//! - [`window`] - Window specifications and OVER clauses
//! - [`capability`] - Which features each dialect renders natively
//! - [`emulation`] - Rewrites for features a dialect lacks
//! - [`render`] - Rendering context and entry points
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod aggregate;
pub mod capability;
pub mod dialect;
pub mod emulation;
pub mod error;
pub mod expr;
pub mod render;
pub mod token;
pub mod value;
pub mod window;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use aggregate::{Aggregate, AggregateBuilder, AggregateFunction};
pub use capability::{CapabilityRegistry, Feature};
pub use dialect::{Dialect, ParamStyle, SqlDialect};
pub use error::{Result, SqlError};
pub use expr::{BinaryOperator, Expr, ExprExt, UnaryOperator};
pub use render::{render, RenderContext, Rendered, Renderer, StatementExecutor};
pub use token::{Token, TokenStream};
pub use value::{BindValue, Literal, SqlType, Value};
pub use window::{
    NullsOrder, OrderByExpr, SortDir, WindowBuilder, WindowDefinition, WindowExt, WindowFrame,
    WindowFrameBound, WindowFrameKind, WindowRef, WindowSpec,
};
