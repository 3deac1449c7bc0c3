//! Expression AST - the dialect-neutral tree the renderer walks.
//!
//! This module provides a strongly-typed AST for SQL expressions
//! with exhaustive pattern matching enforced by the compiler.
//! Trees are immutable once built and are never mutated by rendering.

use serde::{Deserialize, Serialize};

use super::aggregate::Aggregate;
use super::error::{invalid, Result};
use super::value::{Literal, SqlType, Value};
use super::window::WindowRef;

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled by the renderer - the compiler enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table: Option<String>,
        column: String,
    },

    /// Literal value, bound or inline
    Literal(Literal),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation: op expr
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// Scalar function call: name(args...)
    Function {
        name: String,
        #[serde(default)]
        args: Vec<Expr>,
    },

    /// CASE WHEN... THEN... ELSE... END
    Case {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_clause: Option<Box<Expr>>,
    },

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        #[serde(default)]
        negated: bool,
    },

    /// BETWEEN: expr BETWEEN low AND high
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        #[serde(default)]
        negated: bool,
    },

    /// IS NULL / IS NOT NULL
    IsNull {
        expr: Box<Expr>,
        #[serde(default)]
        negated: bool,
    },

    /// LIKE with ESCAPE: expr LIKE pattern ESCAPE escape_char
    LikeEscape {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape_char: char,
        #[serde(default)]
        negated: bool,
    },

    /// Wildcard: * or table.*
    Star {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table: Option<String>,
    },

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// CAST(expr AS type)
    Cast { expr: Box<Expr>, ty: SqlType },

    /// NVL2(value, if_not_null, if_null)
    Nvl2 {
        value: Box<Expr>,
        if_not_null: Box<Expr>,
        if_null: Box<Expr>,
    },

    /// SPLIT_PART(string, delimiter, n), 1-based field index
    SplitPart {
        string: Box<Expr>,
        delimiter: Box<Expr>,
        n: Box<Expr>,
    },

    /// Aggregate call, see [`Aggregate`]
    Aggregate(Box<Aggregate>),

    /// Window function expression.
    ///
    /// Example: `ROW_NUMBER() OVER (PARTITION BY region ORDER BY date)`
    Window {
        /// The function being windowed (usually Expr::Function)
        function: Box<Expr>,
        window: WindowRef,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    // String
    Concat,
    Like,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Not,
    Minus,
}

/// Binding strength of IS NULL, IN, BETWEEN and LIKE.
pub const PREDICATE_PRECEDENCE: u8 = 4;

impl BinaryOperator {
    /// Binding strength; higher binds tighter.
    pub const fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::Lte
            | BinaryOperator::Gte
            | BinaryOperator::Like => PREDICATE_PRECEDENCE,
            BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Concat => 5,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 6,
        }
    }

    /// Comparisons do not chain: `a = b = c` is rejected or misread.
    pub const fn is_comparison(self) -> bool {
        self.precedence() == PREDICATE_PRECEDENCE
    }

    /// `a op (b op c)` equals `a op b op c`.
    pub const fn is_associative(self) -> bool {
        matches!(
            self,
            BinaryOperator::And
                | BinaryOperator::Or
                | BinaryOperator::Plus
                | BinaryOperator::Mul
                | BinaryOperator::Concat
        )
    }
}

impl UnaryOperator {
    pub const fn precedence(self) -> u8 {
        match self {
            // NOT a = b is NOT (a = b)
            UnaryOperator::Not => 3,
            UnaryOperator::Minus => 7,
        }
    }
}

impl Expr {
    /// Binding strength of the operator at the root, `None` for atoms.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Expr::BinaryOp { op, .. } => Some(op.precedence()),
            Expr::UnaryOp { op, .. } => Some(op.precedence()),
            Expr::In { .. } | Expr::Between { .. } | Expr::IsNull { .. } | Expr::LikeEscape { .. } => {
                Some(PREDICATE_PRECEDENCE)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

impl Expr {
    /// Check the rules the constructors enforce.
    ///
    /// Trees built through the constructors always pass; deserialized trees
    /// must be checked before rendering.
    pub fn validate(&self) -> Result<()> {
        match self {
            Expr::Column { column, .. } => {
                if column.is_empty() {
                    return Err(invalid("empty column name"));
                }
                Ok(())
            }
            Expr::Literal(_) | Expr::Star { .. } => Ok(()),
            Expr::BinaryOp { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Expr::UnaryOp { expr, .. }
            | Expr::IsNull { expr, .. }
            | Expr::Paren(expr)
            | Expr::Cast { expr, .. } => expr.validate(),
            Expr::Function { name, args } => {
                if name.is_empty() {
                    return Err(invalid("empty function name"));
                }
                args.iter().try_for_each(Expr::validate)
            }
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if when_clauses.is_empty() {
                    return Err(invalid("CASE requires at least one WHEN branch"));
                }
                if let Some(op) = operand {
                    op.validate()?;
                }
                for (when, then) in when_clauses {
                    when.validate()?;
                    then.validate()?;
                }
                match else_clause {
                    Some(e) => e.validate(),
                    None => Ok(()),
                }
            }
            Expr::In { expr, values, .. } => {
                expr.validate()?;
                values.iter().try_for_each(Expr::validate)
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.validate()?;
                low.validate()?;
                high.validate()
            }
            Expr::LikeEscape { expr, pattern, .. } => {
                expr.validate()?;
                pattern.validate()
            }
            Expr::Nvl2 {
                value,
                if_not_null,
                if_null,
            } => {
                value.validate()?;
                if_not_null.validate()?;
                if_null.validate()
            }
            Expr::SplitPart {
                string,
                delimiter,
                n,
            } => {
                check_split_index(n)?;
                string.validate()?;
                delimiter.validate()?;
                n.validate()
            }
            Expr::Aggregate(agg) => agg.validate(),
            Expr::Window { function, window } => {
                if let Expr::Aggregate(agg) = function.as_ref() {
                    if agg.window.is_some() {
                        return Err(invalid("conflicting window specifications"));
                    }
                }
                function.validate()?;
                window.validate()
            }
        }
    }
}

fn check_split_index(n: &Expr) -> Result<()> {
    if let Expr::Literal(Literal {
        value: Value::Int(i),
        inline: true,
        ..
    }) = n
    {
        if *i < 1 {
            return Err(invalid(format!("SPLIT_PART field index must be >= 1, got {}", i)));
        }
    }
    Ok(())
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

/// Bound value with an explicit declared type.
pub fn param(value: Value, ty: SqlType) -> Expr {
    Expr::Literal(Literal::bound(value, ty))
}

pub fn val_int(n: i64) -> Expr {
    param(Value::Int(n), SqlType::Integer)
}

pub fn val_float(f: f64) -> Expr {
    param(Value::Float(f), SqlType::Double)
}

pub fn val_str(s: &str) -> Expr {
    param(Value::String(s.into()), SqlType::Varchar)
}

pub fn val_bool(b: bool) -> Expr {
    param(Value::Bool(b), SqlType::Boolean)
}

/// Bound NULL that still carries a declared type.
pub fn typed_null(ty: SqlType) -> Expr {
    param(Value::Null, ty)
}

pub fn inline_int(n: i64) -> Expr {
    Expr::Literal(Literal::inline(Value::Int(n)))
}

/// Inline float. Must be finite to render.
pub fn inline_float(f: f64) -> Expr {
    Expr::Literal(Literal::inline(Value::Float(f)))
}

pub fn inline_str(s: &str) -> Expr {
    Expr::Literal(Literal::inline(Value::String(s.into())))
}

pub fn inline_bool(b: bool) -> Expr {
    Expr::Literal(Literal::inline(Value::Bool(b)))
}

pub fn inline_null() -> Expr {
    Expr::Literal(Literal::inline(Value::Null))
}

/// Inline `1`.
pub fn one() -> Expr {
    inline_int(1)
}

/// Create a * wildcard.
pub fn star() -> Expr {
    Expr::Star { table: None }
}

/// Create a table.* wildcard.
pub fn table_star(table: &str) -> Expr {
    Expr::Star {
        table: Some(table.into()),
    }
}

/// Create a scalar function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// COALESCE(args...)
pub fn coalesce(args: Vec<Expr>) -> Expr {
    func("COALESCE", args)
}

/// CAST(expr AS ty)
pub fn cast(expr: Expr, ty: SqlType) -> Expr {
    Expr::Cast {
        expr: Box::new(expr),
        ty,
    }
}

/// NVL2(value, if_not_null, if_null).
///
/// An absent `if_null` becomes a bound NULL typed like `if_not_null` when
/// that is a literal, VARCHAR otherwise.
pub fn nvl2(value: Expr, if_not_null: Expr, if_null: Option<Expr>) -> Expr {
    let if_null = if_null.unwrap_or_else(|| {
        let ty = match &if_not_null {
            Expr::Literal(lit) => lit.ty,
            _ => SqlType::Varchar,
        };
        typed_null(ty)
    });
    Expr::Nvl2 {
        value: Box::new(value),
        if_not_null: Box::new(if_not_null),
        if_null: Box::new(if_null),
    }
}

/// SPLIT_PART(string, delimiter, n).
///
/// Absent arguments become typed bound NULLs (VARCHAR, VARCHAR, INTEGER).
/// An inline `n` below 1 is rejected.
pub fn split_part(string: Option<Expr>, delimiter: Option<Expr>, n: Option<Expr>) -> Result<Expr> {
    let n = n.unwrap_or_else(|| typed_null(SqlType::Integer));
    check_split_index(&n)?;
    Ok(Expr::SplitPart {
        string: Box::new(string.unwrap_or_else(|| typed_null(SqlType::Varchar))),
        delimiter: Box::new(delimiter.unwrap_or_else(|| typed_null(SqlType::Varchar))),
        n: Box::new(n),
    })
}

/// Searched CASE. At least one branch is required.
pub fn case_when(branches: Vec<(Expr, Expr)>, else_clause: Option<Expr>) -> Result<Expr> {
    if branches.is_empty() {
        return Err(invalid("CASE requires at least one WHEN branch"));
    }
    Ok(Expr::Case {
        operand: None,
        when_clauses: branches,
        else_clause: else_clause.map(Box::new),
    })
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Ne, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gte, other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lt, other.into())
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lte, other.into())
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Or, other.into())
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
        }
    }

    fn neg(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(self.into_expr()),
        }
    }

    // Arithmetic operators
    fn add(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Plus, other.into())
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Minus, other.into())
    }

    fn mul(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Mul, other.into())
    }

    fn div(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Div, other.into())
    }

    fn modulo(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Mod, other.into())
    }

    // String operators
    fn like(self, pattern: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Like, pattern.into())
    }

    /// LIKE with ESCAPE clause for matching literal `%` and `_` characters.
    fn like_escape(self, pattern: impl Into<Expr>, escape_char: char) -> Expr {
        Expr::LikeEscape {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape_char,
            negated: false,
        }
    }

    fn not_like_escape(self, pattern: impl Into<Expr>, escape_char: char) -> Expr {
        Expr::LikeEscape {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape_char,
            negated: true,
        }
    }

    fn concat(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Concat, other.into())
    }

    // NULL checks
    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    // IN operator
    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: true,
        }
    }

    // BETWEEN operator
    fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    fn not_between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: true,
        }
    }

    fn paren(self) -> Expr {
        Expr::Paren(Box::new(self.into_expr()))
    }

    fn cast_as(self, ty: SqlType) -> Expr {
        cast(self.into_expr(), ty)
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

// Plain Rust values convert to bound parameters.

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        val_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        val_int(i64::from(n))
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        val_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        val_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        param(Value::String(s), SqlType::Varchar)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        val_bool(b)
    }
}

impl From<Aggregate> for Expr {
    fn from(agg: Aggregate) -> Self {
        Expr::Aggregate(Box::new(agg))
    }
}

// =============================================================================
// Tests
// =============================================================================
