//! Rendering an expression tree into SQL text and binds.
//!
//! A [`RenderContext`] lives for exactly one render call. It walks the tree
//! depth first, pushing tokens and bind values as it goes, so the Nth
//! placeholder in the output always refers to the Nth bind.

use serde::Serialize;

use super::aggregate::render_aggregate;
use super::capability::{self, CapabilityRegistry, Feature};
use super::dialect::{Dialect, ParamStyle, SqlDialect};
use super::emulation;
use super::error::{invalid, Result, SqlError};
use super::expr::{BinaryOperator, Expr, UnaryOperator, PREDICATE_PRECEDENCE};
use super::token::{Token, TokenStream};
use super::value::{BindValue, Literal, Value};
use super::window::render_window_ref;
use crate::config::RenderSettings;

/// SQL text plus the values for its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Runs a rendered statement. Implemented by callers; never invoked here.
pub trait StatementExecutor {
    type Output;
    type Error;

    fn execute(&self, statement: &Rendered) -> std::result::Result<Self::Output, Self::Error>;
}

/// Per-call rendering state.
pub struct RenderContext<'a> {
    dialect: Dialect,
    registry: &'a CapabilityRegistry,
    param_style: ParamStyle,
    max_depth: usize,
    depth: usize,
    binds: Vec<BindValue>,
    pub(crate) ts: TokenStream,
    /// Set while rendering arguments already wrapped as a DISTINCT row value.
    pub(crate) in_distinct_row_value: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(dialect: Dialect, registry: &'a CapabilityRegistry, settings: &RenderSettings) -> Self {
        Self {
            dialect,
            registry,
            param_style: settings.param_style.unwrap_or_else(|| dialect.param_style()),
            max_depth: settings.max_depth,
            depth: 0,
            binds: vec![],
            ts: TokenStream::new(),
            in_distinct_row_value: false,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.registry.supports(feature, self.dialect)
    }

    /// Render one node, enforcing the depth limit.
    pub fn visit(&mut self, expr: &Expr) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SqlError::RenderingOverflow {
                limit: self.max_depth,
            });
        }
        let result = self.visit_node(expr);
        self.depth -= 1;
        result
    }

    /// Render an operand, parenthesized when it binds looser than `min`.
    fn visit_operand(&mut self, expr: &Expr, min: u8) -> Result<()> {
        match expr.precedence() {
            Some(p) if p < min => {
                self.ts.lparen();
                self.visit(expr)?;
                self.ts.rparen();
                Ok(())
            }
            _ => self.visit(expr),
        }
    }

    /// Render a comma separated list.
    pub fn visit_list(&mut self, exprs: &[Expr]) -> Result<()> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.ts.comma().space();
            }
            self.visit(expr)?;
        }
        Ok(())
    }

    /// Emit a placeholder and record its value.
    pub fn bind(&mut self, literal: &Literal) {
        self.binds.push(BindValue::from(literal));
        self.ts.push(Token::Param(self.binds.len()));
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            sql: self.ts.serialize_with(self.dialect, self.param_style),
            binds: self.binds,
        }
    }

    fn visit_node(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    self.ts.push(Token::Ident(t.clone())).push(Token::Dot);
                }
                self.ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) if lit.inline => {
                let token = match &lit.value {
                    Value::Int(n) => Token::LitInt(*n),
                    Value::Float(f) if f.is_finite() => Token::LitFloat(*f),
                    Value::Float(f) => {
                        return Err(invalid(format!("non-finite float literal {}", f)))
                    }
                    Value::String(s) => Token::LitString(s.clone()),
                    Value::Bool(b) => Token::LitBool(*b),
                    Value::Null => Token::LitNull,
                };
                self.ts.push(token);
            }

            Expr::Literal(lit) => self.bind(lit),

            Expr::BinaryOp { left, op, right } => {
                if *op == BinaryOperator::Concat && !self.supports(Feature::ConcatOperator) {
                    tracing::debug!(dialect = %self.dialect, "emulating || with CONCAT()");
                    return self.visit(&emulation::concat_call(left, right));
                }
                let p = op.precedence();
                let chained = matches!(right.as_ref(), Expr::BinaryOp { op: r, .. } if r == op)
                    && op.is_associative();
                let (left_min, right_min) = if op.is_comparison() {
                    (p + 1, p + 1)
                } else if chained {
                    (p, p)
                } else {
                    (p, p + 1)
                };
                self.visit_operand(left, left_min)?;
                self.ts.space().push(binary_op_to_token(*op)).space();
                self.visit_operand(right, right_min)?;
            }

            Expr::UnaryOp { op, expr } => {
                self.ts
                    .push(match op {
                        UnaryOperator::Not => Token::Not,
                        UnaryOperator::Minus => Token::Minus,
                    })
                    .space();
                self.visit_operand(expr, op.precedence())?;
            }

            Expr::Function { name, args } => {
                self.ts.push(Token::FunctionName(name.clone())).lparen();
                self.visit_list(args)?;
                self.ts.rparen();
            }

            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if when_clauses.is_empty() {
                    return Err(invalid("CASE requires at least one WHEN branch"));
                }
                self.ts.push(Token::Case);
                if let Some(op) = operand {
                    self.ts.space();
                    self.visit(op)?;
                }
                for (when, then) in when_clauses {
                    self.ts.space().push(Token::When).space();
                    self.visit(when)?;
                    self.ts.space().push(Token::Then).space();
                    self.visit(then)?;
                }
                if let Some(else_expr) = else_clause {
                    self.ts.space().push(Token::Else).space();
                    self.visit(else_expr)?;
                }
                self.ts.space().push(Token::End);
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                // "x IN ()" is invalid SQL; it is always false
                if values.is_empty() {
                    self.ts
                        .push(Token::LitInt(1))
                        .space()
                        .push(Token::Eq)
                        .space()
                        .push(Token::LitInt(if *negated { 1 } else { 0 }));
                } else {
                    self.visit_operand(expr, PREDICATE_PRECEDENCE + 1)?;
                    if *negated {
                        self.ts.space().push(Token::Not);
                    }
                    self.ts.space().push(Token::In).space().lparen();
                    self.visit_list(values)?;
                    self.ts.rparen();
                }
            }

            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.visit_operand(expr, PREDICATE_PRECEDENCE + 1)?;
                if *negated {
                    self.ts.space().push(Token::Not);
                }
                self.ts.space().push(Token::Between).space();
                self.visit_operand(low, PREDICATE_PRECEDENCE + 1)?;
                self.ts.space().push(Token::And).space();
                self.visit_operand(high, PREDICATE_PRECEDENCE + 1)?;
            }

            Expr::IsNull { expr, negated } => {
                self.visit_operand(expr, PREDICATE_PRECEDENCE + 1)?;
                self.ts.space().push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }

            Expr::LikeEscape {
                expr,
                pattern,
                escape_char,
                negated,
            } => {
                self.visit_operand(expr, PREDICATE_PRECEDENCE + 1)?;
                if *negated {
                    self.ts.space().push(Token::Not);
                }
                self.ts.space().push(Token::Like).space();
                self.visit_operand(pattern, PREDICATE_PRECEDENCE + 1)?;
                self.ts
                    .space()
                    .push(Token::Escape)
                    .space()
                    .push(Token::LitString(escape_char.to_string()));
            }

            Expr::Star { table } => {
                if let Some(t) = table {
                    self.ts.push(Token::Ident(t.clone())).push(Token::Dot);
                }
                self.ts.push(Token::Star);
            }

            Expr::Paren(inner) => {
                self.ts.lparen();
                self.visit(inner)?;
                self.ts.rparen();
            }

            Expr::Cast { expr, ty } => {
                self.ts.push(Token::Cast).lparen();
                self.visit(expr)?;
                self.ts
                    .space()
                    .push(Token::As)
                    .space()
                    .push(Token::TypeName(self.dialect.emit_data_type(*ty)))
                    .rparen();
            }

            Expr::Nvl2 {
                value,
                if_not_null,
                if_null,
            } => {
                if !self.supports(Feature::Nvl2) {
                    tracing::debug!(dialect = %self.dialect, "emulating NVL2 with CASE");
                    return self.visit(&emulation::nvl2_case(value, if_not_null, if_null));
                }
                self.ts.push(Token::FunctionName("NVL2".into())).lparen();
                self.visit(value)?;
                self.ts.comma().space();
                self.visit(if_not_null)?;
                self.ts.comma().space();
                self.visit(if_null)?;
                self.ts.rparen();
            }

            Expr::SplitPart {
                string,
                delimiter,
                n,
            } => {
                if !self.supports(Feature::SplitPart) {
                    let replacement = emulation::split_part(string, delimiter, n, self.dialect)?;
                    return self.visit(&replacement);
                }
                self.ts.push(Token::FunctionName("SPLIT_PART".into())).lparen();
                self.visit(string)?;
                self.ts.comma().space();
                self.visit(delimiter)?;
                self.ts.comma().space();
                self.visit(n)?;
                self.ts.rparen();
            }

            Expr::Aggregate(agg) => render_aggregate(self, agg)?,

            Expr::Window { function, window } => {
                if let Expr::Aggregate(agg) = function.as_ref() {
                    if agg.window.is_some() {
                        return Err(invalid("conflicting window specifications"));
                    }
                }
                self.visit(function)?;
                self.ts.space();
                render_window_ref(self, window)?;
            }
        }

        Ok(())
    }
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
        BinaryOperator::Or => Token::Or,
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::Mod => Token::Mod,
        BinaryOperator::Concat => Token::Concat,
        BinaryOperator::Like => Token::Like,
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Renders expressions for one dialect.
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    dialect: Dialect,
    registry: &'a CapabilityRegistry,
    settings: RenderSettings,
}

impl Renderer<'static> {
    /// Renderer backed by the process-wide registry and default settings.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            registry: capability::global(),
            settings: RenderSettings::default(),
        }
    }
}

impl<'a> Renderer<'a> {
    pub fn with_registry<'b>(self, registry: &'b CapabilityRegistry) -> Renderer<'b> {
        Renderer {
            dialect: self.dialect,
            registry,
            settings: self.settings,
        }
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Render `expr`. On error nothing is returned.
    pub fn render(&self, expr: &Expr) -> Result<Rendered> {
        let mut ctx = RenderContext::new(self.dialect, self.registry, &self.settings);
        ctx.visit(expr)?;
        Ok(ctx.finish())
    }
}

/// Render `expr` for `dialect` with the process-wide registry.
pub fn render(expr: &Expr, dialect: Dialect) -> Result<Rendered> {
    Renderer::new(dialect).render(expr)
}
