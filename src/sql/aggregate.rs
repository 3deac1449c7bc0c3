//! Aggregate calls and their rendering pipeline.
//!
//! An aggregate renders in five fixed steps:
//!
//! 1. DISTINCT prefix, wrapping the arguments as a row value when the dialect
//!    supports it and there is more than one argument
//! 2. argument list, rewritten to `CASE WHEN filter THEN arg ELSE NULL END`
//!    when FILTER is not native
//! 3. ORDER BY inside the call
//! 4. `FILTER (WHERE ...)` when native
//! 5. OVER clause
//!
//! Statistical aggregates the dialect lacks are replaced as a whole before
//! step 1, see [`emulation::statistical_aggregate`].

use serde::{Deserialize, Serialize};

use super::capability::Feature;
use super::emulation;
use super::error::{invalid, Result};
use super::expr::{Expr, ExprExt};
use super::render::RenderContext;
use super::token::Token;
use super::window::{render_order_by, render_window_ref, OrderByExpr, WindowDefinition, WindowRef, WindowSpec};

/// Aggregate function kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    ArrayAgg,
    StringAgg,
    VarPop,
    VarSamp,
    StddevPop,
    StddevSamp,
    CovarPop,
    CovarSamp,
    RegrCount,
    RegrAvgx,
    RegrAvgy,
    RegrSxx,
    RegrSyy,
    RegrSxy,
    RegrSlope,
    RegrIntercept,
    /// User-defined aggregate, rendered by name
    Other(String),
}

impl AggregateFunction {
    pub fn name(&self) -> &str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::ArrayAgg => "ARRAY_AGG",
            AggregateFunction::StringAgg => "STRING_AGG",
            AggregateFunction::VarPop => "VAR_POP",
            AggregateFunction::VarSamp => "VAR_SAMP",
            AggregateFunction::StddevPop => "STDDEV_POP",
            AggregateFunction::StddevSamp => "STDDEV_SAMP",
            AggregateFunction::CovarPop => "COVAR_POP",
            AggregateFunction::CovarSamp => "COVAR_SAMP",
            AggregateFunction::RegrCount => "REGR_COUNT",
            AggregateFunction::RegrAvgx => "REGR_AVGX",
            AggregateFunction::RegrAvgy => "REGR_AVGY",
            AggregateFunction::RegrSxx => "REGR_SXX",
            AggregateFunction::RegrSyy => "REGR_SYY",
            AggregateFunction::RegrSxy => "REGR_SXY",
            AggregateFunction::RegrSlope => "REGR_SLOPE",
            AggregateFunction::RegrIntercept => "REGR_INTERCEPT",
            AggregateFunction::Other(name) => name,
        }
    }

    /// Fixed argument count, `None` when any count is accepted.
    fn arity(&self) -> Option<usize> {
        match self {
            AggregateFunction::Count
            | AggregateFunction::Sum
            | AggregateFunction::Avg
            | AggregateFunction::Min
            | AggregateFunction::Max
            | AggregateFunction::ArrayAgg
            | AggregateFunction::VarPop
            | AggregateFunction::VarSamp
            | AggregateFunction::StddevPop
            | AggregateFunction::StddevSamp => Some(1),
            AggregateFunction::StringAgg
            | AggregateFunction::CovarPop
            | AggregateFunction::CovarSamp
            | AggregateFunction::RegrCount
            | AggregateFunction::RegrAvgx
            | AggregateFunction::RegrAvgy
            | AggregateFunction::RegrSxx
            | AggregateFunction::RegrSyy
            | AggregateFunction::RegrSxy
            | AggregateFunction::RegrSlope
            | AggregateFunction::RegrIntercept => Some(2),
            AggregateFunction::Other(_) => None,
        }
    }

    /// Capability a dialect needs to render this function natively, if any.
    pub fn statistical_feature(&self) -> Option<Feature> {
        match self {
            AggregateFunction::VarPop
            | AggregateFunction::VarSamp
            | AggregateFunction::StddevPop
            | AggregateFunction::StddevSamp => Some(Feature::VarianceAggregates),
            AggregateFunction::CovarPop | AggregateFunction::CovarSamp => {
                Some(Feature::CovarianceAggregates)
            }
            AggregateFunction::RegrCount
            | AggregateFunction::RegrAvgx
            | AggregateFunction::RegrAvgy
            | AggregateFunction::RegrSxx
            | AggregateFunction::RegrSyy
            | AggregateFunction::RegrSxy
            | AggregateFunction::RegrSlope
            | AggregateFunction::RegrIntercept => Some(Feature::RegressionAggregates),
            _ => None,
        }
    }

    /// Whether an ORDER BY inside the call changes the result.
    pub fn is_order_sensitive(&self) -> bool {
        matches!(
            self,
            AggregateFunction::ArrayAgg | AggregateFunction::StringAgg | AggregateFunction::Other(_)
        )
    }
}

/// An aggregate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub function: AggregateFunction,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowRef>,
}

impl Aggregate {
    pub fn validate(&self) -> Result<()> {
        let name = self.function.name();
        if name.is_empty() {
            return Err(invalid("empty aggregate name"));
        }

        let count = self.args.len();
        if self.distinct && count == 0 {
            return Err(invalid(format!(
                "{}(DISTINCT) requires at least one argument",
                name
            )));
        }
        match (&self.function, self.function.arity()) {
            // COUNT(DISTINCT a, b) counts distinct row values
            (AggregateFunction::Count, _) if self.distinct => {}
            (_, Some(expected)) if expected != count => {
                return Err(invalid(format!(
                    "{} takes {} argument(s), got {}",
                    name, expected, count
                )));
            }
            _ => {}
        }

        if self.args.iter().any(|a| matches!(a, Expr::Star { .. })) {
            if self.function != AggregateFunction::Count || count != 1 {
                return Err(invalid("* is only valid as the single argument of COUNT"));
            }
            if self.distinct {
                return Err(invalid("DISTINCT cannot be applied to *"));
            }
        }

        if !self.order_by.is_empty() && !self.function.is_order_sensitive() {
            return Err(invalid(format!("{} does not accept ORDER BY", name)));
        }

        self.args.iter().try_for_each(Expr::validate)?;
        if let Some(filter) = &self.filter {
            filter.validate()?;
        }
        self.order_by.iter().try_for_each(|o| o.expr.validate())?;
        if let Some(window) = &self.window {
            window.validate()?;
        }
        Ok(())
    }
}

// =============================================================================
// Aggregate Builder
// =============================================================================

/// Builder for aggregate expressions.
#[derive(Debug, Clone)]
#[must_use = "AggregateBuilder has no effect until build() is called"]
pub struct AggregateBuilder {
    agg: Aggregate,
    window_conflict: bool,
}

impl AggregateBuilder {
    pub fn new(function: AggregateFunction, args: Vec<Expr>) -> Self {
        Self {
            agg: Aggregate {
                function,
                args,
                distinct: false,
                filter: None,
                order_by: vec![],
                window: None,
            },
            window_conflict: false,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.agg.distinct = true;
        self
    }

    /// Add a FILTER predicate. Repeated calls are ANDed.
    pub fn filter_where(mut self, predicate: Expr) -> Self {
        self.agg.filter = Some(match self.agg.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Add ORDER BY items inside the call.
    pub fn order_by(mut self, items: Vec<OrderByExpr>) -> Self {
        self.agg.order_by.extend(items);
        self
    }

    /// `OVER (spec)`
    pub fn over(self, spec: WindowSpec) -> Self {
        self.set_window(WindowRef::Spec(spec))
    }

    /// `OVER name`
    pub fn over_named(self, name: impl Into<String>) -> Self {
        self.set_window(WindowRef::Named(name.into()))
    }

    /// `OVER name`, inlined where named windows are unavailable.
    pub fn over_definition(self, definition: WindowDefinition) -> Self {
        self.set_window(WindowRef::Definition(definition))
    }

    fn set_window(mut self, window: WindowRef) -> Self {
        if self.agg.window.is_some() {
            self.window_conflict = true;
        }
        self.agg.window = Some(window);
        self
    }

    /// Validate and build the aggregate expression.
    pub fn build(self) -> Result<Expr> {
        if self.window_conflict {
            return Err(invalid("conflicting window specifications"));
        }
        self.agg.validate()?;
        Ok(Expr::Aggregate(Box::new(self.agg)))
    }
}

// =============================================================================
// Aggregate Constructors
// =============================================================================

pub fn aggregate(name: &str, args: Vec<Expr>) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::Other(name.into()), args)
}

pub fn count(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::Count, vec![expr])
}

/// COUNT(*)
pub fn count_star() -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::Count, vec![Expr::Star { table: None }])
}

/// COUNT(DISTINCT args...)
pub fn count_distinct(args: Vec<Expr>) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::Count, args).distinct()
}

pub fn sum(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::Sum, vec![expr])
}

pub fn avg(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::Avg, vec![expr])
}

pub fn min(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::Min, vec![expr])
}

pub fn max(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::Max, vec![expr])
}

pub fn array_agg(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::ArrayAgg, vec![expr])
}

pub fn string_agg(expr: Expr, separator: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::StringAgg, vec![expr, separator])
}

pub fn var_pop(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::VarPop, vec![expr])
}

pub fn var_samp(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::VarSamp, vec![expr])
}

pub fn stddev_pop(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::StddevPop, vec![expr])
}

pub fn stddev_samp(expr: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::StddevSamp, vec![expr])
}

pub fn covar_pop(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::CovarPop, vec![y, x])
}

pub fn covar_samp(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::CovarSamp, vec![y, x])
}

pub fn regr_count(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::RegrCount, vec![y, x])
}

pub fn regr_avgx(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::RegrAvgx, vec![y, x])
}

pub fn regr_avgy(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::RegrAvgy, vec![y, x])
}

pub fn regr_sxx(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::RegrSxx, vec![y, x])
}

pub fn regr_syy(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::RegrSyy, vec![y, x])
}

pub fn regr_sxy(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::RegrSxy, vec![y, x])
}

pub fn regr_slope(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::RegrSlope, vec![y, x])
}

pub fn regr_intercept(y: Expr, x: Expr) -> AggregateBuilder {
    AggregateBuilder::new(AggregateFunction::RegrIntercept, vec![y, x])
}

// =============================================================================
// Rendering
// =============================================================================

pub(crate) fn render_aggregate(ctx: &mut RenderContext<'_>, agg: &Aggregate) -> Result<()> {
    if let Some(feature) = agg.function.statistical_feature() {
        if !ctx.supports(feature) {
            let replacement = emulation::statistical_aggregate(agg, ctx.dialect())?;
            return ctx.visit(&replacement);
        }
    }

    if agg.distinct && agg.args.is_empty() {
        return Err(invalid(format!(
            "{}(DISTINCT) requires at least one argument",
            agg.function.name()
        )));
    }

    ctx.ts.push(Token::FunctionName(agg.function.name().to_string()));
    ctx.ts.lparen();

    // 1. DISTINCT prefix
    let row_value = agg.distinct
        && agg.args.len() > 1
        && !ctx.in_distinct_row_value
        && ctx.supports(Feature::DistinctRowValue);
    if agg.distinct {
        ctx.ts.push(Token::Distinct);
        if row_value {
            ctx.ts.lparen();
        } else {
            ctx.ts.space();
        }
    }
    let outer_row_value = std::mem::replace(&mut ctx.in_distinct_row_value, row_value);

    // 2. Arguments, with FILTER folded in when not native
    let native_filter = ctx.supports(Feature::AggregateFilter);
    let args = match &agg.filter {
        Some(filter) if !native_filter => {
            tracing::debug!(
                dialect = %ctx.dialect(),
                function = agg.function.name(),
                "emulating FILTER clause with CASE"
            );
            for (i, arg) in agg.args.iter().enumerate() {
                if i > 0 {
                    ctx.ts.comma().space();
                }
                ctx.visit(&emulation::filtered_argument(arg, filter))?;
            }
            Ok(())
        }
        _ => ctx.visit_list(&agg.args),
    };
    ctx.in_distinct_row_value = outer_row_value;
    args?;

    if row_value {
        ctx.ts.rparen();
    }

    // 3. ORDER BY inside the call
    if !agg.order_by.is_empty() {
        ctx.ts.space().push(Token::OrderBy).space();
        render_order_by(ctx, &agg.order_by)?;
    }
    ctx.ts.rparen();

    // 4. FILTER suffix
    if let (Some(filter), true) = (&agg.filter, native_filter) {
        ctx.ts
            .space()
            .push(Token::Filter)
            .space()
            .lparen()
            .push(Token::Where)
            .space();
        ctx.visit(filter)?;
        ctx.ts.rparen();
    }

    // 5. OVER
    if let Some(window) = &agg.window {
        ctx.ts.space();
        render_window_ref(ctx, window)?;
    }

    Ok(())
}
