//! Window specifications and OVER clause rendering.
//!
//! A windowed call refers to its window in one of three ways, see
//! [`WindowRef`]. Rendering goes through the capability registry:
//! named windows are inlined when the dialect cannot refer to them, and
//! NULLS FIRST/LAST becomes a CASE sort key when not native.

use serde::{Deserialize, Serialize};

use super::capability::Feature;
use super::emulation;
use super::error::{invalid, unsupported, Result};
use super::expr::Expr;
use super::render::RenderContext;
use super::token::Token;

// =============================================================================
// Ordering
// =============================================================================

/// ORDER BY item, used inside windows and order-sensitive aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByExpr {
    pub expr: Expr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<SortDir>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullsOrder>,
}

impl OrderByExpr {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            dir: None,
            nulls: None,
        }
    }

    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Asc),
            nulls: None,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Desc),
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// NULLS ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullsOrder {
    First,
    Last,
}

// =============================================================================
// Frames
// =============================================================================

/// Window frame specification.
///
/// Examples:
/// - `ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW`
/// - `RANGE BETWEEN 1 PRECEDING AND 1 FOLLOWING`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub kind: WindowFrameKind,
    pub start: WindowFrameBound,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<WindowFrameBound>,
}

impl WindowFrame {
    /// Create a frame with just a start bound.
    pub fn new(kind: WindowFrameKind, start: WindowFrameBound) -> Self {
        Self {
            kind,
            start,
            end: None,
        }
    }

    /// Create a frame with BETWEEN start AND end.
    pub fn between(kind: WindowFrameKind, start: WindowFrameBound, end: WindowFrameBound) -> Self {
        Self {
            kind,
            start,
            end: Some(end),
        }
    }

    /// ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW
    pub fn rows_to_current() -> Self {
        Self::between(
            WindowFrameKind::Rows,
            WindowFrameBound::UnboundedPreceding,
            WindowFrameBound::CurrentRow,
        )
    }

    /// Rolling window: ROWS BETWEEN (periods-1) PRECEDING AND CURRENT ROW
    pub fn rolling(periods: u32) -> Self {
        let preceding = periods.saturating_sub(1);
        Self::between(
            WindowFrameKind::Rows,
            WindowFrameBound::Preceding(u64::from(preceding)),
            WindowFrameBound::CurrentRow,
        )
    }
}

/// Frame type: ROWS, RANGE, or GROUPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFrameKind {
    /// ROWS - physical row offsets
    Rows,
    /// RANGE - logical value ranges
    Range,
    /// GROUPS - peer groups
    Groups,
}

/// Frame boundary specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowFrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

// =============================================================================
// Window specifications
// =============================================================================

/// `(PARTITION BY ... ORDER BY ... frame)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<WindowFrame>,
}

impl WindowSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by(mut self, exprs: Vec<Expr>) -> Self {
        self.partition_by = exprs;
        self
    }

    pub fn order_by(mut self, items: Vec<OrderByExpr>) -> Self {
        self.order_by = items;
        self
    }

    pub fn frame(mut self, frame: WindowFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.partition_by.is_empty() && self.order_by.is_empty() && self.frame.is_none()
    }

    /// A frame without ORDER BY is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.frame.is_some() && self.order_by.is_empty() {
            return Err(invalid("window frame requires ORDER BY"));
        }
        self.partition_by.iter().try_for_each(Expr::validate)?;
        self.order_by.iter().try_for_each(|o| o.expr.validate())
    }
}

/// `WINDOW name AS (spec)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDefinition {
    pub name: String,
    pub spec: WindowSpec,
}

impl WindowDefinition {
    pub fn new(name: impl Into<String>, spec: WindowSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }
}

/// How a windowed call names its window. Exactly one form per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRef {
    /// `OVER (spec)`
    Spec(WindowSpec),
    /// `OVER name`, defined elsewhere in the enclosing statement
    Named(String),
    /// `OVER name` with the definition carried along
    Definition(WindowDefinition),
}

impl WindowRef {
    pub fn validate(&self) -> Result<()> {
        match self {
            WindowRef::Spec(spec) => spec.validate(),
            WindowRef::Named(name) if name.is_empty() => Err(invalid("empty window name")),
            WindowRef::Named(_) => Ok(()),
            WindowRef::Definition(def) => {
                if def.name.is_empty() {
                    return Err(invalid("empty window name"));
                }
                def.spec.validate()
            }
        }
    }
}

// =============================================================================
// Window Builder
// =============================================================================

/// Builder for window function expressions.
#[derive(Debug, Clone)]
#[must_use = "WindowBuilder has no effect until build() is called"]
pub struct WindowBuilder {
    function: Expr,
    spec: WindowSpec,
    name: Option<String>,
    define: bool,
}

impl WindowBuilder {
    /// Create a new window builder for the given function.
    pub fn new(function: Expr) -> Self {
        Self {
            function,
            spec: WindowSpec::new(),
            name: None,
            define: false,
        }
    }

    /// Add PARTITION BY expressions.
    pub fn partition_by(mut self, exprs: Vec<Expr>) -> Self {
        self.spec.partition_by = exprs;
        self
    }

    /// Add ORDER BY items.
    pub fn order_by(mut self, items: Vec<OrderByExpr>) -> Self {
        self.spec.order_by = items;
        self
    }

    /// Set the window frame.
    pub fn frame(mut self, frame: WindowFrame) -> Self {
        self.spec.frame = Some(frame);
        self
    }

    /// Shorthand: ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW.
    pub fn rows_to_current(self) -> Self {
        self.frame(WindowFrame::rows_to_current())
    }

    /// Refer to a window defined elsewhere. Cannot be combined with a spec.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Turn the spec built so far into a named definition.
    pub fn define_as(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.define = true;
        self
    }

    /// Build the window function expression.
    ///
    /// Fails when a frame has no ORDER BY, when a bare name is combined with
    /// a spec, or when the function already carries its own window.
    pub fn build(self) -> Result<Expr> {
        let window = match self.name {
            Some(name) if self.define => WindowRef::Definition(WindowDefinition::new(name, self.spec)),
            Some(_) if !self.spec.is_empty() => {
                return Err(invalid("conflicting window specifications"))
            }
            Some(name) => WindowRef::Named(name),
            None => WindowRef::Spec(self.spec),
        };
        let expr = Expr::Window {
            function: Box::new(self.function),
            window,
        };
        expr.validate()?;
        Ok(expr)
    }
}

/// Extension trait for adding an OVER clause to expressions.
pub trait WindowExt: Sized {
    /// Start building a window function with OVER clause.
    fn over(self) -> WindowBuilder;
}

impl WindowExt for Expr {
    fn over(self) -> WindowBuilder {
        WindowBuilder::new(self)
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Emit `OVER ...` for a window reference.
pub(crate) fn render_window_ref(ctx: &mut RenderContext<'_>, window: &WindowRef) -> Result<()> {
    ctx.ts.push(Token::Over).space();
    match window {
        WindowRef::Spec(spec) => render_spec(ctx, spec),
        WindowRef::Named(name) => {
            if !ctx.supports(Feature::NamedWindows) {
                return Err(unsupported("named window reference", ctx.dialect()));
            }
            ctx.ts.push(Token::Ident(name.clone()));
            Ok(())
        }
        WindowRef::Definition(def) => {
            if ctx.supports(Feature::NamedWindows) {
                ctx.ts.push(Token::Ident(def.name.clone()));
                Ok(())
            } else {
                tracing::debug!(
                    dialect = %ctx.dialect(),
                    window = %def.name,
                    "inlining named window definition"
                );
                render_spec(ctx, &def.spec)
            }
        }
    }
}

fn render_spec(ctx: &mut RenderContext<'_>, spec: &WindowSpec) -> Result<()> {
    if spec.frame.is_some() && spec.order_by.is_empty() {
        return Err(invalid("window frame requires ORDER BY"));
    }

    ctx.ts.lparen();
    let mut need_space = false;

    if !spec.partition_by.is_empty() {
        ctx.ts.push(Token::PartitionBy).space();
        ctx.visit_list(&spec.partition_by)?;
        need_space = true;
    }

    if !spec.order_by.is_empty() {
        if need_space {
            ctx.ts.space();
        }
        ctx.ts.push(Token::OrderBy).space();
        render_order_by(ctx, &spec.order_by)?;
        need_space = true;
    }

    if let Some(frame) = &spec.frame {
        if need_space {
            ctx.ts.space();
        }
        render_frame(ctx, frame)?;
    }

    ctx.ts.rparen();
    Ok(())
}

fn render_frame(ctx: &mut RenderContext<'_>, frame: &WindowFrame) -> Result<()> {
    let kind = match frame.kind {
        WindowFrameKind::Rows => Token::Rows,
        WindowFrameKind::Range => Token::Range,
        WindowFrameKind::Groups => {
            if !ctx.supports(Feature::GroupsFrame) {
                return Err(unsupported("GROUPS window frame", ctx.dialect()));
            }
            Token::Groups
        }
    };
    ctx.ts.push(kind).space();

    if frame.end.is_some() {
        ctx.ts.push(Token::Between).space();
    }
    emit_frame_bound(ctx, &frame.start);
    if let Some(end) = &frame.end {
        ctx.ts.space().push(Token::And).space();
        emit_frame_bound(ctx, end);
    }
    Ok(())
}

fn emit_frame_bound(ctx: &mut RenderContext<'_>, bound: &WindowFrameBound) {
    match bound {
        WindowFrameBound::UnboundedPreceding => {
            ctx.ts.push(Token::Unbounded).space().push(Token::Preceding);
        }
        WindowFrameBound::Preceding(n) => {
            ctx.ts.push(Token::LitUInt(*n)).space().push(Token::Preceding);
        }
        WindowFrameBound::CurrentRow => {
            ctx.ts.push(Token::CurrentRow);
        }
        WindowFrameBound::Following(n) => {
            ctx.ts.push(Token::LitUInt(*n)).space().push(Token::Following);
        }
        WindowFrameBound::UnboundedFollowing => {
            ctx.ts.push(Token::Unbounded).space().push(Token::Following);
        }
    }
}

/// Emit a comma separated ORDER BY list (without the keyword).
///
/// Items with NULLS FIRST/LAST on a dialect without native support get a
/// CASE sort key in front; the item expression is then rendered twice.
pub(crate) fn render_order_by(ctx: &mut RenderContext<'_>, items: &[OrderByExpr]) -> Result<()> {
    let native_nulls = ctx.supports(Feature::NullsOrdering);

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ctx.ts.comma().space();
        }

        if let (Some(nulls), false) = (item.nulls, native_nulls) {
            tracing::debug!(dialect = %ctx.dialect(), "emulating NULLS ordering");
            ctx.visit(&emulation::nulls_ordering_key(&item.expr, nulls))?;
            ctx.ts.comma().space();
        }

        ctx.visit(&item.expr)?;
        if let Some(dir) = item.dir {
            ctx.ts.space().push(match dir {
                SortDir::Asc => Token::Asc,
                SortDir::Desc => Token::Desc,
            });
        }
        if let (Some(nulls), true) = (item.nulls, native_nulls) {
            ctx.ts.space().push(match nulls {
                NullsOrder::First => Token::NullsFirst,
                NullsOrder::Last => Token::NullsLast,
            });
        }
    }
    Ok(())
}
