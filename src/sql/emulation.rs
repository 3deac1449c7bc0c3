//! Rewrite rules for constructs a dialect cannot render natively.
//!
//! Every rule takes the unsupported construct and returns the subtree to
//! render in its place. The renderer visits that subtree like any other, so
//! bind values inside a child that appears twice are bound twice, in
//! textual order.

use super::aggregate::{Aggregate, AggregateFunction};
use super::dialect::Dialect;
use super::error::{invalid, unsupported, Result};
use super::expr::{cast, func, inline_int, inline_null, one, Expr, ExprExt};
use super::value::SqlType;
use super::window::NullsOrder;

/// `CASE WHEN filter THEN arg ELSE NULL END`, with `*` replaced by `1`.
pub fn filtered_argument(arg: &Expr, filter: &Expr) -> Expr {
    let then = match arg {
        Expr::Star { .. } => one(),
        other => other.clone(),
    };
    Expr::Case {
        operand: None,
        when_clauses: vec![(filter.clone(), then)],
        else_clause: Some(Box::new(inline_null())),
    }
}

/// `CASE WHEN value IS NOT NULL THEN if_not_null ELSE if_null END`
pub fn nvl2_case(value: &Expr, if_not_null: &Expr, if_null: &Expr) -> Expr {
    Expr::Case {
        operand: None,
        when_clauses: vec![(value.clone().is_not_null(), if_not_null.clone())],
        else_clause: Some(Box::new(if_null.clone())),
    }
}

/// Sort key placed before `expr` so that NULLs sort first or last under
/// the default ascending order.
pub fn nulls_ordering_key(expr: &Expr, nulls: NullsOrder) -> Expr {
    let (null_rank, value_rank) = match nulls {
        NullsOrder::First => (0, 1),
        NullsOrder::Last => (1, 0),
    };
    Expr::Case {
        operand: None,
        when_clauses: vec![(expr.clone().is_null(), inline_int(null_rank))],
        else_clause: Some(Box::new(inline_int(value_rank))),
    }
}

/// `CONCAT(left, right)`
pub fn concat_call(left: &Expr, right: &Expr) -> Expr {
    func("CONCAT", vec![left.clone(), right.clone()])
}

/// SPLIT_PART for dialects without it.
///
/// MySQL pads the string with `n` delimiters so that an index past the last
/// field yields an empty string, then keeps the last of the first `n` fields.
pub fn split_part(string: &Expr, delimiter: &Expr, n: &Expr, dialect: Dialect) -> Result<Expr> {
    match dialect {
        Dialect::MySql => {
            tracing::debug!(dialect = %dialect, "emulating SPLIT_PART with SUBSTRING_INDEX");
            let padded = func(
                "CONCAT",
                vec![
                    string.clone(),
                    func("REPEAT", vec![delimiter.clone(), n.clone()]),
                ],
            );
            let head = func("SUBSTRING_INDEX", vec![padded, delimiter.clone(), n.clone()]);
            Ok(func(
                "SUBSTRING_INDEX",
                vec![head, delimiter.clone(), inline_int(-1)],
            ))
        }
        _ => Err(unsupported("SPLIT_PART", dialect)),
    }
}

/// Type that arguments are cast to before statistical arithmetic.
pub fn statistical_cast_type(dialect: Dialect) -> SqlType {
    match dialect {
        Dialect::Sqlite | Dialect::Hsqldb | Dialect::Firebird => SqlType::Double,
        _ => SqlType::Numeric,
    }
}

/// Rebuild a statistical aggregate from SUM, COUNT and AVG.
///
/// The aggregate's FILTER and window are copied onto every component
/// aggregate. The result is parenthesized so it can sit inside any
/// arithmetic.
pub fn statistical_aggregate(agg: &Aggregate, dialect: Dialect) -> Result<Expr> {
    if agg.distinct {
        return Err(unsupported(
            format!("DISTINCT {}", agg.function.name()),
            dialect,
        ));
    }

    tracing::debug!(
        dialect = %dialect,
        function = agg.function.name(),
        "emulating statistical aggregate"
    );

    let stats = Components {
        agg,
        ty: statistical_cast_type(dialect),
    };

    let expr = match &agg.function {
        AggregateFunction::VarPop => stats.var_pop(&stats.single()?),
        AggregateFunction::VarSamp => stats.var_samp(&stats.single()?),
        AggregateFunction::StddevPop => func("SQRT", vec![stats.var_pop(&stats.single()?)]),
        AggregateFunction::StddevSamp => func("SQRT", vec![stats.var_samp(&stats.single()?)]),
        AggregateFunction::CovarPop => {
            let (y, x) = stats.pair()?;
            stats
                .avg(x.clone().mul(y.clone()))
                .sub(stats.avg(x).mul(stats.avg(y)))
        }
        AggregateFunction::CovarSamp => {
            let (y, x) = stats.pair()?;
            let count = stats.count(x.clone());
            stats
                .sum_of_products(&x, &y)
                .paren()
                .div(nullif_zero(count.sub(one())))
        }
        AggregateFunction::RegrCount => stats.count(stats.pair()?.1),
        AggregateFunction::RegrAvgx => stats.avg(stats.pair()?.1),
        AggregateFunction::RegrAvgy => stats.avg(stats.pair()?.0),
        AggregateFunction::RegrSxx => {
            let x = stats.pair()?.1;
            stats.sum_of_products(&x, &x)
        }
        AggregateFunction::RegrSyy => {
            let y = stats.pair()?.0;
            stats.sum_of_products(&y, &y)
        }
        AggregateFunction::RegrSxy => {
            let (y, x) = stats.pair()?;
            stats.sum_of_products(&x, &y)
        }
        AggregateFunction::RegrSlope => {
            let (y, x) = stats.pair()?;
            stats.slope(&x, &y)
        }
        AggregateFunction::RegrIntercept => {
            let (y, x) = stats.pair()?;
            stats
                .avg(y.clone())
                .sub(stats.slope(&x, &y).paren().mul(stats.avg(x)))
        }
        other => {
            return Err(unsupported(other.name(), dialect));
        }
    };

    Ok(expr.paren())
}

/// `NULLIF(e, 0)`
fn nullif_zero(e: Expr) -> Expr {
    func("NULLIF", vec![e, inline_int(0)])
}

/// Builds component aggregates that share the aggregate's FILTER and window.
struct Components<'a> {
    agg: &'a Aggregate,
    ty: SqlType,
}

impl Components<'_> {
    fn component(&self, function: AggregateFunction, arg: Expr) -> Expr {
        Expr::Aggregate(Box::new(Aggregate {
            function,
            args: vec![arg],
            distinct: false,
            filter: self.agg.filter.clone(),
            order_by: vec![],
            window: self.agg.window.clone(),
        }))
    }

    fn sum(&self, arg: Expr) -> Expr {
        self.component(AggregateFunction::Sum, arg)
    }

    fn count(&self, arg: Expr) -> Expr {
        self.component(AggregateFunction::Count, arg)
    }

    fn avg(&self, arg: Expr) -> Expr {
        self.component(AggregateFunction::Avg, arg)
    }

    /// The single argument, cast.
    fn single(&self) -> Result<Expr> {
        match self.agg.args.as_slice() {
            [x] => Ok(cast(x.clone(), self.ty)),
            _ => Err(invalid(format!("{} takes 1 argument(s)", self.agg.function.name()))),
        }
    }

    /// `(y, x)` restricted to rows where both are non-null, cast.
    fn pair(&self) -> Result<(Expr, Expr)> {
        let [y, x] = self.agg.args.as_slice() else {
            return Err(invalid(format!("{} takes 2 argument(s)", self.agg.function.name())));
        };
        let restrict = |keep: &Expr, other: &Expr| {
            cast(
                Expr::Nvl2 {
                    value: Box::new(other.clone()),
                    if_not_null: Box::new(keep.clone()),
                    if_null: Box::new(inline_null()),
                },
                self.ty,
            )
        };
        Ok((restrict(y, x), restrict(x, y)))
    }

    /// `AVG(x * x) - AVG(x) * AVG(x)`
    fn var_pop(&self, x: &Expr) -> Expr {
        self.avg(x.clone().mul(x.clone()))
            .sub(self.avg(x.clone()).mul(self.avg(x.clone())))
    }

    /// `(SUM(x * x) - COUNT(x) * AVG(x) * AVG(x)) / NULLIF(COUNT(x) - 1, 0)`
    fn var_samp(&self, x: &Expr) -> Expr {
        self.sum_of_products(x, x)
            .paren()
            .div(nullif_zero(self.count(x.clone()).sub(one())))
    }

    /// `SUM(a * b) - COUNT(a) * AVG(a) * AVG(b)`
    fn sum_of_products(&self, a: &Expr, b: &Expr) -> Expr {
        self.sum(a.clone().mul(b.clone())).sub(
            self.count(a.clone())
                .mul(self.avg(a.clone()))
                .mul(self.avg(b.clone())),
        )
    }

    /// `(Sxy) / NULLIF(Sxx, 0)`
    fn slope(&self, x: &Expr, y: &Expr) -> Expr {
        self.sum_of_products(x, y)
            .paren()
            .div(nullif_zero(self.sum_of_products(x, x)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::aggregate::{count_star, covar_samp, regr_slope, var_pop};
    use crate::sql::dialect::Dialect;
    use crate::sql::error::SqlError;
    use crate::sql::expr::{col, val_str};
    use crate::sql::render::render;

    #[test]
    fn test_filtered_argument_star() {
        let expr = filtered_argument(&Expr::Star { table: None }, &col("active"));
        assert_eq!(
            render(&expr, Dialect::MySql).unwrap().sql,
            "CASE WHEN `active` THEN 1 ELSE NULL END"
        );
    }

    #[test]
    fn test_nvl2_case() {
        let expr = nvl2_case(&col("a"), &col("b"), &col("c"));
        assert_eq!(
            render(&expr, Dialect::Postgres).unwrap().sql,
            "CASE WHEN \"a\" IS NOT NULL THEN \"b\" ELSE \"c\" END"
        );
    }

    #[test]
    fn test_nulls_first_key() {
        let expr = nulls_ordering_key(&col("x"), NullsOrder::First);
        assert_eq!(
            render(&expr, Dialect::TSql).unwrap().sql,
            "CASE WHEN [x] IS NULL THEN 0 ELSE 1 END"
        );
    }

    #[test]
    fn test_split_part_mysql_only() {
        let s = col("s");
        let d = val_str(",");
        let n = inline_int(2);
        let expr = split_part(&s, &d, &n, Dialect::MySql).unwrap();
        let out = render(&expr, Dialect::MySql).unwrap();
        assert_eq!(
            out.sql,
            "SUBSTRING_INDEX(SUBSTRING_INDEX(CONCAT(`s`, REPEAT(?, 2)), ?, 2), ?, -1)"
        );
        assert_eq!(out.binds.len(), 3);

        assert!(matches!(
            split_part(&s, &d, &n, Dialect::TSql),
            Err(SqlError::UnsupportedConstruct { .. })
        ));
    }

    #[test]
    fn test_statistical_cast_type() {
        assert_eq!(statistical_cast_type(Dialect::Sqlite), SqlType::Double);
        assert_eq!(statistical_cast_type(Dialect::Hsqldb), SqlType::Double);
        assert_eq!(statistical_cast_type(Dialect::Firebird), SqlType::Double);
        assert_eq!(statistical_cast_type(Dialect::MySql), SqlType::Numeric);
        assert_eq!(statistical_cast_type(Dialect::Postgres), SqlType::Numeric);
    }

    #[test]
    fn test_var_pop_components() {
        let agg = match var_pop(col("x")).build().unwrap() {
            Expr::Aggregate(agg) => agg,
            other => panic!("unexpected {:?}", other),
        };
        let expr = statistical_aggregate(&agg, Dialect::Sqlite).unwrap();
        assert_eq!(
            render(&expr, Dialect::Sqlite).unwrap().sql,
            "(AVG(CAST(\"x\" AS DOUBLE) * CAST(\"x\" AS DOUBLE)) - \
             AVG(CAST(\"x\" AS DOUBLE)) * AVG(CAST(\"x\" AS DOUBLE)))"
        );
    }

    #[test]
    fn test_emulated_sql_parses() {
        use crate::sql::test_utils::validate_expr_sql;

        let cases = [
            (count_star().filter_where(col("active")).build().unwrap(), Dialect::MySql),
            (covar_samp(col("y"), col("x")).build().unwrap(), Dialect::MySql),
            (regr_slope(col("y"), col("x")).build().unwrap(), Dialect::Sqlite),
            (
                crate::sql::expr::split_part(Some(col("s")), Some(val_str(",")), Some(inline_int(3)))
                    .unwrap(),
                Dialect::MySql,
            ),
        ];
        for (expr, dialect) in cases {
            let out = render(&expr, dialect).unwrap();
            validate_expr_sql(&out.sql, dialect).unwrap();
        }
    }
}
