#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use sqlmorph::prelude::*;

    fn sql(expr: &Expr, dialect: Dialect) -> String {
        render(expr, dialect).unwrap().sql
    }

    fn unsupported_construct(result: std::result::Result<Rendered, SqlError>) -> String {
        match result {
            Err(SqlError::UnsupportedConstruct { construct, .. }) => construct,
            other => panic!("expected UnsupportedConstruct, got {:?}", other),
        }
    }

    // -------------------------------------------------------------------------
    // Statistical aggregates
    // -------------------------------------------------------------------------

    #[test]
    fn test_var_pop_emulated_on_sqlite() {
        let expr = var_pop(col("x")).build().unwrap();
        assert_snapshot!(
            sql(&expr, Dialect::Sqlite),
            @r#"(AVG(CAST("x" AS DOUBLE) * CAST("x" AS DOUBLE)) - AVG(CAST("x" AS DOUBLE)) * AVG(CAST("x" AS DOUBLE)))"#
        );
    }

    #[test]
    fn test_stddev_samp_wraps_sample_variance() {
        let out = sql(&stddev_samp(col("x")).build().unwrap(), Dialect::Sqlite);
        assert!(out.starts_with("(SQRT((SUM(CAST(\"x\" AS DOUBLE) * CAST(\"x\" AS DOUBLE))"));
        assert!(out.contains("/ NULLIF(COUNT(CAST(\"x\" AS DOUBLE)) - 1, 0)"));
        assert!(out.ends_with("))"));
    }

    #[test]
    fn test_statistical_emulation_keeps_filter_and_window() {
        let expr = var_pop(col("x"))
            .filter_where(col("kind").eq("a"))
            .over(WindowSpec::new().partition_by(vec![col("g")]))
            .build()
            .unwrap();
        let out = render(&expr, Dialect::Sqlite).unwrap();

        // AVG(x * x), AVG(x), AVG(x)
        assert_eq!(out.sql.matches("AVG(").count(), 3);
        assert_eq!(out.sql.matches("FILTER (WHERE \"kind\" = ?)").count(), 3);
        assert_eq!(out.sql.matches("OVER (PARTITION BY \"g\")").count(), 3);
        assert_eq!(out.binds.len(), 3);
        assert!(out
            .binds
            .iter()
            .all(|b| b.value == Value::String("a".into())));
    }

    #[test]
    fn test_covariance_filter_folded_into_components() {
        let expr = covar_pop(col("y"), col("x"))
            .filter_where(col("w").gt(0))
            .build()
            .unwrap();
        let out = render(&expr, Dialect::MySql).unwrap();

        assert!(out.sql.starts_with("(AVG(CASE WHEN `w` > ? THEN"));
        assert_eq!(out.sql.matches("CASE WHEN `w` > ?").count(), 3);
        assert!(!out.sql.contains("FILTER"));
        assert_eq!(out.binds.len(), 3);
        assert!(out.sql.contains("CAST(CASE WHEN `x` IS NOT NULL THEN `y` ELSE NULL END AS DECIMAL(65, 30))"));
        assert!(out.sql.contains("CAST(CASE WHEN `y` IS NOT NULL THEN `x` ELSE NULL END AS DECIMAL(65, 30))"));
    }

    #[test]
    fn test_regression_uses_native_nvl2_where_available() {
        let out = sql(&regr_count(col("y"), col("x")).build().unwrap(), Dialect::Redshift);
        assert_eq!(out, "(COUNT(CAST(NVL2(\"y\", \"x\", NULL) AS DECIMAL(38, 10))))");
    }

    #[test]
    fn test_regression_native_on_postgres() {
        let expr = regr_slope(col("y"), col("x")).build().unwrap();
        assert_eq!(sql(&expr, Dialect::Postgres), "REGR_SLOPE(\"y\", \"x\")");
    }

    #[test]
    fn test_regr_intercept_structure() {
        let out = sql(&regr_intercept(col("y"), col("x")).build().unwrap(), Dialect::Sqlite);
        // AVG(Yr) - (slope) * AVG(Xr)
        assert!(out.starts_with("(AVG(CAST(CASE WHEN \"x\" IS NOT NULL THEN \"y\" ELSE NULL END AS DOUBLE)) - ("));
        assert_eq!(out.matches("NULLIF(").count(), 1);
    }

    #[test]
    fn test_distinct_statistical_aggregate_unsupported() {
        let expr = var_pop(col("x")).distinct().build().unwrap();
        assert_eq!(
            unsupported_construct(render(&expr, Dialect::Sqlite)),
            "DISTINCT VAR_POP"
        );
        assert_eq!(sql(&expr, Dialect::Postgres), "VAR_POP(DISTINCT \"x\")");
    }

    #[test]
    fn test_registry_override_forces_emulation() {
        let registry =
            CapabilityRegistry::builtin().disable(Dialect::Postgres, Feature::VarianceAggregates);
        let out = Renderer::new(Dialect::Postgres)
            .with_registry(&registry)
            .render(&var_pop(col("x")).build().unwrap())
            .unwrap();
        assert!(out.sql.contains("CAST(\"x\" AS NUMERIC)"));
        assert!(!out.sql.contains("VAR_POP"));
    }

    // -------------------------------------------------------------------------
    // FILTER, DISTINCT and window clauses
    // -------------------------------------------------------------------------

    #[test]
    fn test_registry_override_enables_filter() {
        let registry = CapabilityRegistry::builtin().enable(Dialect::MySql, Feature::AggregateFilter);
        let expr = count_star().filter_where(col("active")).build().unwrap();
        let out = Renderer::new(Dialect::MySql)
            .with_registry(&registry)
            .render(&expr)
            .unwrap();
        assert_eq!(out.sql, "COUNT(*) FILTER (WHERE `active`)");
    }

    // Row-value DISTINCT counts distinct tuples, but where it is missing the
    // fallback counts rows whose arguments are all non-null. The two can
    // differ when some arguments are NULL.
    #[test]
    fn test_distinct_row_value_divergence() {
        let expr = count_distinct(vec![col("a"), col("b")]).build().unwrap();
        assert_snapshot!(sql(&expr, Dialect::H2), @r#"COUNT(DISTINCT("a", "b"))"#);
        assert_snapshot!(sql(&expr, Dialect::MySql), @"COUNT(DISTINCT `a`, `b`)");
    }

    #[test]
    fn test_nulls_ordering_duplicates_binds() {
        let expr = func("ROW_NUMBER", vec![])
            .over()
            .order_by(vec![OrderByExpr::asc(col("a").add(1)).nulls_first()])
            .build()
            .unwrap();

        let out = render(&expr, Dialect::MySql).unwrap();
        assert_eq!(
            out.sql,
            "ROW_NUMBER() OVER (ORDER BY CASE WHEN `a` + ? IS NULL THEN 0 ELSE 1 END, `a` + ? ASC)"
        );
        assert_eq!(out.binds.len(), 2);

        let native = render(&expr, Dialect::Postgres).unwrap();
        assert_eq!(
            native.sql,
            "ROW_NUMBER() OVER (ORDER BY \"a\" + $1 ASC NULLS FIRST)"
        );
        assert_eq!(native.binds.len(), 1);
    }

    #[test]
    fn test_named_window_unsupported() {
        let expr = sum(col("x")).over_named("w").build().unwrap();
        assert_eq!(sql(&expr, Dialect::Postgres), "SUM(\"x\") OVER \"w\"");
        assert_eq!(
            unsupported_construct(render(&expr, Dialect::TSql)),
            "named window reference"
        );
    }

    #[test]
    fn test_groups_frame_unsupported() {
        let expr = sum(col("x"))
            .over(
                WindowSpec::new()
                    .order_by(vec![OrderByExpr::new(col("d"))])
                    .frame(WindowFrame::new(
                        WindowFrameKind::Groups,
                        WindowFrameBound::UnboundedPreceding,
                    )),
            )
            .build()
            .unwrap();
        assert!(render(&expr, Dialect::DuckDb).is_ok());
        assert_eq!(
            unsupported_construct(render(&expr, Dialect::BigQuery)),
            "GROUPS window frame"
        );
    }

    // -------------------------------------------------------------------------
    // Scalar emulations
    // -------------------------------------------------------------------------

    #[test]
    fn test_split_part_duplicates_binds_on_mysql() {
        let expr = split_part(Some(val_str("a,b,c")), Some(val_str(",")), Some(inline_int(2))).unwrap();
        let out = render(&expr, Dialect::MySql).unwrap();
        assert_eq!(
            out.sql,
            "SUBSTRING_INDEX(SUBSTRING_INDEX(CONCAT(?, REPEAT(?, 2)), ?, 2), ?, -1)"
        );
        let values: Vec<&Value> = out.binds.iter().map(|b| &b.value).collect();
        assert_eq!(
            values,
            vec![
                &Value::String("a,b,c".into()),
                &Value::String(",".into()),
                &Value::String(",".into()),
                &Value::String(",".into()),
            ]
        );
    }

    #[test]
    fn test_split_part_native_and_unsupported() {
        let expr = split_part(Some(col("s")), Some(inline_str(",")), Some(inline_int(1))).unwrap();
        assert_eq!(sql(&expr, Dialect::Postgres), "SPLIT_PART(\"s\", ',', 1)");
        assert_eq!(unsupported_construct(render(&expr, Dialect::TSql)), "SPLIT_PART");
    }

    #[test]
    fn test_nvl2_emulation() {
        let expr = nvl2(col("a"), val_int(1), Some(val_int(0)));
        let out = render(&expr, Dialect::Postgres).unwrap();
        assert_eq!(out.sql, "CASE WHEN \"a\" IS NOT NULL THEN $1 ELSE $2 END");
        assert_eq!(out.binds.len(), 2);

        assert_eq!(sql(&expr, Dialect::Redshift), "NVL2(\"a\", $1, $2)");
    }

    #[test]
    fn test_nvl2_emulation_groups_operator_operand() {
        let expr = nvl2(col("a").or(col("b")), val_int(1), Some(val_int(2)));
        assert_eq!(
            sql(&expr, Dialect::Postgres),
            "CASE WHEN (\"a\" OR \"b\") IS NOT NULL THEN $1 ELSE $2 END"
        );
        assert_eq!(sql(&expr, Dialect::Snowflake), "NVL2(\"a\" OR \"b\", ?, ?)");
    }

    #[test]
    fn test_nulls_ordering_key_groups_operator_operand() {
        let expr = func("ROW_NUMBER", vec![])
            .over()
            .order_by(vec![OrderByExpr::asc(col("a").not()).nulls_first()])
            .build()
            .unwrap();
        assert_eq!(
            sql(&expr, Dialect::MySql),
            "ROW_NUMBER() OVER (ORDER BY CASE WHEN (NOT `a`) IS NULL THEN 0 ELSE 1 END, NOT `a` ASC)"
        );
    }

    #[test]
    fn test_concat_without_operator() {
        let expr = col("first").concat(" ").concat(col("last"));
        assert_eq!(sql(&expr, Dialect::MySql), "CONCAT(CONCAT(`first`, ?), `last`)");
        assert_eq!(sql(&expr, Dialect::DuckDb), "\"first\" || ? || \"last\"");
    }
}
