#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use sqlmorph::config::RenderSettings;
    use sqlmorph::prelude::*;

    fn sql(expr: &Expr, dialect: Dialect) -> String {
        render(expr, dialect).unwrap().sql
    }

    /// `amount > ? AND region IN (?, ?) AND name LIKE ?`
    fn sample_predicate() -> Expr {
        col("amount")
            .gt(100)
            .and(col("region").in_list(vec![val_str("EU"), val_str("US")]))
            .and(col("name").like("A%"))
    }

    #[test]
    fn test_binds_follow_placeholder_order() {
        let out = render(&sample_predicate(), Dialect::Postgres).unwrap();
        assert_eq!(
            out.sql,
            "\"amount\" > $1 AND \"region\" IN ($2, $3) AND \"name\" LIKE $4"
        );
        let values: Vec<&Value> = out.binds.iter().map(|b| &b.value).collect();
        assert_eq!(
            values,
            vec![
                &Value::Int(100),
                &Value::String("EU".into()),
                &Value::String("US".into()),
                &Value::String("A%".into()),
            ]
        );
    }

    #[test]
    fn test_param_styles_per_dialect() {
        let expr = sample_predicate();
        assert_eq!(
            sql(&expr, Dialect::MySql),
            "`amount` > ? AND `region` IN (?, ?) AND `name` LIKE ?"
        );
        assert_eq!(
            sql(&expr, Dialect::TSql),
            "[amount] > @p1 AND [region] IN (@p2, @p3) AND [name] LIKE @p4"
        );
    }

    #[test]
    fn test_placeholder_count_matches_binds() {
        let expr = sample_predicate().or(col("flag").eq(true));
        for dialect in Dialect::ALL {
            let out = render(&expr, dialect).unwrap();
            assert_eq!(out.binds.len(), 5, "{}", dialect);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let expr = sum(col("x"))
            .filter_where(col("y").gt(1))
            .over(WindowSpec::new().partition_by(vec![col("g")]))
            .build()
            .unwrap();
        for dialect in Dialect::ALL {
            let first = render(&expr, dialect).unwrap();
            let second = render(&expr, dialect).unwrap();
            assert_eq!(first, second, "{}", dialect);
        }
    }

    #[test]
    fn test_render_does_not_mutate_tree() {
        let expr = var_samp(col("x")).filter_where(col("ok")).build().unwrap();
        let before = expr.clone();
        for dialect in Dialect::ALL {
            let _ = render(&expr, dialect);
        }
        assert_eq!(expr, before);
    }

    #[test]
    fn test_count_star_filter_scenario() {
        let expr = count_star().filter_where(col("active")).build().unwrap();
        assert_snapshot!(sql(&expr, Dialect::Postgres), @r#"COUNT(*) FILTER (WHERE "active")"#);
        assert_snapshot!(sql(&expr, Dialect::MySql), @"COUNT(CASE WHEN `active` THEN 1 ELSE NULL END)");
        assert_snapshot!(sql(&expr, Dialect::TSql), @"COUNT(CASE WHEN [active] THEN 1 ELSE NULL END)");
    }

    #[test]
    fn test_filter_binds_emitted_once_natively() {
        let expr = sum(col("x")).filter_where(col("y").eq(5)).build().unwrap();

        let native = render(&expr, Dialect::DuckDb).unwrap();
        assert_eq!(native.sql, "SUM(\"x\") FILTER (WHERE \"y\" = ?)");
        assert_eq!(native.binds.len(), 1);

        let emulated = render(&expr, Dialect::MySql).unwrap();
        assert_eq!(emulated.sql, "SUM(CASE WHEN `y` = ? THEN `x` ELSE NULL END)");
        assert_eq!(emulated.binds.len(), 1);
    }

    #[test]
    fn test_filter_emulation_matches_hand_written_case() {
        let predicate = col("y").eq(5);
        let filtered = sum(col("x")).filter_where(predicate.clone()).build().unwrap();
        let hand_written = sum(case_when(vec![(predicate, col("x"))], Some(inline_null())).unwrap())
            .build()
            .unwrap();

        for dialect in [Dialect::MySql, Dialect::TSql, Dialect::Snowflake, Dialect::BigQuery] {
            assert_eq!(
                render(&filtered, dialect).unwrap(),
                render(&hand_written, dialect).unwrap(),
                "{}",
                dialect
            );
        }
    }

    #[test]
    fn test_operator_precedence_preserved() {
        assert_eq!(
            sql(&col("a").sub(col("b").sub(col("c"))), Dialect::Postgres),
            "\"a\" - (\"b\" - \"c\")"
        );
        assert_eq!(
            sql(&col("a").add(col("b")).mul(col("c")), Dialect::Postgres),
            "(\"a\" + \"b\") * \"c\""
        );
        assert_eq!(
            sql(&col("a").or(col("b")).and(col("c")), Dialect::Postgres),
            "(\"a\" OR \"b\") AND \"c\""
        );

        let total = sum(col("x")).build().unwrap().mul(col("y").add(col("z")));
        assert_eq!(sql(&total, Dialect::MySql), "SUM(`x`) * (`y` + `z`)");

        let outside = col("a").add(1).not_between(0, col("b").sub(1)).or(col("c").not());
        assert_eq!(
            sql(&outside, Dialect::Sqlite),
            "\"a\" + ? NOT BETWEEN ? AND \"b\" - ? OR NOT \"c\""
        );
    }

    #[test]
    fn test_array_agg_order_by_scenario() {
        let expr = array_agg(col("name"))
            .order_by(vec![OrderByExpr::desc(col("name"))])
            .build()
            .unwrap();
        assert_snapshot!(sql(&expr, Dialect::Postgres), @r#"ARRAY_AGG("name" ORDER BY "name" DESC)"#);
        assert_snapshot!(sql(&expr, Dialect::BigQuery), @"ARRAY_AGG(`name` ORDER BY `name` DESC)");
    }

    #[test]
    fn test_unary_and_null_checks() {
        let expr = col("a").neg().lt(0).and(col("b").is_not_null()).and(col("c").not());
        assert_eq!(
            sql(&expr, Dialect::Postgres),
            "- \"a\" < $1 AND \"b\" IS NOT NULL AND NOT \"c\""
        );
    }

    #[test]
    fn test_empty_in_list_renders_constant_predicate() {
        let expr = col("x").in_list(vec![]).or(col("y").not_in_list(vec![]));
        assert_eq!(sql(&expr, Dialect::Sqlite), "1 = 0 OR 1 = 1");
    }

    #[test]
    fn test_rendering_overflow_at_default_limit() {
        let mut expr = col("x");
        for _ in 0..300 {
            expr = expr.paren();
        }
        assert_eq!(
            render(&expr, Dialect::Postgres),
            Err(SqlError::RenderingOverflow { limit: 256 })
        );

        let mut shallow = col("x");
        for _ in 0..100 {
            shallow = shallow.paren();
        }
        assert!(render(&shallow, Dialect::Postgres).is_ok());
    }

    #[test]
    fn test_settings_change_param_style() {
        let settings = RenderSettings {
            param_style: Some(ParamStyle::Dollar),
            ..RenderSettings::default()
        };
        let out = Renderer::new(Dialect::Sqlite)
            .with_settings(settings)
            .render(&col("a").eq(1).and(col("b").eq(2)))
            .unwrap();
        assert_eq!(out.sql, "\"a\" = $1 AND \"b\" = $2");
    }

    #[test]
    fn test_concurrent_rendering() {
        let expr = covar_pop(col("y"), col("x"))
            .filter_where(col("w").gt(0))
            .build()
            .unwrap();
        let expected: Vec<Rendered> = Dialect::ALL
            .iter()
            .map(|d| render(&expr, *d).unwrap())
            .collect();

        std::thread::scope(|s| {
            let handles: Vec<_> = Dialect::ALL
                .iter()
                .map(|d| {
                    let expr = &expr;
                    s.spawn(move || render(expr, *d).unwrap())
                })
                .collect();
            for (handle, want) in handles.into_iter().zip(&expected) {
                assert_eq!(&handle.join().unwrap(), want);
            }
        });
    }

    #[test]
    fn test_json_tree_renders() {
        let json = r#"{"aggregate": {
            "function": "sum",
            "args": [{"column": {"column": "amount"}}],
            "filter": {"binary_op": {
                "left": {"column": {"column": "status"}},
                "op": "eq",
                "right": {"literal": {"value": "paid", "ty": "varchar"}}
            }}
        }}"#;
        let expr: Expr = serde_json::from_str(json).unwrap();
        expr.validate().unwrap();

        let out = render(&expr, Dialect::Snowflake).unwrap();
        assert_eq!(
            out.sql,
            "SUM(CASE WHEN \"status\" = ? THEN \"amount\" ELSE NULL END)"
        );
        assert_eq!(out.binds[0].value, Value::String("paid".into()));
    }

    #[test]
    fn test_rendered_serializes_to_json() {
        let out = render(&col("a").eq(7), Dialect::Postgres).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["sql"], "\"a\" = $1");
        assert_eq!(json["binds"][0]["value"], 7);
        assert_eq!(json["binds"][0]["ty"], "integer");
    }
}
