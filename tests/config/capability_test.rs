#[cfg(test)]
mod tests {
    use sqlmorph::config::{Settings, SettingsError};
    use sqlmorph::prelude::*;
    use std::fs;

    #[test]
    fn test_builtin_matrix_spot_checks() {
        let registry = CapabilityRegistry::builtin();
        assert!(registry.supports(Feature::AggregateFilter, Dialect::Postgres));
        assert!(!registry.supports(Feature::AggregateFilter, Dialect::MySql));
        assert!(registry.supports(Feature::SplitPart, Dialect::Snowflake));
        assert!(!registry.supports(Feature::SplitPart, Dialect::TSql));
        assert!(registry.supports(Feature::Nvl2, Dialect::Redshift));
        assert!(!registry.supports(Feature::NamedWindows, Dialect::TSql));
    }

    #[test]
    fn test_unknown_dialect_supports_nothing() {
        let registry = CapabilityRegistry::builtin();
        for feature in Feature::ALL {
            assert!(!registry.supports_named(feature, "oracle"), "{}", feature);
        }
        assert!(registry.supports_named(Feature::AggregateFilter, "POSTGRES"));
    }

    #[test]
    fn test_empty_registry_emulates_everything() {
        let registry = CapabilityRegistry::empty();
        let expr = count_star().filter_where(col("active")).build().unwrap();
        let out = Renderer::new(Dialect::Postgres)
            .with_registry(&registry)
            .render(&expr)
            .unwrap();
        assert_eq!(out.sql, "COUNT(CASE WHEN \"active\" THEN 1 ELSE NULL END)");
    }

    #[test]
    fn test_overrides_from_toml() {
        let settings = Settings::from_toml(
            r#"
            [capabilities.mysql]
            enable = ["aggregate_filter", "NULLS_ORDERING"]

            [capabilities.postgres]
            disable = ["aggregate_filter"]
            "#,
        )
        .unwrap();
        let registry = CapabilityRegistry::from_settings(&settings).unwrap();

        assert!(registry.supports(Feature::AggregateFilter, Dialect::MySql));
        assert!(registry.supports(Feature::NullsOrdering, Dialect::MySql));
        assert!(!registry.supports(Feature::AggregateFilter, Dialect::Postgres));
        // Untouched features keep their built-in value
        assert!(registry.supports(Feature::NamedWindows, Dialect::MySql));
        assert!(registry.supports(Feature::SplitPart, Dialect::Postgres));

        let expr = count_star().filter_where(col("active")).build().unwrap();
        let renderer = Renderer::new(Dialect::Postgres).with_registry(&registry);
        assert_eq!(
            renderer.render(&expr).unwrap().sql,
            "COUNT(CASE WHEN \"active\" THEN 1 ELSE NULL END)"
        );
    }

    #[test]
    fn test_invalid_override_names() {
        let settings = Settings::from_toml("[capabilities.oracle]\nenable = [\"nvl2\"]\n").unwrap();
        match CapabilityRegistry::from_settings(&settings) {
            Err(SettingsError::InvalidConfig(msg)) => assert_eq!(msg, "Unknown dialect: oracle"),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }

        let settings = Settings::from_toml("[capabilities.mysql]\nenable = [\"pivot\"]\n").unwrap();
        match CapabilityRegistry::from_settings(&settings) {
            Err(SettingsError::InvalidConfig(msg)) => assert_eq!(msg, "Unknown feature: pivot"),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_render_settings_from_toml() {
        let settings = Settings::from_toml(
            r#"
            [render]
            max_depth = 4
            param_style = "colon"
            "#,
        )
        .unwrap();

        let renderer = Renderer::new(Dialect::Postgres).with_settings(settings.render.clone());
        assert_eq!(renderer.render(&col("a").eq(1)).unwrap().sql, "\"a\" = :1");

        let deep = col("a").paren().paren().paren().paren();
        assert_eq!(
            renderer.render(&deep),
            Err(SqlError::RenderingOverflow { limit: 4 })
        );
    }

    #[test]
    fn test_zero_depth_rejected() {
        let result = Settings::from_toml("[render]\nmax_depth = 0\n");
        assert!(matches!(result, Err(SettingsError::InvalidConfig(_))));
    }

    #[test]
    fn test_settings_from_file() {
        let dir = std::env::temp_dir().join(format!("sqlmorph-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sqlmorph.toml");
        fs::write(&path, "[capabilities.tsql]\nenable = [\"split_part\"]\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        let registry = CapabilityRegistry::from_settings(&settings).unwrap();
        assert!(registry.supports(Feature::SplitPart, Dialect::TSql));

        fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(
            Settings::from_file(&path),
            Err(SettingsError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_features_listing_sorted() {
        let features = CapabilityRegistry::builtin().features(Dialect::MySql);
        assert_eq!(
            features,
            vec![Feature::NamedWindows, Feature::VarianceAggregates]
        );
    }
}
