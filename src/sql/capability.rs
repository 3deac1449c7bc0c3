//! Dialect capability registry.
//!
//! Every emulation decision in the renderer is a single lookup here:
//! "does dialect D render feature F natively?". The built-in table is
//! assembled from each dialect's [`SqlDialect::native_features`] and may be
//! adjusted once at process start from configuration. It is never mutated
//! while rendering.
//!
//! | Feature              | Emulation when missing                         |
//! |----------------------|------------------------------------------------|
//! | AggregateFilter      | `CASE WHEN p THEN arg ELSE NULL END` per arg   |
//! | DistinctRowValue     | DISTINCT over bare argument list               |
//! | NullsOrdering        | `CASE WHEN x IS NULL ...` sort key             |
//! | GroupsFrame          | none (UnsupportedConstruct)                    |
//! | NamedWindows         | inline window definition                       |
//! | ConcatOperator       | `CONCAT(a, b)`                                 |
//! | SplitPart            | `SUBSTRING_INDEX` (MySQL) or none              |
//! | Nvl2                 | `CASE WHEN v IS NOT NULL ...`                  |
//! | Variance/Covariance/Regression aggregates | SUM/COUNT arithmetic      |

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::dialect::{Dialect, SqlDialect};
use crate::config::{Settings, SettingsError};

/// A SQL feature a dialect may or may not render natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// `AGG(x) FILTER (WHERE p)`
    AggregateFilter,
    /// `AGG(DISTINCT(a, b))`
    DistinctRowValue,
    /// `ORDER BY x NULLS FIRST`
    NullsOrdering,
    /// `GROUPS BETWEEN ...` window frames
    GroupsFrame,
    /// `OVER w` referring to a `WINDOW w AS (...)` clause
    NamedWindows,
    /// Infix string concatenation operator
    ConcatOperator,
    /// `SPLIT_PART(s, d, n)`
    SplitPart,
    /// `NVL2(v, a, b)`
    Nvl2,
    /// VAR_POP, VAR_SAMP, STDDEV_POP, STDDEV_SAMP
    VarianceAggregates,
    /// COVAR_POP, COVAR_SAMP
    CovarianceAggregates,
    /// REGR_* linear regression aggregates
    RegressionAggregates,
}

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::AggregateFilter,
        Feature::DistinctRowValue,
        Feature::NullsOrdering,
        Feature::GroupsFrame,
        Feature::NamedWindows,
        Feature::ConcatOperator,
        Feature::SplitPart,
        Feature::Nvl2,
        Feature::VarianceAggregates,
        Feature::CovarianceAggregates,
        Feature::RegressionAggregates,
    ];

    /// Configuration name of this feature.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::AggregateFilter => "aggregate_filter",
            Feature::DistinctRowValue => "distinct_row_value",
            Feature::NullsOrdering => "nulls_ordering",
            Feature::GroupsFrame => "groups_frame",
            Feature::NamedWindows => "named_windows",
            Feature::ConcatOperator => "concat_operator",
            Feature::SplitPart => "split_part",
            Feature::Nvl2 => "nvl2",
            Feature::VarianceAggregates => "variance_aggregates",
            Feature::CovarianceAggregates => "covariance_aggregates",
            Feature::RegressionAggregates => "regression_aggregates",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or_else(|| format!("Unknown feature: {}", s))
    }
}

/// Static mapping from dialect name to natively supported features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRegistry {
    table: HashMap<String, HashSet<Feature>>,
}

impl CapabilityRegistry {
    /// Registry built from every dialect's declared native features.
    pub fn builtin() -> Self {
        let table = Dialect::ALL
            .into_iter()
            .map(|d| {
                (
                    d.name().to_string(),
                    d.native_features().iter().copied().collect(),
                )
            })
            .collect();
        Self { table }
    }

    /// Registry with no features for any dialect.
    ///
    /// Every construct that has an emulation is emulated.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Built-in registry with the `[capabilities.<dialect>]` overrides applied.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let mut registry = Self::builtin();

        for (name, overrides) in &settings.capabilities {
            let dialect: Dialect = name.parse().map_err(SettingsError::InvalidConfig)?;
            let features = registry
                .table
                .entry(dialect.name().to_string())
                .or_default();

            for feature in &overrides.enable {
                let feature: Feature = feature.parse().map_err(SettingsError::InvalidConfig)?;
                features.insert(feature);
            }
            for feature in &overrides.disable {
                let feature: Feature = feature.parse().map_err(SettingsError::InvalidConfig)?;
                features.remove(&feature);
            }

            tracing::debug!(
                dialect = %dialect,
                enabled = overrides.enable.len(),
                disabled = overrides.disable.len(),
                "applied capability overrides"
            );
        }

        Ok(registry)
    }

    /// Whether `dialect` renders `feature` natively.
    pub fn supports(&self, feature: Feature, dialect: Dialect) -> bool {
        self.supports_named(feature, dialect.name())
    }

    /// Lookup by dialect name. Unknown names support nothing.
    pub fn supports_named(&self, feature: Feature, dialect: &str) -> bool {
        self.table
            .get(&dialect.to_lowercase())
            .is_some_and(|features| features.contains(&feature))
    }

    /// Native features of `dialect`, sorted.
    pub fn features(&self, dialect: Dialect) -> Vec<Feature> {
        let mut features: Vec<Feature> = self
            .table
            .get(dialect.name())
            .map(|f| f.iter().copied().collect())
            .unwrap_or_default();
        features.sort();
        features
    }

    /// Mark `feature` as native for `dialect`.
    pub fn enable(mut self, dialect: Dialect, feature: Feature) -> Self {
        self.table
            .entry(dialect.name().to_string())
            .or_default()
            .insert(feature);
        self
    }

    /// Mark `feature` as missing for `dialect`.
    pub fn disable(mut self, dialect: Dialect, feature: Feature) -> Self {
        if let Some(features) = self.table.get_mut(dialect.name()) {
            features.remove(&feature);
        }
        self
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

static REGISTRY: OnceCell<CapabilityRegistry> = OnceCell::new();

/// The process-wide registry. Falls back to [`CapabilityRegistry::builtin`]
/// when nothing was installed.
pub fn global() -> &'static CapabilityRegistry {
    REGISTRY.get_or_init(CapabilityRegistry::builtin)
}

/// Install the process-wide registry.
///
/// Only the first call (or the first render, which installs the built-in
/// table) wins. A rejected registry is handed back.
pub fn install(registry: CapabilityRegistry) -> Result<(), CapabilityRegistry> {
    REGISTRY.set(registry)
}

/// `supports(feature, dialect)` against the process-wide registry.
pub fn supports(feature: Feature, dialect: Dialect) -> bool {
    global().supports(feature, dialect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_filter_support() {
        let registry = CapabilityRegistry::builtin();
        assert!(registry.supports(Feature::AggregateFilter, Dialect::Postgres));
        assert!(registry.supports(Feature::AggregateFilter, Dialect::Sqlite));
        assert!(registry.supports(Feature::AggregateFilter, Dialect::H2));
        assert!(registry.supports(Feature::AggregateFilter, Dialect::Hsqldb));
        assert!(!registry.supports(Feature::AggregateFilter, Dialect::MySql));
        assert!(!registry.supports(Feature::AggregateFilter, Dialect::TSql));
    }

    #[test]
    fn test_builtin_distinct_row_value() {
        let registry = CapabilityRegistry::builtin();
        let supported: Vec<Dialect> = Dialect::ALL
            .into_iter()
            .filter(|d| registry.supports(Feature::DistinctRowValue, *d))
            .collect();
        assert_eq!(supported, vec![Dialect::Postgres, Dialect::H2]);
    }

    #[test]
    fn test_unknown_dialect_supports_nothing() {
        let registry = CapabilityRegistry::builtin();
        for feature in Feature::ALL {
            assert!(!registry.supports_named(feature, "oracle"));
        }
        assert!(registry.supports_named(Feature::AggregateFilter, "POSTGRES"));
    }

    #[test]
    fn test_enable_disable() {
        let registry = CapabilityRegistry::builtin()
            .enable(Dialect::MySql, Feature::NullsOrdering)
            .disable(Dialect::Postgres, Feature::AggregateFilter);
        assert!(registry.supports(Feature::NullsOrdering, Dialect::MySql));
        assert!(!registry.supports(Feature::AggregateFilter, Dialect::Postgres));
    }

    #[test]
    fn test_empty_registry() {
        let registry = CapabilityRegistry::empty();
        for d in Dialect::ALL {
            assert!(registry.features(d).is_empty());
        }
    }

    #[test]
    fn test_feature_names() {
        for f in Feature::ALL {
            assert_eq!(f.name().parse::<Feature>(), Ok(f));
        }
        assert!("window_magic".parse::<Feature>().is_err());
    }

    #[test]
    fn test_features_sorted() {
        let features = CapabilityRegistry::builtin().features(Dialect::MySql);
        assert_eq!(
            features,
            vec![Feature::NamedWindows, Feature::VarianceAggregates]
        );
    }
}
