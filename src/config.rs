use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

use crate::qualification::EstimatorConfig;
use crate::registry::{self, Registry};

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_RANKINGS_SEED: u64 = 2026;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    // None means the bundled sample registry.
    pub data_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub rankings_seed: u64,
    pub estimator: EstimatorConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            rankings_seed: DEFAULT_RANKINGS_SEED,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| {
            lookup(key).and_then(|val| {
                let trimmed = val.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let mut cfg = Self::default();
        if let Some(path) = opt("WC26_DATA_PATH") {
            cfg.data_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = opt("WC26_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(dir);
        }
        cfg.rankings_seed = parse_or(opt("WC26_RANKINGS_SEED"), "WC26_RANKINGS_SEED", cfg.rankings_seed);

        let est = &mut cfg.estimator;
        est.points_weight = parse_or(opt("WC26_WEIGHT_POINTS"), "WC26_WEIGHT_POINTS", est.points_weight);
        est.ranking_weight = parse_or(opt("WC26_WEIGHT_RANKING"), "WC26_WEIGHT_RANKING", est.ranking_weight);
        est.goal_diff_weight = parse_or(
            opt("WC26_WEIGHT_GOAL_DIFF"),
            "WC26_WEIGHT_GOAL_DIFF",
            est.goal_diff_weight,
        );
        cfg
    }

    pub fn load_registry(&self) -> Result<Registry> {
        match self.data_path.as_deref() {
            Some(path) => registry::load_registry(path),
            None => Ok(registry::sample_registry()?.clone()),
        }
    }
}

fn parse_or<T: FromStr + Copy>(raw: Option<String>, key: &str, fallback: T) -> T {
    let Some(raw) = raw else {
        return fallback;
    };
    match raw.parse::<T>() {
        Ok(val) => val,
        Err(_) => {
            log::warn!("ignoring unparsable {key}={raw}");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::AnalyticsConfig;

    #[test]
    fn empty_and_bad_values_fall_back_to_defaults() {
        let vars = HashMap::from([
            ("WC26_OUTPUT_DIR", "  "),
            ("WC26_RANKINGS_SEED", "not-a-number"),
            ("WC26_WEIGHT_POINTS", "0.6"),
        ]);
        let cfg = AnalyticsConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        let d = AnalyticsConfig::default();
        assert_eq!(cfg.output_dir, d.output_dir);
        assert_eq!(cfg.rankings_seed, d.rankings_seed);
        assert_eq!(cfg.estimator.points_weight, 0.6);
        assert_eq!(cfg.estimator.ranking_weight, 0.3);
    }

    #[test]
    fn data_path_is_read() {
        let cfg = AnalyticsConfig::from_lookup(|k| {
            (k == "WC26_DATA_PATH").then(|| "data/custom.json".to_string())
        });
        assert_eq!(cfg.data_path, Some(PathBuf::from("data/custom.json")));
    }
}
