//! Planner configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// RRT* tuning parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RrtStarConfig {
    /// Maximum distance a new node may be placed from its nearest tree node
    #[serde(default = "default_steer_length")]
    pub steer_length: f64,

    /// Radius of the neighbourhood used for parent selection, goal connection and rewiring
    #[serde(default = "default_search_radius")]
    pub search_radius: f64,

    /// Wall-clock budget for one `plan()` call, in seconds
    #[serde(default = "default_search_time")]
    pub search_time: f64,

    /// Node pool capacity, including the start and goal slots
    #[serde(default = "default_max_tree_node_nums")]
    pub max_tree_node_nums: usize,

    /// Restrict sampling to the informed ellipsoid once a solution exists
    #[serde(default = "default_use_informed_sampling")]
    pub use_informed_sampling: bool,
}

fn default_steer_length() -> f64 {
    1.0
}
fn default_search_radius() -> f64 {
    2.0
}
fn default_search_time() -> f64 {
    1.0
}
fn default_max_tree_node_nums() -> usize {
    10_000
}
fn default_use_informed_sampling() -> bool {
    true
}

impl Default for RrtStarConfig {
    fn default() -> Self {
        Self {
            steer_length: default_steer_length(),
            search_radius: default_search_radius(),
            search_time: default_search_time(),
            max_tree_node_nums: default_max_tree_node_nums(),
            use_informed_sampling: default_use_informed_sampling(),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(rename = "RRT_Star")]
    rrt_star: Option<RrtStarConfig>,
}

impl RrtStarConfig {
    /// Parse a TOML document. Keys may sit at the top level or under an
    /// `[RRT_Star]` table.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config = match toml::from_str::<ConfigFile>(contents)? {
            ConfigFile {
                rrt_star: Some(section),
            } => section,
            ConfigFile { rrt_star: None } => toml::from_str::<RrtStarConfig>(contents)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("steer_length", self.steer_length),
            ("search_radius", self.search_radius),
            ("search_time", self.search_time),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if Duration::try_from_secs_f64(self.search_time).is_err() {
            return Err(ConfigError::BudgetTooLarge(self.search_time));
        }
        if self.max_tree_node_nums < 2 {
            return Err(ConfigError::CapacityTooSmall(self.max_tree_node_nums));
        }
        Ok(())
    }

    pub fn search_duration(&self) -> Duration {
        // Unvalidated configs saturate instead of panicking
        Duration::try_from_secs_f64(self.search_time).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RrtStarConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_values() {
        let config = RrtStarConfig {
            steer_length: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "steer_length",
                value: 0.0
            })
        );

        let config = RrtStarConfig {
            search_time: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "search_time",
                ..
            })
        ));
    }

    #[test]
    fn rejects_budget_beyond_duration_range() {
        let config = RrtStarConfig {
            search_time: 1e20,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BudgetTooLarge(1e20)));
        assert_eq!(config.search_duration(), Duration::MAX);

        let config = RrtStarConfig {
            search_time: 1e9,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.search_duration(), Duration::from_secs(1_000_000_000));
    }

    #[test]
    fn rejects_capacity_below_two() {
        let config = RrtStarConfig {
            max_tree_node_nums: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::CapacityTooSmall(1)));
    }

    #[test]
    fn parses_sectioned_toml() {
        let config = RrtStarConfig::from_toml_str(
            r#"
            [RRT_Star]
            steer_length = 0.5
            search_radius = 1.5
            search_time = 0.25
            max_tree_node_nums = 500
            use_informed_sampling = false
            "#,
        )
        .unwrap();
        assert_eq!(config.steer_length, 0.5);
        assert_eq!(config.search_radius, 1.5);
        assert_eq!(config.search_time, 0.25);
        assert_eq!(config.max_tree_node_nums, 500);
        assert!(!config.use_informed_sampling);
    }

    #[test]
    fn parses_flat_toml_with_defaults() {
        let config = RrtStarConfig::from_toml_str("search_radius = 3.0").unwrap();
        assert_eq!(config.search_radius, 3.0);
        assert_eq!(config.steer_length, default_steer_length());
        assert_eq!(config.search_duration(), Duration::from_secs(1));
    }

    #[test]
    fn parse_errors_are_reported() {
        assert!(matches!(
            RrtStarConfig::from_toml_str("steer_length = \"far\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RrtStarConfig::from_toml_str("max_tree_node_nums = 0"),
            Err(ConfigError::CapacityTooSmall(0))
        ));
    }
}
