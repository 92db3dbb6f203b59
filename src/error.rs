//! Error types for planner configuration

use thiserror::Error;

/// Rejected planner configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite and greater than zero, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("search_time of {0} seconds does not fit in a Duration")]
    BudgetTooLarge(f64),

    #[error("max_tree_node_nums must be at least 2 (start and goal), got {0}")]
    CapacityTooSmall(usize),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
