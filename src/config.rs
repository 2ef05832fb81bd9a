//! Configuration module

use std::env;
use std::time::Duration;

use crate::constants::*;
use crate::logic::model::ForestConfig;
use crate::logic::TrainerConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Samples generated per training cycle
    pub batch_size: usize,

    /// Pause between training cycles in seconds
    pub training_interval_secs: u64,

    /// Corpus size below which the trainer refuses to fit
    pub min_training_samples: usize,

    /// Random forest hyper-parameters
    pub forest_trees: usize,
    pub forest_max_depth: usize,
    pub forest_max_features: usize,
    pub forest_min_samples_leaf: usize,

    /// Fixed forest seed (tests and reproducible demos)
    pub forest_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Zero or unparsable sizes fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let positive = |key: &str, default: usize| -> usize {
            lookup(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(default)
        };

        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),

            batch_size: positive("TRAINING_BATCH_SIZE", DEFAULT_BATCH_SIZE),

            training_interval_secs: lookup("TRAINING_INTERVAL_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|&s| s > 0)
                .unwrap_or(DEFAULT_TRAINING_INTERVAL_SECS),

            min_training_samples: positive("MIN_TRAINING_SAMPLES", DEFAULT_MIN_TRAINING_SAMPLES),

            forest_trees: positive("FOREST_TREES", DEFAULT_FOREST_TREES),
            forest_max_depth: positive("FOREST_MAX_DEPTH", DEFAULT_FOREST_MAX_DEPTH),
            forest_max_features: positive("FOREST_MAX_FEATURES", DEFAULT_FOREST_MAX_FEATURES),
            forest_min_samples_leaf: positive("FOREST_MIN_SAMPLES_LEAF", DEFAULT_FOREST_MIN_SAMPLES_LEAF),

            forest_seed: lookup("FOREST_SEED").and_then(|s| s.trim().parse().ok()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Trainer settings derived from this configuration
    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            batch_size: self.batch_size,
            interval: Duration::from_secs(self.training_interval_secs),
            min_training_samples: self.min_training_samples,
            forest: ForestConfig {
                n_trees: self.forest_trees,
                max_depth: self.forest_max_depth,
                max_features: self.forest_max_features,
                min_samples_leaf: self.forest_min_samples_leaf,
                seed: self.forest_seed,
            },
        }
    }
}
