//! Central Configuration Constants
//!
//! Defaults used when the environment does not override them.

/// Default listening port (the booking site calls 127.0.0.1:5000)
pub const DEFAULT_PORT: u16 = 5000;

/// Samples generated per training cycle
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Pause between training cycles (seconds)
pub const DEFAULT_TRAINING_INTERVAL_SECS: u64 = 10;

/// Smallest corpus the trainer will fit on
pub const DEFAULT_MIN_TRAINING_SAMPLES: usize = 10;

/// Random forest defaults
pub const DEFAULT_FOREST_TREES: usize = 50;
pub const DEFAULT_FOREST_MAX_DEPTH: usize = 12;
pub const DEFAULT_FOREST_MAX_FEATURES: usize = 2;
pub const DEFAULT_FOREST_MIN_SAMPLES_LEAF: usize = 1;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Ferry Risk";
