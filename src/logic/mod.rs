//! Core continuous-learning logic
//!
//! Generator → Corpus → Trainer → published classifier → Estimator.

pub mod corpus;
pub mod error;
pub mod estimator;
pub mod features;
pub mod model;
pub mod scenario;
pub mod trainer;

pub use error::{EstimateError, TrainingError};
pub use estimator::RiskAssessment;
pub use features::{FeatureTriple, RiskLabel};
pub use trainer::{TrainerConfig, TrainerContext, TrainerHandle, TrainerState};
