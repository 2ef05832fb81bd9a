//! Core error types

use thiserror::Error;

/// Why a training cycle was abandoned
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainingError {
    #[error("training corpus is empty")]
    EmptyCorpus,

    #[error("training corpus has {actual} samples, need at least {required}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("non-finite feature value at sample {0}")]
    NonFiniteFeature(usize),

    #[error("feature/label length mismatch ({features} features, {labels} labels)")]
    LengthMismatch { features: usize, labels: usize },

    #[error("training task failed: {0}")]
    TaskFailed(String),
}

/// Why an estimate could not be produced
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimateError {
    #[error("classifier not ready: no training cycle has completed yet")]
    NotReady,
}
