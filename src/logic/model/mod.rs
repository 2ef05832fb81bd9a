//! Model Module - Classifier and Published Snapshot
//!
//! Training is separate from inference: the trainer fits a `RandomForest`,
//! wraps it in a `ClassifierSnapshot` and publishes it through a `SnapshotCell`.
//! Predictions only ever read the cell.

pub mod forest;
pub mod snapshot;
pub mod tree;

// Re-export common types
pub use forest::{ForestConfig, RandomForest};
pub use snapshot::{ClassifierSnapshot, SnapshotCell};
pub use tree::{DecisionTree, TreeConfig};

use serde::{Deserialize, Serialize};

use super::features::{FeatureTriple, RiskLabel, CLASS_COUNT};

/// Per-class probabilities for Safe, Caution and High Risk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ClassProbabilities {
    pub safe: f64,
    pub caution: f64,
    pub high: f64,
}

impl ClassProbabilities {
    pub const fn new(safe: f64, caution: f64, high: f64) -> Self {
        Self { safe, caution, high }
    }

    pub fn from_array(p: [f64; CLASS_COUNT]) -> Self {
        Self::new(p[0], p[1], p[2])
    }

    pub fn as_array(&self) -> [f64; CLASS_COUNT] {
        [self.safe, self.caution, self.high]
    }

    /// Class with the highest probability (ties go to the lower severity)
    pub fn most_likely(&self) -> RiskLabel {
        let p = self.as_array();
        let mut best = 0;
        for i in 1..CLASS_COUNT {
            if p[i] > p[best] {
                best = i;
            }
        }
        RiskLabel::ALL[best]
    }
}

/// Anything that can score a feature triple.
///
/// Implementations must be immutable after construction so a published
/// snapshot can be shared freely across request tasks.
pub trait Classifier: Send + Sync {
    fn predict_proba(&self, features: &FeatureTriple) -> ClassProbabilities;

    /// Human-readable algorithm name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_likely() {
        assert_eq!(ClassProbabilities::new(0.1, 0.3, 0.6).most_likely(), RiskLabel::HighRisk);
        assert_eq!(ClassProbabilities::new(0.5, 0.5, 0.0).most_likely(), RiskLabel::Safe);
        assert_eq!(ClassProbabilities::new(0.2, 0.7, 0.1).most_likely(), RiskLabel::Caution);
    }

    #[test]
    fn test_array_layout() {
        let p = ClassProbabilities::from_array([0.2, 0.3, 0.5]);
        assert_eq!((p.safe, p.caution, p.high), (0.2, 0.3, 0.5));
        assert_eq!(p.as_array(), [0.2, 0.3, 0.5]);
    }
}
