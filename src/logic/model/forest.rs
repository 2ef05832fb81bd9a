//! Random Forest Ensemble
//!
//! Bagged CART trees. Class probabilities are the mean of the per-tree leaf
//! distributions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::tree::{DecisionTree, TreeConfig};
use super::{ClassProbabilities, Classifier};
use crate::constants::{
    DEFAULT_FOREST_MAX_DEPTH, DEFAULT_FOREST_MAX_FEATURES, DEFAULT_FOREST_MIN_SAMPLES_LEAF,
    DEFAULT_FOREST_TREES,
};
use crate::logic::error::TrainingError;
use crate::logic::features::{FeatureTriple, RiskLabel, CLASS_COUNT};

// ============================================================================
// CONFIG
// ============================================================================

/// Forest hyper-parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,

    /// Max depth per tree
    pub max_depth: usize,

    /// Features examined per split
    pub max_features: usize,

    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,

    /// Fixed seed for bootstrap and feature sampling; wall clock when `None`
    pub seed: Option<u64>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_FOREST_TREES,
            max_depth: DEFAULT_FOREST_MAX_DEPTH,
            max_features: DEFAULT_FOREST_MAX_FEATURES,
            min_samples_leaf: DEFAULT_FOREST_MIN_SAMPLES_LEAF,
            seed: None,
        }
    }
}

impl ForestConfig {
    fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: 2,
            min_samples_leaf: self.min_samples_leaf.max(1),
            max_features: self.max_features,
        }
    }
}

// ============================================================================
// RANDOM FOREST
// ============================================================================

/// Fitted random forest classifier
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    trained_on: usize,
}

impl RandomForest {
    /// Fit a forest from scratch on the given columns
    pub fn fit(
        config: &ForestConfig,
        features: &[FeatureTriple],
        labels: &[RiskLabel],
    ) -> Result<Self, TrainingError> {
        if features.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        if features.is_empty() {
            return Err(TrainingError::EmptyCorpus);
        }
        if let Some(pos) = features.iter().position(|f| !f.is_finite()) {
            return Err(TrainingError::NonFiniteFeature(pos));
        }

        let seed = config.seed.unwrap_or_else(clock_seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let tree_config = config.tree_config();
        let n = features.len();

        let mut trees = Vec::with_capacity(config.n_trees.max(1));
        let mut bootstrap = vec![0usize; n];
        for _ in 0..config.n_trees.max(1) {
            for slot in bootstrap.iter_mut() {
                *slot = rng.gen_range(0..n);
            }
            trees.push(DecisionTree::fit(features, labels, &mut bootstrap, tree_config, &mut rng));
        }

        Ok(Self {
            trees,
            trained_on: n,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of samples the forest was fitted on
    pub fn trained_on(&self) -> usize {
        self.trained_on
    }
}

impl Classifier for RandomForest {
    fn predict_proba(&self, features: &FeatureTriple) -> ClassProbabilities {
        let mut sum = [0.0; CLASS_COUNT];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)) {
                *acc += p;
            }
        }

        let n = self.trees.len() as f64;
        ClassProbabilities::from_array(sum.map(|s| s / n))
    }

    fn name(&self) -> &str {
        "Random Forest"
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scenario::{generate_batch_with_rng, label_for};

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 10,
            max_depth: 10,
            seed: Some(42),
            ..Default::default()
        }
    }

    fn training_data(n: usize) -> (Vec<FeatureTriple>, Vec<RiskLabel>) {
        generate_batch_with_rng(n, &mut StdRng::seed_from_u64(5))
            .into_iter()
            .unzip()
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let config = small_config();
        assert_eq!(RandomForest::fit(&config, &[], &[]).unwrap_err(), TrainingError::EmptyCorpus);

        let f = vec![FeatureTriple::new(1.0, 1.0, 1.0)];
        assert!(matches!(
            RandomForest::fit(&config, &f, &[]),
            Err(TrainingError::LengthMismatch { features: 1, labels: 0 })
        ));

        let f = vec![FeatureTriple::new(1.0, f64::INFINITY, 1.0)];
        assert_eq!(
            RandomForest::fit(&config, &f, &[RiskLabel::Safe]).unwrap_err(),
            TrainingError::NonFiniteFeature(0)
        );
    }

    #[test]
    fn test_probabilities_are_distribution() {
        let (features, labels) = training_data(1000);
        let forest = RandomForest::fit(&small_config(), &features, &labels).unwrap();
        assert_eq!(forest.n_trees(), 10);
        assert_eq!(forest.trained_on(), 1000);

        for x in [
            FeatureTriple::new(0.0, 0.0, 0.0),
            FeatureTriple::new(200.0, 20.0, 100.0),
            FeatureTriple::new(25.0, 1.0, 12.0),
        ] {
            let p = forest.predict_proba(&x).as_array();
            assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_approximates_labeling_policy() {
        let (features, labels) = training_data(5000);
        let forest = RandomForest::fit(&small_config(), &features, &labels).unwrap();

        let (test_x, _) = {
            let batch = generate_batch_with_rng(500, &mut StdRng::seed_from_u64(99));
            batch.into_iter().unzip::<_, _, Vec<_>, Vec<_>>()
        };
        let correct = test_x
            .iter()
            .filter(|x| forest.predict_proba(x).most_likely() == label_for(x))
            .count();

        assert!(correct as f64 / test_x.len() as f64 > 0.9, "accuracy {}/{}", correct, test_x.len());
    }

    #[test]
    fn test_clear_cases() {
        let (features, labels) = training_data(5000);
        let forest = RandomForest::fit(&small_config(), &features, &labels).unwrap();

        let storm = forest.predict_proba(&FeatureTriple::new(80.0, 6.0, 0.5));
        assert_eq!(storm.most_likely(), RiskLabel::HighRisk);

        let calm = forest.predict_proba(&FeatureTriple::new(10.0, 0.5, 20.0));
        assert_eq!(calm.most_likely(), RiskLabel::Safe);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (features, labels) = training_data(500);
        let a = RandomForest::fit(&small_config(), &features, &labels).unwrap();
        let b = RandomForest::fit(&small_config(), &features, &labels).unwrap();

        let x = FeatureTriple::new(33.0, 2.5, 4.0);
        assert_eq!(a.predict_proba(&x), b.predict_proba(&x));
    }
}
