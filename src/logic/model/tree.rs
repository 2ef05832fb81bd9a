//! CART Decision Tree
//!
//! Binary classification tree grown with Gini impurity. Nodes live in a flat
//! arena; a split sends `x[feature] <= threshold` to the left child.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::logic::features::{FeatureTriple, RiskLabel, CLASS_COUNT, FEATURE_COUNT};

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split, drawn without replacement
    pub max_features: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: FEATURE_COUNT,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        proba: [f64; CLASS_COUNT],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Number of samples going left
    position: usize,
    impurity: f64,
}

/// Borrowed training columns
struct TrainingView<'a> {
    features: &'a [FeatureTriple],
    labels: &'a [RiskLabel],
}

/// Fitted decision tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    config: TreeConfig,
    depth: usize,
}

impl DecisionTree {
    /// Grow a tree on the samples selected by `indices`.
    ///
    /// `indices` may contain duplicates (bootstrap samples) and is reordered in place.
    /// Callers guarantee `indices` is non-empty and in bounds.
    pub fn fit<R: Rng + ?Sized>(
        features: &[FeatureTriple],
        labels: &[RiskLabel],
        indices: &mut [usize],
        config: TreeConfig,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            config,
            depth: 0,
        };
        let view = TrainingView { features, labels };
        tree.build(&view, indices, 0, rng);
        tree
    }

    /// Class distribution of the leaf reached by `x`
    pub fn predict_proba(&self, x: &FeatureTriple) -> [f64; CLASS_COUNT] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x.get(*feature) <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn build<R: Rng + ?Sized>(
        &mut self,
        data: &TrainingView<'_>,
        indices: &mut [usize],
        depth: usize,
        rng: &mut R,
    ) -> usize {
        self.depth = self.depth.max(depth);
        let n = indices.len();
        let counts = class_counts(data.labels, indices);
        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        if is_pure
            || depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf.max(1)
        {
            return self.push_leaf(&counts, n);
        }

        let Some(split) = self.best_split(data, indices, &counts, rng) else {
            return self.push_leaf(&counts, n);
        };

        sort_by_feature(data.features, indices, split.feature);

        // Reserve the slot so children land after their parent
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            proba: [0.0; CLASS_COUNT],
        });

        let (left_idx, right_idx) = indices.split_at_mut(split.position);
        let left = self.build(data, left_idx, depth + 1, rng);
        let right = self.build(data, right_idx, depth + 1, rng);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn best_split<R: Rng + ?Sized>(
        &self,
        data: &TrainingView<'_>,
        indices: &mut [usize],
        counts: &[usize; CLASS_COUNT],
        rng: &mut R,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let parent = gini(counts, n);

        let mut columns: Vec<usize> = (0..FEATURE_COUNT).collect();
        columns.shuffle(rng);
        columns.truncate(self.config.max_features.clamp(1, FEATURE_COUNT));

        let mut best: Option<SplitCandidate> = None;

        for feature in columns {
            sort_by_feature(data.features, indices, feature);

            let mut left = [0usize; CLASS_COUNT];
            for position in 1..n {
                left[data.labels[indices[position - 1]].index()] += 1;

                if position < min_leaf || n - position < min_leaf {
                    continue;
                }

                let lo = data.features[indices[position - 1]].get(feature);
                let hi = data.features[indices[position]].get(feature);
                if lo >= hi {
                    continue;
                }

                let mut right = [0usize; CLASS_COUNT];
                for class in 0..CLASS_COUNT {
                    right[class] = counts[class] - left[class];
                }

                let impurity = (position as f64 * gini(&left, position)
                    + (n - position) as f64 * gini(&right, n - position))
                    / n as f64;

                if best.map_or(true, |b| impurity < b.impurity) {
                    let mid = lo + (hi - lo) / 2.0;
                    best = Some(SplitCandidate {
                        feature,
                        threshold: if mid < hi { mid } else { lo },
                        position,
                        impurity,
                    });
                }
            }
        }

        best.filter(|b| b.impurity < parent)
    }

    fn push_leaf(&mut self, counts: &[usize; CLASS_COUNT], n: usize) -> usize {
        let mut proba = [0.0; CLASS_COUNT];
        if n > 0 {
            for (p, &c) in proba.iter_mut().zip(counts) {
                *p = c as f64 / n as f64;
            }
        }
        self.nodes.push(Node::Leaf { proba });
        self.nodes.len() - 1
    }
}

fn class_counts(labels: &[RiskLabel], indices: &[usize]) -> [usize; CLASS_COUNT] {
    let mut counts = [0usize; CLASS_COUNT];
    for &i in indices {
        counts[labels[i].index()] += 1;
    }
    counts
}

fn gini(counts: &[usize; CLASS_COUNT], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

fn sort_by_feature(features: &[FeatureTriple], indices: &mut [usize], feature: usize) {
    indices.sort_unstable_by(|&a, &b| features[a].get(feature).total_cmp(&features[b].get(feature)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fit_all(features: &[FeatureTriple], labels: &[RiskLabel], config: TreeConfig) -> DecisionTree {
        let mut indices: Vec<usize> = (0..features.len()).collect();
        DecisionTree::fit(features, labels, &mut indices, config, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4, 0, 0], 4), 0.0);
        assert!((gini(&[1, 1, 0], 2) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[0, 0, 0], 0), 0.0);
    }

    #[test]
    fn test_pure_data_is_single_leaf() {
        let features = vec![FeatureTriple::new(1.0, 1.0, 10.0); 5];
        let labels = vec![RiskLabel::Safe; 5];
        let tree = fit_all(&features, &labels, TreeConfig::default());

        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_proba(&features[0]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_learns_single_threshold() {
        let features: Vec<_> = (0..100).map(|i| FeatureTriple::new(i as f64, 1.0, 10.0)).collect();
        let labels: Vec<_> = features
            .iter()
            .map(|f| if f.wind_speed > 50.0 { RiskLabel::HighRisk } else { RiskLabel::Safe })
            .collect();

        let tree = fit_all(&features, &labels, TreeConfig::default());

        assert_eq!(tree.predict_proba(&FeatureTriple::new(20.0, 1.0, 10.0)), [1.0, 0.0, 0.0]);
        assert_eq!(tree.predict_proba(&FeatureTriple::new(80.0, 1.0, 10.0)), [0.0, 0.0, 1.0]);
        // Midpoint between 50 and 51
        assert_eq!(tree.predict_proba(&FeatureTriple::new(50.4, 1.0, 10.0)), [1.0, 0.0, 0.0]);
        assert_eq!(tree.predict_proba(&FeatureTriple::new(50.6, 1.0, 10.0)), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let features: Vec<_> = (0..64).map(|i| FeatureTriple::new(i as f64, 0.0, 0.0)).collect();
        let labels: Vec<_> = (0..64).map(|i| RiskLabel::ALL[i % 3]).collect();
        let config = TreeConfig {
            max_depth: 2,
            ..Default::default()
        };

        let tree = fit_all(&features, &labels, config);
        assert!(tree.depth() <= 2);
        assert!(tree.n_nodes() <= 7);

        let p = tree.predict_proba(&features[10]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_features_cannot_split() {
        let features = vec![FeatureTriple::new(5.0, 5.0, 5.0); 4];
        let labels = vec![RiskLabel::Safe, RiskLabel::Caution, RiskLabel::Safe, RiskLabel::Caution];
        let tree = fit_all(&features, &labels, TreeConfig::default());

        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_proba(&features[0]), [0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let features: Vec<_> = (0..10).map(|i| FeatureTriple::new(i as f64, 0.0, 0.0)).collect();
        let mut labels = vec![RiskLabel::Safe; 10];
        labels[9] = RiskLabel::HighRisk;
        let config = TreeConfig {
            min_samples_leaf: 3,
            ..Default::default()
        };

        let tree = fit_all(&features, &labels, config);
        // The lone outlier cannot be isolated in its own leaf
        let p = tree.predict_proba(&features[9]);
        assert!(p[2] < 1.0);
    }
}
