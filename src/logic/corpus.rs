//! Training Corpus
//!
//! Append-only accumulation of labelled scenarios. Features and labels share
//! one lock so a reader never sees one without the other.

use parking_lot::RwLock;

use super::features::{FeatureTriple, RiskLabel};
use super::scenario::LabeledScenario;

#[derive(Debug, Default)]
struct CorpusData {
    features: Vec<FeatureTriple>,
    labels: Vec<RiskLabel>,
}

/// Point-in-time copy of the corpus
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    pub features: Vec<FeatureTriple>,
    pub labels: Vec<RiskLabel>,
}

impl CorpusSnapshot {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Unbounded, arrival-ordered training corpus. Nothing is ever evicted.
#[derive(Debug, Default)]
pub struct TrainingCorpus {
    data: RwLock<CorpusData>,
}

impl TrainingCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch at the end, all or nothing. Returns the new size.
    pub fn append(&self, batch: Vec<LabeledScenario>) -> usize {
        let (features, labels): (Vec<_>, Vec<_>) = batch.into_iter().unzip();

        let mut data = self.data.write();
        data.features.extend(features);
        data.labels.extend(labels);
        data.labels.len()
    }

    /// Full copy of the corpus as of this call
    pub fn snapshot(&self) -> CorpusSnapshot {
        let data = self.data.read();
        CorpusSnapshot {
            features: data.features.clone(),
            labels: data.labels.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scenario::generate_batch;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_append_preserves_order() {
        let corpus = TrainingCorpus::new();
        let first = generate_batch(3);
        let second = generate_batch(2);

        assert_eq!(corpus.append(first.clone()), 3);
        assert_eq!(corpus.append(second.clone()), 5);

        let snap = corpus.snapshot();
        let expected: Vec<_> = first.into_iter().chain(second).collect();
        let actual: Vec<_> = snap.features.into_iter().zip(snap.labels).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_append() {
        let corpus = TrainingCorpus::new();
        assert_eq!(corpus.append(Vec::new()), 0);
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_concurrent_append_and_snapshot_stay_aligned() {
        let corpus = Arc::new(TrainingCorpus::new());

        let writer = {
            let corpus = Arc::clone(&corpus);
            thread::spawn(move || {
                for _ in 0..200 {
                    corpus.append(generate_batch(50));
                }
            })
        };

        let mut last = 0;
        for _ in 0..200 {
            let snap = corpus.snapshot();
            assert_eq!(snap.features.len(), snap.labels.len());
            assert_eq!(snap.len() % 50, 0);
            assert!(snap.len() >= last);
            last = snap.len();
        }

        writer.join().unwrap();
        assert_eq!(corpus.len(), 200 * 50);
    }
}
