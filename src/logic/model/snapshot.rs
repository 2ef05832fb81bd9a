//! Classifier Snapshot
//!
//! The published model is an `Arc` behind a `RwLock`. Readers clone the `Arc`
//! and drop the lock at once; the writer only holds the lock for the swap, so
//! a reader sees either the old or the new snapshot in full.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use super::{ClassProbabilities, Classifier};
use crate::logic::features::FeatureTriple;

/// A fully trained classifier plus where it came from
pub struct ClassifierSnapshot {
    classifier: Box<dyn Classifier>,
    /// Training cycle that produced it
    pub cycle: u64,
    /// Corpus size it was fitted on
    pub trained_on: usize,
    pub trained_at: DateTime<Utc>,
}

impl ClassifierSnapshot {
    pub fn new(classifier: Box<dyn Classifier>, cycle: u64, trained_on: usize) -> Self {
        Self {
            classifier,
            cycle,
            trained_on,
            trained_at: Utc::now(),
        }
    }

    pub fn predict_proba(&self, features: &FeatureTriple) -> ClassProbabilities {
        self.classifier.predict_proba(features)
    }

    pub fn algorithm(&self) -> &str {
        self.classifier.name()
    }
}

impl std::fmt::Debug for ClassifierSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierSnapshot")
            .field("algorithm", &self.algorithm())
            .field("cycle", &self.cycle)
            .field("trained_on", &self.trained_on)
            .field("trained_at", &self.trained_at)
            .finish()
    }
}

/// Single-writer, multi-reader slot holding the current snapshot
#[derive(Debug, Default)]
pub struct SnapshotCell {
    current: RwLock<Option<Arc<ClassifierSnapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, if any has been published
    pub fn load(&self) -> Option<Arc<ClassifierSnapshot>> {
        self.current.read().clone()
    }

    /// Replace the current snapshot, returning the previous one
    pub fn publish(&self, snapshot: ClassifierSnapshot) -> Option<Arc<ClassifierSnapshot>> {
        let next = Arc::new(snapshot);
        self.current.write().replace(next)
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(ClassProbabilities);

    impl Classifier for Fixed {
        fn predict_proba(&self, _: &FeatureTriple) -> ClassProbabilities {
            self.0
        }

        fn name(&self) -> &str {
            "Fixed"
        }
    }

    #[test]
    fn test_empty_cell() {
        let cell = SnapshotCell::new();
        assert!(!cell.is_ready());
        assert!(cell.load().is_none());
    }

    #[test]
    fn test_publish_replaces_and_old_readers_keep_theirs() {
        let cell = SnapshotCell::new();
        let first = ClassProbabilities::new(1.0, 0.0, 0.0);
        let second = ClassProbabilities::new(0.0, 0.0, 1.0);

        assert!(cell.publish(ClassifierSnapshot::new(Box::new(Fixed(first)), 1, 10)).is_none());
        let held = cell.load().unwrap();

        let previous = cell.publish(ClassifierSnapshot::new(Box::new(Fixed(second)), 2, 20));
        assert_eq!(previous.unwrap().cycle, 1);

        let x = FeatureTriple::new(0.0, 0.0, 0.0);
        assert_eq!(held.predict_proba(&x), first);
        assert_eq!(cell.load().unwrap().predict_proba(&x), second);
        assert_eq!(cell.load().unwrap().trained_on, 20);
        assert_eq!(held.algorithm(), "Fixed");
    }
}
