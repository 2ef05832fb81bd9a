//! Synthetic Scenario Generator
//!
//! Draws independent uniform weather samples and labels each one with the
//! ground-truth policy from `rules`.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

use super::rules::{label_for, VISIBILITY_RANGE, WAVE_RANGE, WIND_RANGE};
use crate::logic::features::{FeatureTriple, RiskLabel};

/// One generated sample and its policy label
pub type LabeledScenario = (FeatureTriple, RiskLabel);

/// Generate `size` labelled scenarios.
///
/// The RNG is re-seeded from the wall clock on every call so successive
/// batches form a non-repeating stream.
pub fn generate_batch(size: usize) -> Vec<LabeledScenario> {
    let mut rng = StdRng::seed_from_u64(clock_seed());
    generate_batch_with_rng(size, &mut rng)
}

/// Generate `size` labelled scenarios from the supplied RNG
pub fn generate_batch_with_rng<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<LabeledScenario> {
    let winds = Uniform::new_inclusive(WIND_RANGE.0, WIND_RANGE.1);
    let waves = Uniform::new_inclusive(WAVE_RANGE.0, WAVE_RANGE.1);
    let visibility = Uniform::new_inclusive(VISIBILITY_RANGE.0, VISIBILITY_RANGE.1);

    (0..size)
        .map(|_| {
            let features = FeatureTriple::new(
                winds.sample(rng),
                waves.sample(rng),
                visibility.sample(rng),
            );
            (features, label_for(&features))
        })
        .collect()
}

/// Nanoseconds since the Unix epoch, folded into a u64 seed
fn clock_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    (nanos ^ (nanos >> 64)) as u64
}
