//! Risk Estimator
//!
//! Turns class probabilities from the published classifier into a
//! cancellation percentage and a status.

use serde::Serialize;

use super::error::EstimateError;
use super::features::{FeatureTriple, RiskLabel};
use super::model::{ClassProbabilities, ClassifierSnapshot};
use super::trainer::TrainerContext;

// ============================================================================
// BLENDING WEIGHTS
// ============================================================================

/// High Risk means mandatory cancellation
pub const HIGH_RISK_WEIGHT: f64 = 100.0;

/// Caution is left to the captain, who cancels about 40% of the time
pub const CAUTION_WEIGHT: f64 = 40.0;

/// Reported percentage never reaches certainty in either direction
pub const MIN_CANCELLATION_PCT: f64 = 0.1;
pub const MAX_CANCELLATION_PCT: f64 = 99.9;

// ============================================================================
// STATUS THRESHOLDS (strict, boundary values fall to the lower bucket)
// ============================================================================

pub const HIGH_RISK_ABOVE: f64 = 75.0;
pub const CAUTION_ABOVE: f64 = 30.0;

/// Result of one estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Cancellation probability in percent, within [0.1, 99.9]
    pub cancellation_probability: f64,
    pub status: RiskLabel,
    pub probabilities: ClassProbabilities,
    pub algorithm: String,
    /// Cycle that produced the snapshot used for this answer
    pub snapshot_cycle: u64,
    /// Training cycle counter at the time of the call
    pub cycle: u64,
    /// Corpus size at the time of the call
    pub dataset_size: usize,
}

impl RiskAssessment {
    /// e.g. "Random Forest (Continuous Learning - Cycle 12)"
    pub fn algorithm_label(&self) -> String {
        format!("{} (Continuous Learning - Cycle {})", self.algorithm, self.snapshot_cycle)
    }
}

/// Blend class probabilities into a clamped cancellation percentage
pub fn cancellation_percentage(p: &ClassProbabilities) -> f64 {
    let raw = p.high * HIGH_RISK_WEIGHT + p.caution * CAUTION_WEIGHT;
    raw.clamp(MIN_CANCELLATION_PCT, MAX_CANCELLATION_PCT)
}

/// Status bucket for a (clamped) cancellation percentage
pub fn status_for(pct: f64) -> RiskLabel {
    if pct > HIGH_RISK_ABOVE {
        RiskLabel::HighRisk
    } else if pct > CAUTION_ABOVE {
        RiskLabel::Caution
    } else {
        RiskLabel::Safe
    }
}

/// Score a triple against a specific snapshot
pub fn assess(snapshot: &ClassifierSnapshot, features: &FeatureTriple) -> (f64, RiskLabel, ClassProbabilities) {
    let probabilities = snapshot.predict_proba(features);
    let pct = cancellation_percentage(&probabilities);
    (pct, status_for(pct), probabilities)
}

/// Score a triple against whatever classifier is currently published.
///
/// Never waits for training; fails with `NotReady` until the first cycle publishes.
pub fn estimate(ctx: &TrainerContext, features: &FeatureTriple) -> Result<RiskAssessment, EstimateError> {
    let snapshot = ctx.snapshot().load().ok_or(EstimateError::NotReady)?;
    let (pct, status, probabilities) = assess(&snapshot, features);

    tracing::debug!(
        "Estimate {:?} -> {:.2}% {} (snapshot cycle {})",
        features,
        pct,
        status,
        snapshot.cycle
    );

    Ok(RiskAssessment {
        cancellation_probability: pct,
        status,
        probabilities,
        algorithm: snapshot.algorithm().to_string(),
        snapshot_cycle: snapshot.cycle,
        cycle: ctx.cycle(),
        dataset_size: ctx.dataset_size(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::Classifier;

    fn pct(safe: f64, caution: f64, high: f64) -> f64 {
        cancellation_percentage(&ClassProbabilities::new(safe, caution, high))
    }

    #[test]
    fn test_blending_formula() {
        let p = pct(0.1, 0.3, 0.6);
        assert!((p - 72.0).abs() < 1e-9);
        assert_eq!(status_for(p), RiskLabel::Caution);
    }

    #[test]
    fn test_clamped_to_upper_bound() {
        let p = pct(0.0, 0.0, 1.0);
        assert_eq!(p, 99.9);
        assert_eq!(status_for(p), RiskLabel::HighRisk);
    }

    #[test]
    fn test_clamped_to_lower_bound() {
        let p = pct(1.0, 0.0, 0.0);
        assert_eq!(p, 0.1);
        assert_eq!(status_for(p), RiskLabel::Safe);
    }

    #[test]
    fn test_all_caution() {
        assert_eq!(pct(0.0, 1.0, 0.0), 40.0);
        assert_eq!(status_for(40.0), RiskLabel::Caution);
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(status_for(75.0), RiskLabel::Caution);
        assert_eq!(status_for(75.0001), RiskLabel::HighRisk);
        assert_eq!(status_for(30.0), RiskLabel::Safe);
        assert_eq!(status_for(30.0001), RiskLabel::Caution);
    }

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
    fn test_assess_uses_snapshot() {
        let snapshot = ClassifierSnapshot::new(
            Box::new(Fixed(ClassProbabilities::new(0.0, 0.25, 0.7))),
            3,
            100,
        );
        let (p, status, probs) = assess(&snapshot, &FeatureTriple::new(0.0, 0.0, 10.0));

        assert!((p - 80.0).abs() < 1e-9);
        assert_eq!(status, RiskLabel::HighRisk);
        assert_eq!(probs.caution, 0.25);
    }

    #[test]
    fn test_algorithm_label() {
        let a = RiskAssessment {
            cancellation_probability: 0.1,
            status: RiskLabel::Safe,
            probabilities: ClassProbabilities::new(1.0, 0.0, 0.0),
            algorithm: "Random Forest".to_string(),
            snapshot_cycle: 7,
            cycle: 8,
            dataset_size: 35000,
        };
        assert_eq!(a.algorithm_label(), "Random Forest (Continuous Learning - Cycle 7)");
    }

    #[test]
    fn test_label_names_scoring_snapshot_not_counter() {
        let ctx = TrainerContext::new(Default::default());
        // Published but the counter has not been bumped yet
        ctx.snapshot().publish(ClassifierSnapshot::new(
            Box::new(Fixed(ClassProbabilities::new(0.0, 1.0, 0.0))),
            5,
            0,
        ));

        let a = estimate(&ctx, &FeatureTriple::new(40.0, 1.0, 10.0)).unwrap();
        assert_eq!(a.cycle, 0);
        assert_eq!(a.snapshot_cycle, 5);
        assert_eq!(a.algorithm_label(), "Fixed (Continuous Learning - Cycle 5)");
        assert_eq!(a.cancellation_probability, 40.0);
    }
}
