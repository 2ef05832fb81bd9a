//! Ground-Truth Labeling Policy
//!
//! Constants and the labeling function only. Sampling lives in `generator`.

use crate::logic::features::{FeatureTriple, RiskLabel};

// ============================================================================
// SAMPLING RANGES
// ============================================================================

/// Wind speed range (km/h)
pub const WIND_RANGE: (f64, f64) = (0.0, 90.0);

/// Wave height range (m)
pub const WAVE_RANGE: (f64, f64) = (0.0, 8.0);

/// Visibility range (km)
pub const VISIBILITY_RANGE: (f64, f64) = (0.0, 30.0);

// ============================================================================
// HIGH RISK (mandatory cancellation)
// ============================================================================

/// Strong gale
pub const HIGH_RISK_WIND: f64 = 50.0;

/// Very rough sea
pub const HIGH_RISK_WAVE: f64 = 3.5;

/// Severe fog
pub const HIGH_RISK_VISIBILITY: f64 = 1.0;

// ============================================================================
// CAUTION (captain's discretion)
// ============================================================================

/// Fresh breeze
pub const CAUTION_WIND: f64 = 30.0;

/// Moderate to rough sea
pub const CAUTION_WAVE: f64 = 2.0;

/// Mist
pub const CAUTION_VISIBILITY: f64 = 5.0;

/// Label a scenario. Rules are checked in order, first match wins.
/// Wind and wave thresholds are strict `>`, visibility thresholds strict `<`.
pub fn label_for(features: &FeatureTriple) -> RiskLabel {
    let FeatureTriple {
        wind_speed: w,
        wave_height: h,
        visibility: v,
    } = *features;

    if w > HIGH_RISK_WIND || h > HIGH_RISK_WAVE || v < HIGH_RISK_VISIBILITY {
        RiskLabel::HighRisk
    } else if w > CAUTION_WIND || h > CAUTION_WAVE || v < CAUTION_VISIBILITY {
        RiskLabel::Caution
    } else {
        RiskLabel::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(w: f64, h: f64, v: f64) -> RiskLabel {
        label_for(&FeatureTriple::new(w, h, v))
    }

    #[test]
    fn test_reference_scenarios() {
        assert_eq!(label(60.0, 1.0, 10.0), RiskLabel::HighRisk);
        assert_eq!(label(35.0, 1.0, 10.0), RiskLabel::Caution);
        assert_eq!(label(10.0, 1.0, 10.0), RiskLabel::Safe);
    }

    #[test]
    fn test_wind_boundary_is_strict() {
        assert_eq!(label(50.0, 1.0, 10.0), RiskLabel::Caution);
        assert_eq!(label(50.0001, 1.0, 10.0), RiskLabel::HighRisk);
        assert_eq!(label(30.0, 1.0, 10.0), RiskLabel::Safe);
    }

    #[test]
    fn test_wave_and_visibility_boundaries() {
        assert_eq!(label(10.0, 3.5, 10.0), RiskLabel::Caution);
        assert_eq!(label(10.0, 3.51, 10.0), RiskLabel::HighRisk);
        assert_eq!(label(10.0, 2.0, 10.0), RiskLabel::Safe);

        assert_eq!(label(10.0, 1.0, 1.0), RiskLabel::Caution);
        assert_eq!(label(10.0, 1.0, 0.99), RiskLabel::HighRisk);
        assert_eq!(label(10.0, 1.0, 5.0), RiskLabel::Safe);
        assert_eq!(label(10.0, 1.0, 4.99), RiskLabel::Caution);
    }

    #[test]
    fn test_high_risk_wins_over_caution() {
        // Caution wind but fog is severe
        assert_eq!(label(35.0, 1.0, 0.5), RiskLabel::HighRisk);
    }

    #[test]
    fn test_out_of_range_inputs() {
        assert_eq!(label(150.0, 0.0, 100.0), RiskLabel::HighRisk);
        assert_eq!(label(0.0, 0.0, 100.0), RiskLabel::Safe);
    }
}
