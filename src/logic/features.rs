//! Feature Triple and Risk Label
//!
//! The input to classification and the three ground-truth classes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features in a triple
pub const FEATURE_COUNT: usize = 3;

/// Number of risk classes
pub const CLASS_COUNT: usize = 3;

/// Weather conditions at a port
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureTriple {
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wave height in metres
    pub wave_height: f64,
    /// Visibility in km
    pub visibility: f64,
}

impl FeatureTriple {
    pub const fn new(wind_speed: f64, wave_height: f64, visibility: f64) -> Self {
        Self {
            wind_speed,
            wave_height,
            visibility,
        }
    }

    /// Feature value by column index (0 = wind, 1 = wave, 2 = visibility)
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        match index {
            0 => self.wind_speed,
            1 => self.wave_height,
            _ => self.visibility,
        }
    }

    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [self.wind_speed, self.wave_height, self.visibility]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

/// Ground-truth risk class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    Safe = 0,
    Caution = 1,
    HighRisk = 2,
}

impl RiskLabel {
    pub const ALL: [RiskLabel; CLASS_COUNT] = [RiskLabel::Safe, RiskLabel::Caution, RiskLabel::HighRisk];

    /// Class index used by the classifier
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::Caution => "Caution",
            RiskLabel::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
