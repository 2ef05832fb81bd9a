//! Prediction request/response

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::logic::{FeatureTriple, RiskAssessment};

pub const DEFAULT_WIND_SPEED: f64 = 0.0;
pub const DEFAULT_WAVE_HEIGHT: f64 = 0.0;
pub const DEFAULT_VISIBILITY: f64 = 10.0;

/// Body of `POST /predict-risk`. Missing or null fields take their defaults;
/// numeric strings are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRiskRequest {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wave_height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub visibility: Option<f64>,
}

/// Weather readings after defaults are applied
#[derive(Debug, Clone, Copy, Validate)]
pub struct WeatherInput {
    #[validate(range(min = 0.0, message = "wind_speed must be >= 0"))]
    pub wind_speed: f64,
    #[validate(range(min = 0.0, message = "wave_height must be >= 0"))]
    pub wave_height: f64,
    #[validate(range(min = 0.0, message = "visibility must be >= 0"))]
    pub visibility: f64,
}

impl PredictRiskRequest {
    pub fn with_defaults(&self) -> WeatherInput {
        WeatherInput {
            wind_speed: self.wind_speed.unwrap_or(DEFAULT_WIND_SPEED),
            wave_height: self.wave_height.unwrap_or(DEFAULT_WAVE_HEIGHT),
            visibility: self.visibility.unwrap_or(DEFAULT_VISIBILITY),
        }
    }
}

impl From<WeatherInput> for FeatureTriple {
    fn from(input: WeatherInput) -> Self {
        FeatureTriple::new(input.wind_speed, input.wave_height, input.visibility)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrText::Number(v)) => v,
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("not a number: {:?}", s)))?,
    };

    if !value.is_finite() {
        return Err(D::Error::custom("value must be finite"));
    }
    Ok(Some(value))
}

/// Per-class probabilities, rounded for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebugProbs {
    pub safe: f64,
    pub caution: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRiskResponse {
    /// Cancellation probability in percent
    pub risk_score: f64,
    pub risk_status: String,
    pub algorithm: String,
    pub dataset_size: usize,
    pub debug_probs: DebugProbs,
}

impl From<RiskAssessment> for PredictRiskResponse {
    fn from(a: RiskAssessment) -> Self {
        Self {
            risk_score: round2(a.cancellation_probability),
            risk_status: a.status.to_string(),
            algorithm: a.algorithm_label(),
            dataset_size: a.dataset_size,
            debug_probs: DebugProbs {
                safe: round2(a.probabilities.safe),
                caution: round2(a.probabilities.caution),
                high: round2(a.probabilities.high),
            },
        }
    }
}

/// Two decimals, ties to even
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
