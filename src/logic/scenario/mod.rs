//! Scenario Module - Synthetic Ground Truth
//!
//! There is no history of real cancellations, so the classifier learns from
//! simulated weather scenarios labelled by a fixed maritime policy.

pub mod generator;
pub mod rules;

pub use generator::{generate_batch, generate_batch_with_rng, LabeledScenario};
pub use rules::label_for;
