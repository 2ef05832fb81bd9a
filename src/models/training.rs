//! Trainer status model

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logic::{TrainerContext, TrainerState};

#[derive(Debug, Serialize)]
pub struct TrainingStatusResponse {
    pub state: TrainerState,
    pub cycle: u64,
    pub dataset_size: usize,
    pub batch_size: usize,
    pub interval_secs: u64,
    pub ready: bool,
    /// Corpus size the published classifier was fitted on
    pub last_trained_on: Option<usize>,
    pub last_trained_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl TrainingStatusResponse {
    pub fn from_context(ctx: &TrainerContext) -> Self {
        let snapshot = ctx.snapshot().load();
        Self {
            state: ctx.state(),
            cycle: ctx.cycle(),
            dataset_size: ctx.dataset_size(),
            batch_size: ctx.config().batch_size,
            interval_secs: ctx.config().interval.as_secs(),
            ready: snapshot.is_some(),
            last_trained_on: snapshot.as_ref().map(|s| s.trained_on),
            last_trained_at: snapshot.as_ref().map(|s| s.trained_at),
            last_error: ctx.last_error(),
        }
    }
}
