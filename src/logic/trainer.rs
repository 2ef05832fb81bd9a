//! Continuous Trainer
//!
//! Each cycle generates a batch, appends it to the corpus, retrains a forest
//! from scratch on the whole corpus and publishes it. A failed fit leaves the
//! previous snapshot in place; the next cycle retries with a larger corpus.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::corpus::{CorpusSnapshot, TrainingCorpus};
use super::error::{EstimateError, TrainingError};
use super::estimator::{self, RiskAssessment};
use super::features::FeatureTriple;
use super::model::{ClassifierSnapshot, ForestConfig, RandomForest, SnapshotCell};
use super::scenario::generate_batch;
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_MIN_TRAINING_SAMPLES, DEFAULT_TRAINING_INTERVAL_SECS};

// ============================================================================
// CONFIG & STATE
// ============================================================================

/// Trainer configuration
#[derive(Debug, Clone, Serialize)]
pub struct TrainerConfig {
    /// Samples generated per cycle
    pub batch_size: usize,

    /// Pause between cycles
    pub interval: Duration,

    /// Corpus size below which a fit is refused
    pub min_training_samples: usize,

    pub forest: ForestConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            interval: Duration::from_secs(DEFAULT_TRAINING_INTERVAL_SECS),
            min_training_samples: DEFAULT_MIN_TRAINING_SAMPLES,
            forest: ForestConfig::default(),
        }
    }
}

/// Where the trainer is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainerState {
    Idle,
    Generating,
    Appending,
    Retraining,
    Publishing,
    Stopped,
}

/// Summary of a completed cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub dataset_size: usize,
    pub duration_ms: u64,
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Training state shared by the background task and request handlers
#[derive(Debug)]
pub struct TrainerContext {
    config: TrainerConfig,
    corpus: TrainingCorpus,
    snapshot: SnapshotCell,
    cycle: AtomicU64,
    state: RwLock<TrainerState>,
    last_error: RwLock<Option<String>>,
    /// Serializes cycles so there is only ever one writer
    cycle_guard: Mutex<()>,
}

impl TrainerContext {
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            corpus: TrainingCorpus::new(),
            snapshot: SnapshotCell::new(),
            cycle: AtomicU64::new(0),
            state: RwLock::new(TrainerState::Idle),
            last_error: RwLock::new(None),
            cycle_guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &SnapshotCell {
        &self.snapshot
    }

    /// Number of published training cycles
    pub fn cycle(&self) -> u64 {
        self.cycle.load(Ordering::Acquire)
    }

    pub fn dataset_size(&self) -> usize {
        self.corpus.len()
    }

    pub fn state(&self) -> TrainerState {
        *self.state.read()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    pub fn estimate(&self, features: &FeatureTriple) -> Result<RiskAssessment, EstimateError> {
        estimator::estimate(self, features)
    }

    fn set_state(&self, state: TrainerState) {
        *self.state.write() = state;
    }

    /// Run one generate → append → retrain → publish pass on the calling thread
    pub fn run_cycle(&self) -> Result<CycleReport, TrainingError> {
        let _guard = self.cycle_guard.lock();
        let started = Instant::now();

        self.set_state(TrainerState::Generating);
        let batch = generate_batch(self.config.batch_size);

        self.set_state(TrainerState::Appending);
        self.corpus.append(batch);

        self.set_state(TrainerState::Retraining);
        let data = self.corpus.snapshot();
        let forest = match self.fit(&data) {
            Ok(forest) => forest,
            Err(e) => {
                self.mark_failed(&e);
                return Err(e);
            }
        };

        self.set_state(TrainerState::Publishing);
        let cycle = self.cycle.load(Ordering::Acquire) + 1;
        self.snapshot
            .publish(ClassifierSnapshot::new(Box::new(forest), cycle, data.len()));
        self.cycle.store(cycle, Ordering::Release);
        *self.last_error.write() = None;
        self.set_state(TrainerState::Idle);

        Ok(CycleReport {
            cycle,
            dataset_size: data.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn fit(&self, data: &CorpusSnapshot) -> Result<RandomForest, TrainingError> {
        if data.is_empty() {
            return Err(TrainingError::EmptyCorpus);
        }
        if data.len() < self.config.min_training_samples {
            return Err(TrainingError::InsufficientSamples {
                required: self.config.min_training_samples,
                actual: data.len(),
            });
        }
        RandomForest::fit(&self.config.forest, &data.features, &data.labels)
    }

    fn mark_failed(&self, error: &TrainingError) {
        *self.last_error.write() = Some(error.to_string());
        if self.state() != TrainerState::Stopped {
            self.set_state(TrainerState::Idle);
        }
    }
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// Run one cycle on the blocking pool so request tasks keep being served
pub async fn run_cycle_blocking(ctx: Arc<TrainerContext>) -> Result<CycleReport, TrainingError> {
    let worker = Arc::clone(&ctx);
    match tokio::task::spawn_blocking(move || worker.run_cycle()).await {
        Ok(result) => result,
        Err(e) => {
            let error = TrainingError::TaskFailed(e.to_string());
            ctx.mark_failed(&error);
            Err(error)
        }
    }
}

/// Initial cycle so the first request finds a published classifier
pub async fn bootstrap(ctx: &Arc<TrainerContext>) -> Result<CycleReport, TrainingError> {
    tracing::info!(
        "Bootstrapping classifier ({} samples, {} trees)...",
        ctx.config.batch_size,
        ctx.config.forest.n_trees
    );
    let report = run_cycle_blocking(Arc::clone(ctx)).await?;
    tracing::info!(
        "Initial classifier ready: cycle {}, {} samples, {}ms",
        report.cycle,
        report.dataset_size,
        report.duration_ms
    );
    Ok(report)
}

/// Handle to the running trainer task
#[derive(Debug)]
pub struct TrainerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TrainerHandle {
    /// Start the continuous training loop on the current runtime
    pub fn spawn(ctx: Arc<TrainerContext>) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run_loop(ctx, stop_rx));
        Self { stop_tx, task }
    }

    /// Signal the loop to stop and wait for it. A cycle already running is
    /// allowed to finish.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            tracing::error!("Trainer task ended abnormally: {}", e);
        }
    }
}

async fn run_loop(ctx: Arc<TrainerContext>, mut stop_rx: watch::Receiver<bool>) {
    tracing::info!(
        "Continuous training started (batch {}, every {:?})",
        ctx.config.batch_size,
        ctx.config.interval
    );

    loop {
        tokio::select! {
            _ = tokio::time::sleep(ctx.config.interval) => {}
            changed = stop_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        if *stop_rx.borrow() {
            break;
        }

        match run_cycle_blocking(Arc::clone(&ctx)).await {
            Ok(report) => tracing::info!(
                "Training cycle {} complete: {} samples in {}ms",
                report.cycle,
                report.dataset_size,
                report.duration_ms
            ),
            Err(e) => tracing::warn!("Training cycle abandoned, keeping previous classifier: {}", e),
        }
    }

    ctx.set_state(TrainerState::Stopped);
    tracing::info!("Continuous training stopped after {} cycles", ctx.cycle());
}
