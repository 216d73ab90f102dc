//! Run controller: probe the store, then generate and write every batch.

use crate::config::{Config, ConfigError};
use crate::plan::BatchPlan;
use crate::summary::RunSummary;
use biometric_generator::BiometricGenerator;
use clickhouse_sink::{
    mask_dsn_password, probe, write_control_objects, write_feature_vectors, ClickHouseStore,
    ConnectionError, ProbeError, Store, WriteError,
};
use std::fmt;
use std::time::{Duration, Instant};

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("batch size must be greater than zero")]
    InvalidBatchSize,

    #[error("unable to connect to ClickHouse")]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Unreachable(#[from] ProbeError),

    #[error("unable to insert generated {entity} (batch {batch})")]
    Write {
        entity: &'static str,
        /// 1-based batch number.
        batch: u64,
        #[source]
        source: WriteError,
    },
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Connecting,
    Probing,
    Writing { batch: u64 },
    Unreachable,
    Failed,
    Completed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::Connecting => write!(f, "connecting"),
            RunPhase::Probing => write!(f, "probing"),
            RunPhase::Writing { batch } => write!(f, "writing batch {batch}"),
            RunPhase::Unreachable => write!(f, "unreachable"),
            RunPhase::Failed => write!(f, "failed"),
            RunPhase::Completed => write!(f, "completed"),
        }
    }
}

/// Drives one run against a store: probe, then generate and write batches
/// strictly one after another.
pub struct Loader<S: Store> {
    store: S,
    generator: BiometricGenerator,
    plan: BatchPlan,
    max_pings: u32,
    phase: RunPhase,
}

impl<S: Store> Loader<S> {
    pub fn new(store: S, generator: BiometricGenerator, plan: BatchPlan, max_pings: u32) -> Self {
        Self {
            store,
            generator,
            plan,
            max_pings,
            phase: RunPhase::Idle,
        }
    }

    /// Open the store with `open` and build a loader for it.
    ///
    /// On success the loader is left in [`RunPhase::Connecting`]; the probe in
    /// [`Loader::run`] decides whether the store is actually reachable.
    pub fn connect<F>(
        open: F,
        generator: BiometricGenerator,
        plan: BatchPlan,
        max_pings: u32,
    ) -> Result<Self, RunError>
    where
        F: FnOnce() -> Result<S, ConnectionError>,
    {
        tracing::debug!("Run phase: {} -> {}", RunPhase::Idle, RunPhase::Connecting);
        match open() {
            Ok(store) => {
                let mut loader = Self::new(store, generator, plan, max_pings);
                loader.phase = RunPhase::Connecting;
                Ok(loader)
            }
            Err(e) => {
                tracing::debug!("Run phase: {} -> {}", RunPhase::Connecting, RunPhase::Failed);
                Err(e.into())
            }
        }
    }

    /// Current phase of the run.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn enter(&mut self, phase: RunPhase) {
        tracing::debug!("Run phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Probe the store and write every planned batch.
    ///
    /// `started` is the process start time reported in the summary. The first
    /// error ends the run; batches already committed stay committed.
    pub async fn run(&mut self, started: Instant) -> Result<RunSummary, RunError> {
        self.enter(RunPhase::Probing);
        if let Err(e) = probe(&self.store, self.max_pings).await {
            self.enter(RunPhase::Unreachable);
            return Err(e.into());
        }

        match self.write_all(started).await {
            Ok(summary) => {
                self.enter(RunPhase::Completed);
                tracing::info!(
                    "Load complete: {} pairs in {} batches, {:?} ({:.2} pairs/sec)",
                    summary.control_objects,
                    summary.batch_count,
                    summary.elapsed,
                    summary.rows_per_second()
                );
                Ok(summary)
            }
            Err(e) => {
                self.enter(RunPhase::Failed);
                Err(e)
            }
        }
    }

    async fn write_all(&mut self, started: Instant) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary {
            requested: self.plan.total,
            batch_size: self.plan.batch_size,
            ..Default::default()
        };
        let mut generation_time = Duration::ZERO;
        let mut insert_time = Duration::ZERO;

        tracing::info!(
            "Loading {} pairs in {} batches of up to {} (seed: {})",
            self.plan.total,
            self.plan.batch_count(),
            self.plan.batch_size,
            self.generator.seed()
        );

        let plan = self.plan;
        for (batch, size) in (1u64..).zip(plan.sizes()) {
            self.enter(RunPhase::Writing { batch });

            let gen_start = Instant::now();
            let control_objects: Vec<_> = self.generator.control_objects(size).collect();
            generation_time += gen_start.elapsed();

            let insert_start = Instant::now();
            summary.control_objects += write_control_objects(&self.store, &control_objects)
                .await
                .map_err(|source| RunError::Write {
                    entity: "control objects",
                    batch,
                    source,
                })?;
            insert_time += insert_start.elapsed();

            let gen_start = Instant::now();
            let feature_vectors = self.generator.feature_vectors_for(&control_objects);
            generation_time += gen_start.elapsed();

            let insert_start = Instant::now();
            summary.feature_vectors += write_feature_vectors(&self.store, &feature_vectors)
                .await
                .map_err(|source| RunError::Write {
                    entity: "facial features vectors",
                    batch,
                    source,
                })?;
            insert_time += insert_start.elapsed();

            summary.batch_count += 1;
            tracing::debug!(
                "Batch {}/{} complete: {} pairs, {} remaining",
                batch,
                plan.batch_count(),
                size,
                plan.total - summary.control_objects
            );
        }

        summary.elapsed = started.elapsed();
        summary.generation_duration = generation_time;
        summary.insert_duration = insert_time;
        Ok(summary)
    }
}

/// Connect to ClickHouse and load it as configured.
///
/// `dsn` replaces the `storage` section's connection settings when given.
pub async fn run(
    config: &Config,
    dsn: Option<&str>,
    started: Instant,
) -> Result<RunSummary, RunError> {
    config.validate()?;
    let plan = BatchPlan::new(config.generator.n, config.generator.in_iter)?;

    let generator = match config.generator.seed {
        Some(seed) => BiometricGenerator::new(seed),
        None => BiometricGenerator::from_clock(),
    };

    let open = || match dsn {
        Some(dsn) => {
            tracing::info!("Connecting to {}", mask_dsn_password(dsn));
            ClickHouseStore::open(dsn)
        }
        None => {
            let target = config.storage.connection_target();
            tracing::info!("Connecting to {}", mask_dsn_password(&target.dsn()));
            Ok(ClickHouseStore::with_target(target))
        }
    };

    Loader::connect(open, generator, plan, config.storage.max_pings)?
        .run(started)
        .await
}
