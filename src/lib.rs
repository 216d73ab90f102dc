//! ffv-loader library
//!
//! A synthetic data generator and bulk loader for ClickHouse. It generates
//! control objects (person records) and their facial features vectors and
//! writes them in batches, one transaction per batch and entity, after
//! probing the store for liveness.
//!
//! # Crates
//!
//! - `biometric_generator` - seeded record generation
//! - `clickhouse_sink` - connection, liveness probe and batched inserts
//!
//! # CLI Usage
//!
//! ```bash
//! ffv-loader --config loader.yaml
//!
//! # Override the record count and seed, without touching the store
//! ffv-loader --config loader.yaml --row-count 10 --seed 42 --dry-run
//! ```

pub mod args;
pub mod config;
pub mod plan;
pub mod run;
pub mod summary;

pub use args::LoadArgs;
pub use config::{Config, ConfigError};
pub use plan::BatchPlan;
pub use run::{run, Loader, RunError, RunPhase};
pub use summary::RunSummary;
