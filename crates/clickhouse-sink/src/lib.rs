//! ClickHouse sink for ffv-loader.
//!
//! This crate provides the two store-facing pieces of the loader:
//!
//! - the connection manager ([`connect`]): building and parsing the
//!   connection string, and probing the store with bounded retries;
//! - the batch writer ([`insert`]): writing a batch of records as a single
//!   transaction (prepare once, execute per row, commit).
//!
//! Both are written against the [`Store`] / [`Transaction`] seam, implemented
//! for a real server by [`ClickHouseStore`] and in memory by
//! [`testing::MemoryStore`].

pub mod client;
pub mod connect;
pub mod error;
pub mod insert;
pub mod rows;
pub mod store;
pub mod testing;

pub use client::ClickHouseStore;
pub use connect::{mask_dsn_password, probe, ConnectionTarget, DEFAULT_HTTP_PORT};
pub use error::{
    ConnectionError, ProbeError, RemoteException, StoreError, WriteError, WriteStage,
};
pub use insert::{write_batch, write_control_objects, write_feature_vectors};
pub use rows::{ControlObjectRow, FacialFeaturesRow};
pub use store::{insert_statement, Record, Store, Transaction};
