//! The seam between the batch writer and a concrete store.
//!
//! A [`Store`] hands out [`Transaction`]s scoped to a single batch. A
//! transaction is prepared once, executed once per row and committed; dropping
//! it without committing discards every row written to it.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::Serialize;

/// An entity that can be written to the store.
pub trait Record: Send + Sync + 'static {
    /// Destination table.
    const TABLE: &'static str;
    /// Destination columns, in the order the wire row serializes them.
    const COLUMNS: &'static [&'static str];

    /// Row type sent over the wire.
    type Row: clickhouse::Row + Serialize + Send + Sync + 'static;

    /// Convert this record into its wire row.
    fn to_row(&self) -> Self::Row;
}

/// A connection to the store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Perform a no-op round trip.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Open a transaction for a batch of `R` records.
    async fn begin<R: Record>(&self) -> Result<Box<dyn Transaction<R>>, StoreError>;
}

/// A single-batch insert transaction.
#[async_trait]
pub trait Transaction<R: Record>: Send {
    /// Prepare the insert statement for `R::TABLE`.
    async fn prepare(&mut self) -> Result<(), StoreError>;

    /// Execute the prepared statement for one row.
    async fn execute(&mut self, row: R::Row) -> Result<(), StoreError>;

    /// Commit every executed row.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Render the parameterized insert statement for `R`.
pub fn insert_statement<R: Record>() -> String {
    let placeholders = vec!["?"; R::COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        R::TABLE,
        R::COLUMNS.join(", "),
        placeholders
    )
}
