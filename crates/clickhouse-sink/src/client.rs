//! [`Store`] implementation backed by the ClickHouse HTTP interface.

use crate::connect::ConnectionTarget;
use crate::error::{ConnectionError, StoreError};
use crate::store::{insert_statement, Record, Store, Transaction};
use async_trait::async_trait;
use clickhouse::insert::Insert;
use clickhouse::Client;
use std::time::Duration;

/// Connection to a ClickHouse server.
///
/// The underlying client is cheap to clone; every transaction holds its own
/// handle and releases it when the transaction is committed or dropped.
#[derive(Clone)]
pub struct ClickHouseStore {
    client: Client,
    target: ConnectionTarget,
}

impl ClickHouseStore {
    /// Open a store from a connection string (see [`ConnectionTarget::dsn`]).
    pub fn open(dsn: &str) -> Result<Self, ConnectionError> {
        let target = ConnectionTarget::from_dsn(dsn)?;
        Ok(Self::with_target(target))
    }

    /// Open a store for an already parsed target.
    pub fn with_target(target: ConnectionTarget) -> Self {
        let mut client = Client::default()
            .with_url(target.url())
            .with_user(target.username.clone())
            .with_password(target.password.clone());

        if !target.database.is_empty() {
            client = client.with_database(target.database.clone());
        }
        // Server-side socket timeouts, in seconds
        if !target.read_timeout.is_zero() {
            client = client.with_option("receive_timeout", target.read_timeout.as_secs().to_string());
        }
        if !target.write_timeout.is_zero() {
            client = client.with_option("send_timeout", target.write_timeout.as_secs().to_string());
        }

        tracing::debug!(
            "ClickHouse client configured for {} (database: '{}')",
            target.url(),
            target.database
        );

        Self { client, target }
    }

    /// The target this store connects to.
    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }
}

fn non_zero(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

#[async_trait]
impl Store for ClickHouseStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.client.query("SELECT 1").execute().await?;
        Ok(())
    }

    async fn begin<R: Record>(&self) -> Result<Box<dyn Transaction<R>>, StoreError> {
        Ok(Box::new(ClickHouseTransaction::<R> {
            client: self.client.clone(),
            send_timeout: non_zero(self.target.write_timeout),
            end_timeout: non_zero(self.target.read_timeout),
            debug: self.target.debug,
            insert: None,
            rows: 0,
        }))
    }
}

/// One RowBinary insert, streamed row by row and finished on commit.
struct ClickHouseTransaction<R: Record> {
    client: Client,
    send_timeout: Option<Duration>,
    end_timeout: Option<Duration>,
    debug: bool,
    insert: Option<Insert<R::Row>>,
    rows: usize,
}

#[async_trait]
impl<R: Record> Transaction<R> for ClickHouseTransaction<R> {
    async fn prepare(&mut self) -> Result<(), StoreError> {
        let insert = self
            .client
            .insert::<R::Row>(R::TABLE)?
            .with_timeouts(self.send_timeout, self.end_timeout);

        if self.debug {
            tracing::debug!("Prepared statement: {}", insert_statement::<R>());
        }
        self.insert = Some(insert);
        Ok(())
    }

    async fn execute(&mut self, row: R::Row) -> Result<(), StoreError> {
        let insert = self.insert.as_mut().ok_or(StoreError::NotPrepared)?;
        insert.write(&row).await?;
        self.rows += 1;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let ClickHouseTransaction {
            insert,
            debug,
            rows,
            ..
        } = *self;
        let insert = insert.ok_or(StoreError::NotPrepared)?;
        insert.end().await?;

        if debug {
            tracing::debug!("Committed {} rows into {}", rows, R::TABLE);
        }
        Ok(())
    }
}
