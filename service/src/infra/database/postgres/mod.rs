//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;
mod search_pattern;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::NoTls;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use deadpool_postgres::Config;
pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
    search_pattern::SearchPattern,
};

/// Postgres [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`connection::Pool`].
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }

    /// Applies the provided [`refinery::Runner`] migrations on a dedicated
    /// [`Connection`].
    ///
    /// # Errors
    ///
    /// If failed to acquire a [`Connection`] or to apply the migrations.
    pub async fn migrate(
        &self,
        runner: &refinery::Runner,
    ) -> Result<refinery::Report, Traced<database::Error>> {
        let mut conn = self
            .0
            .pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        runner
            .run_async(&mut **conn)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Transaction has been committed already.
    #[display("Transaction is already committed")]
    Committed,

    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Stored coordinates are out of range.
    #[display("Invalid stored coordinates: ({latitude}, {longitude})")]
    #[from(ignore)]
    InvalidCoordinates {
        /// Stored latitude.
        latitude: f64,

        /// Stored longitude.
        longitude: f64,
    },

    /// `INSERT ... RETURNING` statement returned no row.
    #[display("Inserted row is not returned")]
    NotReturned,

    /// Error of applying migrations.
    #[display("Migration failed: {_0}")]
    Migration(refinery::Error),

    /// Error of creating a new [`connection::Pool`].
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),
}
