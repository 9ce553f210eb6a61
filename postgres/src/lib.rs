//! `PostgreSQL` storage for the Turfbook booking marketplace.
//!
//! [`PostgresStore`] implements every trait from `turfbook-core` over one
//! connection pool. Multi-entity mutations (reserve, cancel, reschedule,
//! ledger movements) run inside a single transaction with `FOR UPDATE`
//! row locks on the contended rows, so two concurrent reservations of
//! the same slot have exactly one winner.
//!
//! # Example
//!
//! ```no_run
//! use turfbook_postgres::PostgresStore;
//!
//! # async fn example() -> turfbook_core::Result<()> {
//! let store = PostgresStore::connect("postgres://localhost/turfbook").await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use turfbook_core::error::{BookingError, Result};

mod audit;
mod coupons;
mod engine;
mod ledger;
mod players;
mod reports;
mod rows;
mod slots;
mod venues;

/// Map a driver error to the storage variant of the domain taxonomy.
pub(crate) fn storage(err: sqlx::Error) -> BookingError {
    BookingError::Storage(err.to_string())
}

/// `PostgreSQL`-backed implementation of the Turfbook stores and the
/// booking engine.
///
/// Cheap to clone; clones share the pool.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database with default pool settings.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Storage`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(storage)?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    /// The underlying pool, for health checks.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}
