// crates/sqlrig-pool/src/source.rs
// ============================================================================
// Module: Data Sources
// Description: Pooled and direct data sources plus the audit seam.
// Purpose: Expose connection acquisition and live pool statistics.
// Dependencies: r2d2, rusqlite, sqlrig-settings
// ============================================================================

//! ## Overview
//! A data source hands out connections; a pool-backed one also exposes live
//! pool statistics for the leak audit. The [`DataSource`] trait carries only
//! the introspection surface: `pool_status` returns `Some` for pool-backed
//! sources and `None` otherwise, which the auditor treats as a harness
//! misconfiguration rather than a pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use r2d2::Pool;
use r2d2::PooledConnection;
use rusqlite::Connection;
use sqlrig_settings::SessionKey;
use thiserror::Error;

use crate::manager::EmbeddedConnectionManager;
use crate::manager::open_embedded;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Busy timeout for directly opened connections (ms).
const DIRECT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Data source access errors.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// Connection checkout failed or timed out.
    #[error("connection checkout failed: {0}")]
    Checkout(String),
    /// Direct connection opening failed.
    #[error("connection open failed: {0}")]
    Open(String),
}

// ============================================================================
// SECTION: Pool Status
// ============================================================================

/// Live statistics for a pooled data source.
///
/// # Invariants
/// - `idle <= connections`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Total connections currently owned by the pool.
    pub connections: u32,
    /// Connections sitting idle in the pool.
    pub idle: u32,
}

impl PoolStatus {
    /// Returns the number of checked-out (active) connections.
    #[must_use]
    pub const fn active(self) -> u32 {
        self.connections.saturating_sub(self.idle)
    }
}

// ============================================================================
// SECTION: Data Source Trait
// ============================================================================

/// Introspection seam for the leak audit.
pub trait DataSource {
    /// Returns live pool statistics for pool-backed sources, `None` for
    /// sources that do not own a pool.
    fn pool_status(&self) -> Option<PoolStatus>;
}

// ============================================================================
// SECTION: Pooled Data Source
// ============================================================================

/// A live connection pool bound to a session identity.
///
/// # Invariants
/// - Owned by the caller for the duration of a test; the audit expects zero
///   active connections at teardown.
/// - Cloning shares the underlying pool.
#[derive(Clone, Debug)]
pub struct PooledDataSource {
    /// Session identity the pool is bound to.
    session: SessionKey,
    /// Underlying connection pool.
    pool: Pool<EmbeddedConnectionManager>,
}

impl PooledDataSource {
    /// Binds a pool to its session identity.
    pub(crate) const fn new(session: SessionKey, pool: Pool<EmbeddedConnectionManager>) -> Self {
        Self {
            session,
            pool,
        }
    }

    /// Borrows a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns [`DataSourceError::Checkout`] when the pool cannot supply a
    /// valid connection before the checkout timeout.
    pub fn connection(
        &self,
    ) -> Result<PooledConnection<EmbeddedConnectionManager>, DataSourceError> {
        self.pool.get().map_err(|err| DataSourceError::Checkout(err.to_string()))
    }

    /// Returns the session identity the pool is bound to.
    #[must_use]
    pub const fn session(&self) -> &SessionKey {
        &self.session
    }

    /// Returns a snapshot of the live pool statistics.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let state = self.pool.state();
        PoolStatus {
            connections: state.connections,
            idle: state.idle_connections,
        }
    }
}

impl DataSource for PooledDataSource {
    fn pool_status(&self) -> Option<PoolStatus> {
        Some(self.status())
    }
}

// ============================================================================
// SECTION: Direct Data Source
// ============================================================================

/// Unpooled data source opening one ad-hoc connection per call.
#[derive(Debug, Clone)]
pub struct DirectSource {
    /// Connection URI opened on each call.
    connection_url: String,
}

impl DirectSource {
    /// Creates a direct source for the given connection URI.
    #[must_use]
    pub fn new(connection_url: impl Into<String>) -> Self {
        Self {
            connection_url: connection_url.into(),
        }
    }

    /// Opens a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`DataSourceError::Open`] when the engine rejects the URI.
    pub fn connection(&self) -> Result<Connection, DataSourceError> {
        open_embedded(&self.connection_url, DIRECT_BUSY_TIMEOUT_MS)
            .map_err(|err| DataSourceError::Open(err.to_string()))
    }
}

impl DataSource for DirectSource {
    fn pool_status(&self) -> Option<PoolStatus> {
        None
    }
}
