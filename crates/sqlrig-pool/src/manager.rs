// crates/sqlrig-pool/src/manager.rs
// ============================================================================
// Module: Embedded Connection Manager
// Description: r2d2 connection manager for the embedded in-memory engine.
// Purpose: Open shared-cache connections and validate them on checkout.
// Dependencies: r2d2, rusqlite
// ============================================================================

//! ## Overview
//! The manager opens connections to a named shared-cache in-memory database
//! so every pooled connection sees the same schema and data. Checkout
//! validation runs a configurable health-check query; the provisioner uses
//! this to inject the query the embedded dialect can answer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use r2d2::ManageConnection;
use rusqlite::Connection;
use rusqlite::OpenFlags;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout applied to every new connection (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Health-check query used when none is configured.
const DEFAULT_TEST_QUERY: &str = "SELECT 1;";

// ============================================================================
// SECTION: Connection Opening
// ============================================================================

/// Opens a connection to the embedded engine with explicit flags.
///
/// The URI flag allows named in-memory databases; shared cache makes every
/// connection to the same URI see one database.
pub(crate) fn open_embedded(url: &str, busy_timeout_ms: u64) -> Result<Connection, rusqlite::Error> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_SHARED_CACHE;
    let connection = Connection::open_with_flags(url, flags)?;
    connection.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(connection)
}

// ============================================================================
// SECTION: Manager
// ============================================================================

/// `r2d2` connection manager for the embedded in-memory engine.
///
/// # Invariants
/// - Every connection targets the same shared-cache URI.
/// - Checkout validation runs the configured health-check query and fails
///   closed on any engine error.
#[derive(Debug, Clone)]
pub struct EmbeddedConnectionManager {
    /// Shared-cache connection URI.
    connection_url: String,
    /// Health-check query run on checkout, when configured.
    test_query: Option<String>,
    /// Busy timeout applied to every new connection (ms).
    busy_timeout_ms: u64,
}

impl EmbeddedConnectionManager {
    /// Creates a manager for the given connection URI.
    #[must_use]
    pub fn new(connection_url: impl Into<String>) -> Self {
        Self {
            connection_url: connection_url.into(),
            test_query: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Sets the health-check query run on checkout.
    #[must_use]
    pub fn with_test_query(mut self, query: impl Into<String>) -> Self {
        self.test_query = Some(query.into());
        self
    }

    /// Returns the connection URI.
    #[must_use]
    pub fn connection_url(&self) -> &str {
        &self.connection_url
    }
}

impl ManageConnection for EmbeddedConnectionManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    fn connect(&self) -> Result<Connection, rusqlite::Error> {
        open_embedded(&self.connection_url, self.busy_timeout_ms)
    }

    fn is_valid(&self, connection: &mut Connection) -> Result<(), rusqlite::Error> {
        match &self.test_query {
            Some(query) => connection.execute_batch(query),
            None => connection.execute_batch(DEFAULT_TEST_QUERY),
        }
    }

    fn has_broken(&self, _connection: &mut Connection) -> bool {
        false
    }
}
