// crates/sqlrig-pool/src/audit.rs
// ============================================================================
// Module: Pool Leak Audit
// Description: Teardown check that every borrowed connection was returned.
// Purpose: Catch connection leaks at the end of a test run.
// Dependencies: crate::source
// ============================================================================

//! ## Overview
//! The audit reads live pool statistics and fails when any connection is
//! still checked out. A data source that exposes no pool statistics is a
//! harness misconfiguration and fails the audit outright; it never passes
//! silently. Run the audit after teardown has returned every test-owned
//! connection and before the pool itself is closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::source::DataSource;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Leak audit failures.
///
/// # Invariants
/// - Every variant is a hard test failure; none may be downgraded.
#[derive(Debug, Error)]
pub enum LeakAuditError {
    /// The audited source does not expose pool statistics.
    #[error("data source is not pool-backed; the leak audit cannot run")]
    NotPooled,
    /// Connections were still checked out at audit time.
    #[error("{count} connection(s) are still checked out")]
    ActiveConnections {
        /// Number of connections still checked out.
        count: u32,
    },
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Asserts that the data source has zero active (checked-out) connections.
///
/// # Errors
///
/// Returns [`LeakAuditError::NotPooled`] when the source exposes no pool
/// statistics and [`LeakAuditError::ActiveConnections`] when any connection
/// is still checked out.
pub fn assert_no_active_connections(source: &dyn DataSource) -> Result<(), LeakAuditError> {
    let status = source.pool_status().ok_or(LeakAuditError::NotPooled)?;
    let active = status.active();
    if active > 0 {
        return Err(LeakAuditError::ActiveConnections {
            count: active,
        });
    }
    Ok(())
}
