// crates/sqlrig-fixture/src/lib.rs
// ============================================================================
// Module: sqlrig Fixture Library
// Description: SQL schema fixture loading for integration tests.
// Purpose: Build and drop per-test schema from normalized fixture scripts.
// Dependencies: rusqlite, sqlrig-dialect
// ============================================================================

//! ## Overview
//! The schema loader reads a named SQL script resource in full, optionally
//! normalizes it into the embedded dialect, and executes it against a
//! connection. Failures propagate to the caller untouched: fixture scripts
//! are static, so a failure is deterministic and retrying cannot change the
//! outcome.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod loader;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use loader::DirSource;
pub use loader::FixtureError;
pub use loader::SqlSource;
pub use loader::drop_table;
pub use loader::exec_sql;
pub use loader::load_sql;
