// crates/sqlrig-fixture/src/loader.rs
// ============================================================================
// Module: Schema Loader
// Description: Resource reading, normalization, and statement execution.
// Purpose: Apply fixture scripts to the embedded engine per test.
// Dependencies: rusqlite, sqlrig-dialect
// ============================================================================

//! ## Overview
//! Scripts are read in full as one buffer, decoded as UTF-8, optionally
//! passed through a dialect normalizer, and executed as a single statement
//! batch. No transaction wrapping, no retry, no recovery: the caller owns
//! transactional semantics and sees every failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;
use sqlrig_dialect::DialectNormalizer;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fixture loading errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - All variants are fatal to the enclosing test; none are retried.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Script resource could not be read.
    #[error("fixture resource error: {0}")]
    Resource(String),
    /// Script bytes were not valid UTF-8.
    #[error("fixture encoding error: {0}")]
    Encoding(String),
    /// The engine rejected a statement.
    #[error("fixture database error: {0}")]
    Database(String),
    /// A table name was not a plain identifier.
    #[error("invalid table name `{0}`")]
    InvalidTableName(String),
}

// ============================================================================
// SECTION: Script Sources
// ============================================================================

/// Byte-stream provider for named SQL script resources.
pub trait SqlSource {
    /// Reads the named resource in full.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Resource`] when the resource cannot be read.
    fn read(&self, resource: &str) -> Result<Vec<u8>, FixtureError>;
}

/// Script source resolving resources relative to a base directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    /// Base directory holding the script files.
    base: PathBuf,
}

impl DirSource {
    /// Creates a source rooted at the given directory.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
        }
    }
}

impl SqlSource for DirSource {
    fn read(&self, resource: &str) -> Result<Vec<u8>, FixtureError> {
        fs::read(self.base.join(resource))
            .map_err(|err| FixtureError::Resource(format!("{resource}: {err}")))
    }
}

// ============================================================================
// SECTION: Loading Operations
// ============================================================================

/// Loads a script resource, optionally normalizes it, and executes it.
///
/// # Errors
///
/// Returns [`FixtureError::Resource`] when the resource is unreadable,
/// [`FixtureError::Encoding`] when it is not UTF-8, and
/// [`FixtureError::Database`] when the engine rejects the script.
pub fn load_sql(
    connection: &Connection,
    source: &dyn SqlSource,
    resource: &str,
    normalizer: Option<&DialectNormalizer>,
) -> Result<(), FixtureError> {
    let bytes = source.read(resource)?;
    let script = String::from_utf8(bytes)
        .map_err(|_| FixtureError::Encoding(format!("{resource} is not utf-8")))?;
    let script = match normalizer {
        Some(normalizer) => normalizer.normalize(&script),
        None => script,
    };
    connection
        .execute_batch(&script)
        .map_err(|err| FixtureError::Database(format!("{resource}: {err}")))
}

/// Drops a table when it exists; absent tables are not an error.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidTableName`] when the name is not a plain
/// identifier and [`FixtureError::Database`] when the engine rejects the
/// statement.
pub fn drop_table(connection: &Connection, table: &str) -> Result<(), FixtureError> {
    if !is_plain_identifier(table) {
        return Err(FixtureError::InvalidTableName(table.to_string()));
    }
    exec_sql(connection, &format!("DROP TABLE IF EXISTS {table}"))
}

/// Executes one arbitrary statement with no normalization.
///
/// # Errors
///
/// Returns [`FixtureError::Database`] when the engine rejects the statement.
pub fn exec_sql(connection: &Connection, sql: &str) -> Result<(), FixtureError> {
    connection.execute_batch(sql).map_err(|err| FixtureError::Database(err.to_string()))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns whether the name is a plain identifier safe to interpolate.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
