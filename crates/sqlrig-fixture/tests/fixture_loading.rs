// crates/sqlrig-fixture/tests/fixture_loading.rs
// ============================================================================
// Module: Fixture Loading Tests
// Description: Script loading, normalization, and drop/exec behavior.
// Purpose: Validate the loader end to end against the embedded engine.
// ============================================================================

//! ## Overview
//! Loads on-disk fixture scripts through the normalizer into an in-memory
//! database and asserts the resulting schema, plus the failure paths for
//! unreadable, non-UTF-8, and malformed scripts.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;

use rusqlite::Connection;
use sqlrig_dialect::DialectNormalizer;
use sqlrig_fixture::DirSource;
use sqlrig_fixture::FixtureError;
use sqlrig_fixture::drop_table;
use sqlrig_fixture::exec_sql;
use sqlrig_fixture::load_sql;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn connection() -> Connection {
    Connection::open_in_memory().expect("in-memory connection")
}

fn source_with(script_name: &str, contents: &str) -> (TempDir, DirSource) {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(script_name), contents).expect("write script");
    let source = DirSource::new(dir.path());
    (dir, source)
}

fn table_exists(connection: &Connection, table: &str) -> bool {
    let count: i64 = connection
        .query_row(
            "SELECT COUNT(1) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .expect("catalog query");
    count == 1
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn loads_portable_script_through_normalizer() {
    let script = "USE production;\nCREATE TABLE sessions (id INT UNSIGNED AUTO_INCREMENT, data \
                  TEXT);";
    let (_dir, source) = source_with("sessions.sql", script);
    let connection = connection();
    let normalizer = DialectNormalizer::embedded(Some("session_table")).expect("profile");
    load_sql(&connection, &source, "sessions.sql", Some(&normalizer)).expect("load fixture");
    assert!(table_exists(&connection, "session_table"));
    exec_sql(&connection, "INSERT INTO session_table (id, data) VALUES (1, 'x');")
        .expect("insert row");
}

#[test]
fn loads_native_script_without_normalizer() {
    let (_dir, source) = source_with("plain.sql", "CREATE TABLE plain_probe (id INT);");
    let connection = connection();
    load_sql(&connection, &source, "plain.sql", None).expect("load fixture");
    assert!(table_exists(&connection, "plain_probe"));
}

#[test]
fn legacy_profile_drops_routing_columns_before_execution() {
    let script = "CREATE TABLE sessions (\n  beginstring VARCHAR(8) NOT NULL,\n  sendersubid \
                  VARCHAR(64),\n  outgoing_seqnum INT\n);";
    let (_dir, source) = source_with("legacy.sql", script);
    let connection = connection();
    let normalizer = DialectNormalizer::embedded_legacy(None).expect("profile");
    load_sql(&connection, &source, "legacy.sql", Some(&normalizer)).expect("load fixture");
    let error = exec_sql(
        &connection,
        "INSERT INTO sessions (sendersubid) VALUES ('gone');",
    )
    .expect_err("stripped column must not exist");
    assert!(matches!(error, FixtureError::Database(_)));
}

#[test]
fn missing_resource_is_a_resource_error() {
    let dir = TempDir::new().expect("tempdir");
    let source = DirSource::new(dir.path());
    let error = load_sql(&connection(), &source, "absent.sql", None).expect_err("missing script");
    assert!(matches!(error, FixtureError::Resource(_)));
    assert!(error.to_string().contains("absent.sql"));
}

#[test]
fn non_utf8_script_is_an_encoding_error() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("binary.sql"), [0xff_u8, 0xfe, 0x00]).expect("write script");
    let source = DirSource::new(dir.path());
    let error = load_sql(&connection(), &source, "binary.sql", None).expect_err("binary script");
    assert!(matches!(error, FixtureError::Encoding(_)));
}

#[test]
fn malformed_script_is_a_database_error() {
    let (_dir, source) = source_with("broken.sql", "CREATE TABLE ((((");
    let error = load_sql(&connection(), &source, "broken.sql", None).expect_err("broken script");
    assert!(matches!(error, FixtureError::Database(_)));
    assert!(error.to_string().contains("broken.sql"));
}

// ============================================================================
// SECTION: Drop and Exec
// ============================================================================

#[test]
fn drop_table_is_idempotent() {
    let connection = connection();
    drop_table(&connection, "never_created").expect("first drop");
    drop_table(&connection, "never_created").expect("second drop");
}

#[test]
fn drop_table_removes_an_existing_table() {
    let connection = connection();
    exec_sql(&connection, "CREATE TABLE doomed (id INT);").expect("create table");
    assert!(table_exists(&connection, "doomed"));
    drop_table(&connection, "doomed").expect("drop table");
    assert!(!table_exists(&connection, "doomed"));
}

#[test]
fn drop_table_rejects_non_identifier_names() {
    let error =
        drop_table(&connection(), "doomed; DROP TABLE other").expect_err("injection-shaped name");
    assert!(matches!(error, FixtureError::InvalidTableName(_)));
}

#[test]
fn exec_sql_runs_arbitrary_statements() {
    let connection = connection();
    exec_sql(&connection, "CREATE TABLE exec_probe (id INT); INSERT INTO exec_probe VALUES (7);")
        .expect("statements execute");
    let value: i64 = connection
        .query_row("SELECT id FROM exec_probe", [], |row| row.get(0))
        .expect("row present");
    assert_eq!(value, 7);
}
