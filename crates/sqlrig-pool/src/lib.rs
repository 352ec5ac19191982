// crates/sqlrig-pool/src/lib.rs
// ============================================================================
// Module: sqlrig Pool Library
// Description: Pooled connection provisioning and leak auditing.
// Purpose: Hand tests a pooled embedded database and prove nothing leaked.
// Dependencies: r2d2, rusqlite, sqlrig-settings
// ============================================================================

//! ## Overview
//! This crate provisions pooled connections to the embedded in-memory test
//! database and audits the pool at teardown. The pool itself is `r2d2`; this
//! crate configures it (including the dialect-appropriate health-check
//! query), caches pools per session identity and URL, and reads live pool
//! statistics so a suite can assert that every borrowed connection was
//! returned.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod manager;
pub mod provision;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::LeakAuditError;
pub use audit::assert_no_active_connections;
pub use manager::EmbeddedConnectionManager;
pub use provision::EMBEDDED_CONNECTION_URL;
pub use provision::EMBEDDED_DRIVER;
pub use provision::EMBEDDED_PASSWORD;
pub use provision::EMBEDDED_POOL_TEST_QUERY;
pub use provision::EMBEDDED_USER;
pub use provision::EmbeddedDbConfig;
pub use provision::PoolFactoryError;
pub use provision::ProvisionError;
pub use provision::SETTING_CONNECTION_DRIVER;
pub use provision::SETTING_CONNECTION_PASSWORD;
pub use provision::SETTING_CONNECTION_URL;
pub use provision::SETTING_CONNECTION_USER;
pub use provision::SETTING_POOL_CHECKOUT_TIMEOUT_MS;
pub use provision::SETTING_POOL_MAX_CONNECTIONS;
pub use provision::SETTING_POOL_TEST_QUERY;
pub use provision::TEST_SESSION_KEY;
pub use provision::get_or_create_pooled_data_source;
pub use provision::set_embedded_settings;
pub use provision::test_data_source;
pub use source::DataSource;
pub use source::DataSourceError;
pub use source::DirectSource;
pub use source::PoolStatus;
pub use source::PooledDataSource;
