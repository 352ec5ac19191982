// crates/sqlrig-pool/tests/pool_provisioning.rs
// ============================================================================
// Module: Pool Provisioning Tests
// Description: Provisioning, pool caching, and settings failure paths.
// Purpose: Validate the factory contract and the provisioning boundary.
// ============================================================================

//! ## Overview
//! Provisioning tests isolate from each other by naming distinct in-memory
//! databases: the process-wide pool registry is keyed by session identity
//! and URL, so sharing a URL across tests would share a pool.

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

use sqlrig_pool::DataSourceError;
use sqlrig_pool::DirectSource;
use sqlrig_pool::EMBEDDED_DRIVER;
use sqlrig_pool::EMBEDDED_USER;
use sqlrig_pool::EmbeddedDbConfig;
use sqlrig_pool::PoolFactoryError;
use sqlrig_pool::SETTING_CONNECTION_DRIVER;
use sqlrig_pool::SETTING_CONNECTION_PASSWORD;
use sqlrig_pool::SETTING_CONNECTION_URL;
use sqlrig_pool::SETTING_CONNECTION_USER;
use sqlrig_pool::SETTING_POOL_CHECKOUT_TIMEOUT_MS;
use sqlrig_pool::SETTING_POOL_MAX_CONNECTIONS;
use sqlrig_pool::SETTING_POOL_TEST_QUERY;
use sqlrig_pool::TEST_SESSION_KEY;
use sqlrig_pool::get_or_create_pooled_data_source;
use sqlrig_pool::set_embedded_settings;
use sqlrig_pool::test_data_source;
use sqlrig_settings::SessionKey;
use sqlrig_settings::SessionSettings;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn config_for(database: &str) -> EmbeddedDbConfig {
    EmbeddedDbConfig::default()
        .with_connection_url(format!("file:{database}?mode=memory&cache=shared"))
}

// ============================================================================
// SECTION: Test Provisioning
// ============================================================================

#[test]
fn provisions_pooled_data_source_for_embedded_defaults() {
    let source = test_data_source(&config_for("provision_defaults")).expect("data source");
    assert_eq!(source.session().as_str(), TEST_SESSION_KEY);
    assert_eq!(source.status().active(), 0);
    let connection = source.connection().expect("connection");
    connection.execute_batch("CREATE TABLE provision_probe (id INT);").expect("create table");
}

#[test]
fn repeated_provisioning_shares_one_pool() {
    let config = config_for("provision_shared");
    let first = test_data_source(&config).expect("first data source");
    let second = test_data_source(&config).expect("second data source");
    let connection = first.connection().expect("connection");
    assert_eq!(second.status().active(), 1);
    drop(connection);
    assert_eq!(second.status().active(), 0);
}

#[test]
fn distinct_urls_use_distinct_pools() {
    let first = test_data_source(&config_for("provision_isolated_a")).expect("first");
    let second = test_data_source(&config_for("provision_isolated_b")).expect("second");
    let connection = first.connection().expect("connection");
    assert_eq!(first.status().active(), 1);
    assert_eq!(second.status().active(), 0);
    drop(connection);
}

#[test]
fn unknown_driver_is_a_provisioning_error() {
    let mut config = config_for("provision_unknown_driver");
    config.driver = "client-server".to_string();
    let error = test_data_source(&config).expect_err("unknown driver");
    assert!(error.to_string().contains("unknown connection driver"));
}

// ============================================================================
// SECTION: Factory Settings
// ============================================================================

#[test]
fn malformed_pool_size_is_a_settings_error() {
    let session = SessionKey::new("FACTORY_BAD_SIZE");
    let mut settings = SessionSettings::new();
    settings.set(&session, SETTING_POOL_MAX_CONNECTIONS, "plenty");
    let result =
        get_or_create_pooled_data_source(&settings, &session, &config_for("factory_bad_size"));
    assert!(matches!(result, Err(PoolFactoryError::Settings(_))));
}

#[test]
fn zero_pool_size_is_rejected() {
    let session = SessionKey::new("FACTORY_ZERO_SIZE");
    let mut settings = SessionSettings::new();
    settings.set(&session, SETTING_POOL_MAX_CONNECTIONS, "0");
    let error =
        get_or_create_pooled_data_source(&settings, &session, &config_for("factory_zero_size"))
            .expect_err("zero pool size");
    assert!(error.to_string().contains("greater than zero"));
}

#[test]
fn failing_health_query_blocks_checkout() {
    let session = SessionKey::new("FACTORY_UNHEALTHY");
    let mut settings = SessionSettings::new();
    settings.set(&session, SETTING_POOL_TEST_QUERY, "SELECT COUNT(1) FROM missing_probe;");
    settings.set(&session, SETTING_POOL_CHECKOUT_TIMEOUT_MS, "250");
    let source =
        get_or_create_pooled_data_source(&settings, &session, &config_for("factory_unhealthy"))
            .expect("pool construction succeeds");
    let error = source.connection().expect_err("checkout must fail validation");
    assert!(matches!(error, DataSourceError::Checkout(_)));
}

// ============================================================================
// SECTION: Defaults and Direct Access
// ============================================================================

#[test]
fn embedded_settings_are_written_as_defaults() {
    let mut settings = SessionSettings::new();
    let config = EmbeddedDbConfig::default();
    set_embedded_settings(&mut settings, &config);
    let session = SessionKey::new("ANY");
    assert_eq!(settings.get(&session, SETTING_CONNECTION_DRIVER).expect("driver"), EMBEDDED_DRIVER);
    assert_eq!(
        settings.get(&session, SETTING_CONNECTION_URL).expect("url"),
        config.connection_url
    );
    assert_eq!(settings.get(&session, SETTING_CONNECTION_USER).expect("user"), EMBEDDED_USER);
    assert_eq!(settings.get(&session, SETTING_CONNECTION_PASSWORD).expect("password"), "");
}

#[test]
fn direct_source_opens_ad_hoc_connections() {
    let source = DirectSource::new("file:direct_probe?mode=memory&cache=shared");
    let connection = source.connection().expect("connection");
    connection
        .execute_batch("CREATE TABLE direct_probe (id INT); INSERT INTO direct_probe VALUES (1);")
        .expect("statements execute");
}
