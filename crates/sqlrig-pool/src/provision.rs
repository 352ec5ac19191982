// crates/sqlrig-pool/src/provision.rs
// ============================================================================
// Module: Connection Provisioning
// Description: Pool factory, embedded defaults, and test data sources.
// Purpose: Build pooled data sources scoped to a session identity.
// Dependencies: r2d2, sqlrig-settings
// ============================================================================

//! ## Overview
//! Provisioning reads named settings (driver, URL, credentials, pool tuning)
//! for a session identity, builds an `r2d2` pool over the embedded engine,
//! and caches pools process-wide so repeated calls for the same identity and
//! URL share one pool. The test provisioner injects the health-check query
//! the embedded dialect can answer and collapses every underlying failure
//! into a single provisioning error kind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

use r2d2::Pool;
use sqlrig_settings::SessionKey;
use sqlrig_settings::SessionSettings;
use thiserror::Error;

use crate::manager::EmbeddedConnectionManager;
use crate::source::PooledDataSource;

// ============================================================================
// SECTION: Setting Names
// ============================================================================

/// Setting name for the connection driver.
pub const SETTING_CONNECTION_DRIVER: &str = "ConnectionDriver";
/// Setting name for the connection URL.
pub const SETTING_CONNECTION_URL: &str = "ConnectionUrl";
/// Setting name for the connection user.
pub const SETTING_CONNECTION_USER: &str = "ConnectionUser";
/// Setting name for the connection password.
pub const SETTING_CONNECTION_PASSWORD: &str = "ConnectionPassword";
/// Setting name for the pool health-check query.
pub const SETTING_POOL_TEST_QUERY: &str = "PoolTestQuery";
/// Setting name for the maximum pool size.
pub const SETTING_POOL_MAX_CONNECTIONS: &str = "PoolMaxConnections";
/// Setting name for the pool checkout timeout (ms).
pub const SETTING_POOL_CHECKOUT_TIMEOUT_MS: &str = "PoolCheckoutTimeoutMs";

// ============================================================================
// SECTION: Embedded Defaults
// ============================================================================

/// Driver name registered for the embedded engine.
pub const EMBEDDED_DRIVER: &str = "embedded-sqlite";
/// Default shared-cache in-memory connection URL.
pub const EMBEDDED_CONNECTION_URL: &str = "file:sqlrig?mode=memory&cache=shared";
/// Default user. The embedded engine has no authentication; the value is
/// recorded for parity with production settings surfaces.
pub const EMBEDDED_USER: &str = "sa";
/// Default password.
pub const EMBEDDED_PASSWORD: &str = "";
/// Health-check query for the embedded dialect. Always answerable, never
/// returns rows.
pub const EMBEDDED_POOL_TEST_QUERY: &str = "SELECT COUNT(1) FROM sqlite_master WHERE 1 = 0;";
/// Session identity under which test data sources are provisioned.
pub const TEST_SESSION_KEY: &str = "TEST";
/// Default maximum pool size when no setting is supplied.
const DEFAULT_POOL_MAX_CONNECTIONS: u32 = 8;
/// Default checkout timeout (ms) when no setting is supplied.
const DEFAULT_POOL_CHECKOUT_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Configuration Record
// ============================================================================

/// Immutable connection configuration for the embedded engine.
///
/// # Invariants
/// - Constructed once and passed explicitly; there is no ambient global
///   configuration state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedDbConfig {
    /// Connection driver name.
    pub driver: String,
    /// Connection URL.
    pub connection_url: String,
    /// Connection user.
    pub user: String,
    /// Connection password.
    pub password: String,
}

impl Default for EmbeddedDbConfig {
    fn default() -> Self {
        Self {
            driver: EMBEDDED_DRIVER.to_string(),
            connection_url: EMBEDDED_CONNECTION_URL.to_string(),
            user: EMBEDDED_USER.to_string(),
            password: EMBEDDED_PASSWORD.to_string(),
        }
    }
}

impl EmbeddedDbConfig {
    /// Returns the configuration with a different connection URL. Suites
    /// isolate from each other by naming distinct in-memory databases.
    #[must_use]
    pub fn with_connection_url(mut self, connection_url: impl Into<String>) -> Self {
        self.connection_url = connection_url.into();
        self
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pool factory errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum PoolFactoryError {
    /// The driver name is not registered for the embedded engine.
    #[error("unknown connection driver `{0}`")]
    UnknownDriver(String),
    /// A pool-related setting was missing or malformed.
    #[error("pool settings error: {0}")]
    Settings(String),
    /// Pool construction failed.
    #[error("pool construction failed: {0}")]
    Build(String),
    /// The process-wide pool registry is unavailable.
    #[error("pool registry unavailable: {0}")]
    Registry(String),
}

/// Provisioning failure raised at the test boundary.
///
/// Callers see this single kind with a message; the underlying settings or
/// pool error type never crosses the boundary.
#[derive(Debug, Error)]
#[error("unable to get or create pooled data source: {message}")]
pub struct ProvisionError {
    /// Human-readable provisioning failure detail.
    message: String,
}

impl ProvisionError {
    /// Wraps an underlying failure message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Pool Registry
// ============================================================================

/// Process-wide pool cache keyed by session identity and connection URL.
static POOL_REGISTRY: OnceLock<Mutex<BTreeMap<String, Pool<EmbeddedConnectionManager>>>> =
    OnceLock::new();

fn registry() -> &'static Mutex<BTreeMap<String, Pool<EmbeddedConnectionManager>>> {
    POOL_REGISTRY.get_or_init(|| Mutex::new(BTreeMap::new()))
}

// ============================================================================
// SECTION: Provisioning Operations
// ============================================================================

/// Writes the embedded-engine defaults into a settings store.
pub fn set_embedded_settings(settings: &mut SessionSettings, config: &EmbeddedDbConfig) {
    settings.set_default(SETTING_CONNECTION_DRIVER, config.driver.clone());
    settings.set_default(SETTING_CONNECTION_URL, config.connection_url.clone());
    settings.set_default(SETTING_CONNECTION_USER, config.user.clone());
    settings.set_default(SETTING_CONNECTION_PASSWORD, config.password.clone());
}

/// Returns the pooled data source for the session identity and URL,
/// creating and caching it on first use.
///
/// # Errors
///
/// Returns [`PoolFactoryError`] when the driver is unknown, a pool setting
/// is malformed, or pool construction fails.
pub fn get_or_create_pooled_data_source(
    settings: &SessionSettings,
    session: &SessionKey,
    config: &EmbeddedDbConfig,
) -> Result<PooledDataSource, PoolFactoryError> {
    if config.driver != EMBEDDED_DRIVER {
        return Err(PoolFactoryError::UnknownDriver(config.driver.clone()));
    }

    let registry_key = format!("{}|{}", session.as_str(), config.connection_url);
    let mut pools =
        registry().lock().map_err(|err| PoolFactoryError::Registry(err.to_string()))?;
    if let Some(pool) = pools.get(&registry_key) {
        return Ok(PooledDataSource::new(session.clone(), pool.clone()));
    }

    let max_connections = if settings.contains(session, SETTING_POOL_MAX_CONNECTIONS) {
        settings
            .get_u32(session, SETTING_POOL_MAX_CONNECTIONS)
            .map_err(|err| PoolFactoryError::Settings(err.to_string()))?
    } else {
        DEFAULT_POOL_MAX_CONNECTIONS
    };
    if max_connections == 0 {
        return Err(PoolFactoryError::Settings(
            "pool size must be greater than zero".to_string(),
        ));
    }
    let checkout_timeout_ms = if settings.contains(session, SETTING_POOL_CHECKOUT_TIMEOUT_MS) {
        settings
            .get_u64(session, SETTING_POOL_CHECKOUT_TIMEOUT_MS)
            .map_err(|err| PoolFactoryError::Settings(err.to_string()))?
    } else {
        DEFAULT_POOL_CHECKOUT_TIMEOUT_MS
    };

    let mut manager = EmbeddedConnectionManager::new(&config.connection_url);
    if let Some(query) = settings.find(session, SETTING_POOL_TEST_QUERY) {
        manager = manager.with_test_query(query);
    }

    let pool = Pool::builder()
        .max_size(max_connections)
        .connection_timeout(Duration::from_millis(checkout_timeout_ms))
        .build(manager)
        .map_err(|err| PoolFactoryError::Build(err.to_string()))?;
    pools.insert(registry_key, pool.clone());
    Ok(PooledDataSource::new(session.clone(), pool))
}

/// Provisions the pooled data source tests run against.
///
/// Builds the `TEST` session identity, injects the health-check query the
/// embedded dialect can answer, and delegates to the pool factory.
///
/// # Errors
///
/// Returns [`ProvisionError`] wrapping any underlying settings or pool
/// failure.
pub fn test_data_source(config: &EmbeddedDbConfig) -> Result<PooledDataSource, ProvisionError> {
    let session = SessionKey::new(TEST_SESSION_KEY);
    let mut settings = SessionSettings::new();
    // The pool's default liveness probe is not part of the embedded dialect;
    // checkout validation needs a query the engine can answer.
    settings.set(&session, SETTING_POOL_TEST_QUERY, EMBEDDED_POOL_TEST_QUERY);
    get_or_create_pooled_data_source(&settings, &session, config)
        .map_err(|err| ProvisionError::new(err.to_string()))
}
