// crates/sqlrig-settings/src/store.rs
// ============================================================================
// Module: Session Settings Store
// Description: Session-scoped key/value settings with defaults fallback.
// Purpose: Supply named settings to connection provisioning.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Settings are opaque name/value pairs. A lookup first consults the
//! session's own section, then the process defaults, and fails closed when
//! neither holds the name. The on-disk form is TOML with a `[defaults]`
//! table and one `[session.<key>]` table per session.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::session::SessionKey;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum settings file size in bytes.
pub const MAX_SETTINGS_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Settings store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A required setting is absent for the session and the defaults.
    #[error("missing setting `{name}` for session `{session}`")]
    Missing {
        /// Session the lookup was scoped to.
        session: String,
        /// Name of the missing setting.
        name: String,
    },
    /// A setting value failed to parse as the requested type.
    #[error("invalid setting `{name}`: {message}")]
    Invalid {
        /// Name of the offending setting.
        name: String,
        /// Parse failure detail.
        message: String,
    },
    /// Settings file could not be read.
    #[error("settings io error: {0}")]
    Io(String),
    /// Settings file could not be parsed.
    #[error("settings parse error: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Settings Store
// ============================================================================

/// On-disk settings shape: defaults plus per-session sections.
#[derive(Debug, Deserialize)]
struct SettingsFile {
    /// Process-wide default settings.
    #[serde(default)]
    defaults: BTreeMap<String, String>,
    /// Per-session settings sections.
    #[serde(default)]
    session: BTreeMap<String, BTreeMap<String, String>>,
}

/// Session-scoped settings store with defaults fallback.
///
/// # Invariants
/// - Session entries shadow defaults; defaults shadow nothing.
/// - Lookups fail closed: no implicit empty values.
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    /// Process-wide default settings.
    defaults: BTreeMap<String, String>,
    /// Per-session settings maps.
    sessions: BTreeMap<SessionKey, BTreeMap<String, String>>,
}

impl SessionSettings {
    /// Creates an empty settings store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the file is unreadable, exceeds the
    /// size cap, is not UTF-8, or does not parse.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let bytes = fs::read(path).map_err(|err| SettingsError::Io(err.to_string()))?;
        if bytes.len() > MAX_SETTINGS_FILE_SIZE {
            return Err(SettingsError::Parse("settings file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| SettingsError::Parse("settings file must be utf-8".to_string()))?;
        let file: SettingsFile =
            toml::from_str(content).map_err(|err| SettingsError::Parse(err.to_string()))?;
        let mut settings = Self::new();
        settings.defaults = file.defaults;
        for (key, section) in file.session {
            settings.sessions.insert(SessionKey::new(key), section);
        }
        Ok(settings)
    }

    /// Sets a process-wide default setting.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.defaults.insert(name.into(), value.into());
    }

    /// Sets a setting scoped to one session.
    pub fn set(&mut self, session: &SessionKey, name: impl Into<String>, value: impl Into<String>) {
        self.sessions.entry(session.clone()).or_default().insert(name.into(), value.into());
    }

    /// Returns a setting for the session, falling back to the defaults.
    #[must_use]
    pub fn find(&self, session: &SessionKey, name: &str) -> Option<&str> {
        self.sessions
            .get(session)
            .and_then(|section| section.get(name))
            .or_else(|| self.defaults.get(name))
            .map(String::as_str)
    }

    /// Returns whether the session or the defaults hold the setting.
    #[must_use]
    pub fn contains(&self, session: &SessionKey, name: &str) -> bool {
        self.find(session, name).is_some()
    }

    /// Returns a required setting for the session.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when neither the session section
    /// nor the defaults hold the setting.
    pub fn get(&self, session: &SessionKey, name: &str) -> Result<&str, SettingsError> {
        self.find(session, name).ok_or_else(|| SettingsError::Missing {
            session: session.as_str().to_string(),
            name: name.to_string(),
        })
    }

    /// Returns a required setting parsed as `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when absent and
    /// [`SettingsError::Invalid`] when the value does not parse.
    pub fn get_u32(&self, session: &SessionKey, name: &str) -> Result<u32, SettingsError> {
        let value = self.get(session, name)?;
        value.parse().map_err(|_| SettingsError::Invalid {
            name: name.to_string(),
            message: format!("`{value}` is not an unsigned integer"),
        })
    }

    /// Returns a required setting parsed as `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when absent and
    /// [`SettingsError::Invalid`] when the value does not parse.
    pub fn get_u64(&self, session: &SessionKey, name: &str) -> Result<u64, SettingsError> {
        let value = self.get(session, name)?;
        value.parse().map_err(|_| SettingsError::Invalid {
            name: name.to_string(),
            message: format!("`{value}` is not an unsigned integer"),
        })
    }
}
