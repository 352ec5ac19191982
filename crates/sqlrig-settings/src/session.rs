// crates/sqlrig-settings/src/session.rs
// ============================================================================
// Module: Session Identity
// Description: Opaque identity scoping settings lookups.
// Purpose: Provide a strongly typed key for per-session configuration.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Defines the opaque session identity used to scope configuration lookups.
//! A session key is a strongly typed wrapper around a UTF-8 string with no
//! normalization or validation applied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

// ============================================================================
// SECTION: Session Key
// ============================================================================

/// Opaque identity scoping settings lookups for a logical test session.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey(String);

impl SessionKey {
    /// Creates a new session key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
