// crates/sqlrig-settings/src/lib.rs
// ============================================================================
// Module: sqlrig Settings Library
// Description: Session identity and session-scoped settings storage.
// Purpose: Supply named settings to provisioning with defaults fallback.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! This crate holds the opaque session identity used to scope configuration
//! lookups and a key/value settings store with per-session sections falling
//! back to process defaults. Loading from disk is strict and fail-closed:
//! size-capped, UTF-8 only, parse failures surface as typed errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod session;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use session::SessionKey;
pub use store::MAX_SETTINGS_FILE_SIZE;
pub use store::SessionSettings;
pub use store::SettingsError;
