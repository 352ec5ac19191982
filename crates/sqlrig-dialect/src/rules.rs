// crates/sqlrig-dialect/src/rules.rs
// ============================================================================
// Module: Rewrite Rules
// Description: Single textual substitution rules over SQL script text.
// Purpose: Provide the ordered building block used by dialect normalizers.
// Dependencies: regex, thiserror
// ============================================================================

//! ## Overview
//! A [`RewriteRule`] is an ordered pair of compiled pattern and replacement
//! text, applied globally across a script. Replacement text is always
//! literal (`NoExpand`), so replacement strings containing `$` cannot be
//! misread as capture-group references. Rules are stateless; ordering is the
//! normalizer's responsibility.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::NoExpand;
use regex::Regex;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Dialect normalization errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Errors occur only at rule construction; rule application is total.
#[derive(Debug, Error)]
pub enum DialectError {
    /// A rewrite pattern failed to compile.
    #[error("invalid rewrite pattern `{pattern}`: {message}")]
    Pattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying compilation failure.
        message: String,
    },
}

// ============================================================================
// SECTION: Rewrite Rule
// ============================================================================

/// A single textual substitution applied across the whole script.
///
/// # Invariants
/// - Application never fails and never panics.
/// - The replacement is inserted literally; it is never expanded.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    /// Compiled match pattern.
    pattern: Regex,
    /// Literal replacement text.
    replacement: String,
}

impl RewriteRule {
    /// Compiles a rewrite rule from a pattern and literal replacement.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Pattern`] when the pattern does not compile.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, DialectError> {
        let compiled = Regex::new(pattern).map_err(|err| DialectError::Pattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.into(),
        })
    }

    /// Applies the rule to a script, replacing every match.
    #[must_use]
    pub fn apply(&self, sql: &str) -> String {
        self.pattern.replace_all(sql, NoExpand(&self.replacement)).into_owned()
    }

    /// Returns the source text of the match pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the literal replacement text.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}
