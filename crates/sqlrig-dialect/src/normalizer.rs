// crates/sqlrig-dialect/src/normalizer.rs
// ============================================================================
// Module: Dialect Normalizer
// Description: Ordered rewrite pipelines for the embedded engine dialect.
// Purpose: Normalize portable fixture scripts before execution.
// Dependencies: crate::rules
// ============================================================================

//! ## Overview
//! A [`DialectNormalizer`] is an ordered list of rewrite rules. The embedded
//! profile carries the fixed portable-to-embedded rules; the legacy profile
//! is the same list with one extra rule appended that strips routing-column
//! definitions older fixture scripts still carry. Profiles are plain
//! configuration, not a type hierarchy.
//!
//! All rules are global, case-sensitive substitutions over the full script
//! text. A rule can match inside a string literal or comment; fixture
//! scripts are static, known inputs, so this is an accepted limitation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::rules::DialectError;
use crate::rules::RewriteRule;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Pattern removing `USE <database>;` statements. The embedded engine has no
/// database selection statement; the match runs to the last `;` on the line.
const USE_STATEMENT_PATTERN: &str = "USE .*;";
/// Pattern removing the unsigned integer modifier, leading space included.
const UNSIGNED_PATTERN: &str = " UNSIGNED";
/// Pattern matching portable auto-increment column syntax.
const AUTO_INCREMENT_PATTERN: &str = "AUTO_INCREMENT";
/// Embedded-dialect replacement for auto-increment columns.
const AUTO_INCREMENT_REPLACEMENT: &str = "IDENTITY";
/// Pattern matching the unbounded text column type.
const TEXT_PATTERN: &str = "TEXT";
/// Embedded-dialect replacement for the unbounded text type. The cap is
/// fixed: fixtures storing longer values truncate at execution time, not
/// at normalization time.
const TEXT_REPLACEMENT: &str = "VARCHAR(256)";
/// Statement prefixes subject to target-table renaming.
const TABLE_STATEMENT_PREFIXES: [&str; 3] = ["CREATE TABLE", "DROP TABLE", "DELETE FROM"];
/// Table names eligible for renaming: a single lowercase word. Mixed-case or
/// qualified names pass through unchanged.
const TABLE_NAME_PATTERN: &str = "[a-z]+";
/// Pattern stripping trailing legacy routing-column definitions
/// (sender/target sub-id or location-id), case-insensitive, through the
/// last comma on the line.
const LEGACY_ROUTING_COLUMN_PATTERN: &str = " *(?i:(sender|target)(subid|locid)).*,";

// ============================================================================
// SECTION: Normalizer
// ============================================================================

/// Ordered rewrite pipeline converting one SQL dialect into another.
///
/// # Invariants
/// - Rules apply in construction order; renaming runs after type rewriting.
/// - Application is pure text transformation: no I/O, no failure.
/// - Without a target table name, no table-name rules exist at all.
#[derive(Debug, Clone)]
pub struct DialectNormalizer {
    /// Rewrite rules in application order.
    rules: Vec<RewriteRule>,
}

impl DialectNormalizer {
    /// Builds the embedded-engine profile.
    ///
    /// When `target_table` is set, `CREATE TABLE`, `DROP TABLE`, and
    /// `DELETE FROM` statements naming a single lowercase word are rewritten
    /// to the target name.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError`] when a rule pattern fails to compile.
    pub fn embedded(target_table: Option<&str>) -> Result<Self, DialectError> {
        let mut rules = vec![
            RewriteRule::new(USE_STATEMENT_PATTERN, "")?,
            RewriteRule::new(UNSIGNED_PATTERN, "")?,
            RewriteRule::new(AUTO_INCREMENT_PATTERN, AUTO_INCREMENT_REPLACEMENT)?,
            RewriteRule::new(TEXT_PATTERN, TEXT_REPLACEMENT)?,
        ];
        if let Some(table) = target_table {
            for prefix in TABLE_STATEMENT_PREFIXES {
                rules.push(RewriteRule::new(
                    &format!("{prefix} {TABLE_NAME_PATTERN}"),
                    format!("{prefix} {table}"),
                )?);
            }
        }
        Ok(Self {
            rules,
        })
    }

    /// Builds the legacy profile: the embedded profile plus one rule that
    /// strips trailing routing-column definitions no longer part of the
    /// current schema. The extra rule runs strictly after the base rules.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError`] when a rule pattern fails to compile.
    pub fn embedded_legacy(target_table: Option<&str>) -> Result<Self, DialectError> {
        let mut normalizer = Self::embedded(target_table)?;
        normalizer.rules.push(RewriteRule::new(LEGACY_ROUTING_COLUMN_PATTERN, "")?);
        Ok(normalizer)
    }

    /// Builds a normalizer from an explicit rule list.
    #[must_use]
    pub const fn from_rules(rules: Vec<RewriteRule>) -> Self {
        Self {
            rules,
        }
    }

    /// Applies every rule in order and returns the normalized script.
    #[must_use]
    pub fn normalize(&self, sql: &str) -> String {
        let mut normalized = sql.to_string();
        for rule in &self.rules {
            normalized = rule.apply(&normalized);
        }
        normalized
    }

    /// Returns the rules in application order.
    #[must_use]
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }
}
