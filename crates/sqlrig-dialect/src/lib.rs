// crates/sqlrig-dialect/src/lib.rs
// ============================================================================
// Module: sqlrig Dialect Library
// Description: Textual SQL dialect normalization for test fixtures.
// Purpose: Convert portable DDL/DML scripts into the embedded engine dialect.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! This crate rewrites SQL fixture scripts written against a production
//! dialect into the dialect of the embedded in-memory test database. The
//! rewrite is textual pattern substitution over the whole script, never
//! semantic parsing: fixture scripts are static, known inputs, and the rules
//! are ordered so that table renaming runs after type rewriting.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod normalizer;
pub mod rules;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use normalizer::DialectNormalizer;
pub use rules::DialectError;
pub use rules::RewriteRule;
