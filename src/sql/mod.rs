//! SQL utilities for the entity store
//!
//! Provides predicate building, statement generation, and identifier sanitization.

pub mod predicate;
pub mod sanitize;
pub mod statement;

pub use predicate::{Criteria, Predicate, build_predicate};
pub use sanitize::{SQLITE_RESERVED_WORDS, quote_identifier, validate_identifier};
pub use statement::Statement;
