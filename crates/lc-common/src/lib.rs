//! lootcycle common types and errors.
//!
//! This crate provides foundational types shared across the lootcycle crates:
//! - The unified error type with stable codes
//! - Output format specifications

pub mod error;
pub mod output;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;

/// Schema version of JSON command output.
pub const SCHEMA_VERSION: &str = "1.0.0";
