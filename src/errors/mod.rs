//! Centralized error handling for the EPG matcher
//!
//! # Error Categories
//!
//! - **Pattern Errors**: empty patterns, regex compile failures, limit violations.
//!   Always captured into a validation result, never propagated.
//! - **Application Errors**: configuration and stream feed I/O, TOML and JSON parsing.
//!
//! # Usage
//!
//! ```rust
//! use epg_matcher::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("parallel_threshold must be set"))
//! }
//! assert!(matches!(example_function(), Err(AppError::Configuration { .. })));
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
