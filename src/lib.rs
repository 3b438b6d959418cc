//! Stream-name pattern matching for EPG management
//!
//! Pattern configuration and raw stream names flow through
//! [`patterns`] (dialect translation, validation, range extraction), then
//! [`highlight`] for per-item display segments and [`classification`] for
//! batch-level include/exclude statistics. [`evaluation`] ties the stages
//! together over whole stream lists.

pub mod classification;
pub mod config;
pub mod errors;
pub mod evaluation;
pub mod highlight;
pub mod patterns;
