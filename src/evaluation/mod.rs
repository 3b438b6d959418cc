//! Batch evaluation of stream lists against a pattern configuration

pub mod batch;
pub mod pattern_set;

pub use batch::{BatchEvaluator, BatchReport, StreamEvaluation, StreamRecord};
pub use pattern_set::{FieldValidation, PatternSet};
