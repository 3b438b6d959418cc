//! Highlight segmentation
//!
//! Turns the match ranges of several independent extraction fields into one
//! lossless, non-overlapping partition of a stream name for rendering.

pub mod segments;

pub use segments::{build_segments, Segment};
