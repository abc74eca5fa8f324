//! Animation encoders.
//!
//! Encoders receive the complete, ordered frame list of a run and return one artifact.

/// Animated GIF output.
pub mod gif;
/// Encoder trait, options and the in-memory encoder.
pub mod sink;
