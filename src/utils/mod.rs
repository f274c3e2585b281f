//! Utilities
pub mod distributions;
pub mod iter;
pub mod stats;
