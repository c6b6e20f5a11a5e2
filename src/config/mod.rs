//! # relcore Configuration Module
//!
//! This module centralizes the tuning constants for relcore's indexes. The
//! tree order and hash bucket geometry are co-located so that their
//! relationships can be checked at compile time.
//!
//! ## Module Organization
//!
//! - [`constants`]: Index geometry and split thresholds

pub mod constants;
pub use constants::*;
