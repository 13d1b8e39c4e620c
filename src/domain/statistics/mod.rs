//! Statistical building blocks shared by the normalizer and the correlation builder.
//!
//! This module provides:
//! - Split-into-N partitioning of a sequence
//! - Population moments and z-scores with an explicit NaN policy
//! - Pearson correlation

pub mod partition;
pub mod stats;

pub use partition::SplitPartition;
pub use stats::{NanPolicy, Stats};
