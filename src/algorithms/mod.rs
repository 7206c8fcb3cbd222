//! Algorithmic kernel of the validator.
//!
//! # Components
//!
//! - [`usage`]: per-resource usage collection from the day's schedule
//! - [`overlap`]: union-find grouping of transitively overlapping usages

pub mod overlap;
pub mod usage;

pub use overlap::{group_overlapping, DisjointSet};
pub use usage::{collect_resource_usages, ResourceUsage};
