//! Input assembly: validation config and persisted board documents.

pub mod config;
pub mod loaders;
