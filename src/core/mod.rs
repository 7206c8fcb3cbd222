//! Core domain models and shared lookup helpers.

pub mod domain;
pub mod lookup;
