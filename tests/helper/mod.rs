//! Shared test utilities

pub mod registry;

pub use registry::{MockRegistry, parse_tags};
