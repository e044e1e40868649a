//! Curation layer: ties registries, tag parsing and outlier detection together
//!
//! # Modules
//!
//! - [`pipeline`]: Fetches tags per image and splits them, concurrently for batches
//! - [`registries`]: Creates the registry clients for a run from configuration
//! - [`report`]: Serializable per-image and per-run results

pub mod pipeline;
pub mod registries;
pub mod report;

pub use pipeline::{CurateError, CurationPolicy, curate_image, curate_images, split_tags};
pub use registries::create_registries;
pub use report::{CurationReport, ImageReport};
