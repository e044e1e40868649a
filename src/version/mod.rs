//! Version layer for container image tags
//!
//! This module turns the raw tag list of an image into two ordered groups:
//! the established release line and the outliers that jump far ahead of it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│    Tags     │────▶│   Outlier   │
//! │ (fetch raw) │     │  (parse)    │     │   (split)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Registries  │     │   Semver    │
//! │ (hub, oci)  │     │(TagVersion) │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`outlier`]: Splits sorted versions at the first large major-version gap
//! - [`semver`]: Lenient tag parsing into [`semver::TagVersion`]
//! - [`tags`]: Separates semver tags from other tags
//! - [`registry`]: Registry trait for listing image tags
//! - [`registries`]: Concrete registry implementations (Docker Hub, OCI)
//! - [`error`]: Error types for parsing, splitting and registry operations
//! - [`types`]: Common types like `ImageRef` and `ImageTags`

pub mod error;
pub mod outlier;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod tags;
pub mod types;
