//! Curates the semantic-version tags of container images.
//!
//! The tags of an image are sorted and cut at the first pair of neighbours
//! whose major versions are three or more apart: the leading cluster is the
//! trusted release line, everything after the cut is an outlier.
//!
//! ```
//! use tag_curator::version::outlier::split_outliers;
//! use tag_curator::version::semver::parse_tag;
//!
//! let tags = ["1.0.0", "2.0.0", "43.0.0"].map(|t| parse_tag(t).unwrap());
//! let split = split_outliers(tags).unwrap();
//!
//! assert_eq!(split.remaining.len(), 2);
//! assert_eq!(split.outliers[0].original(), "43.0.0");
//! ```

pub mod config;
pub mod curator;
pub mod logging;
pub mod version;
