//! Outlier detection over the semver tags of an image
//!
//! Sorts the tags ascending and cuts the sequence at the first pair of
//! neighbours whose major versions are far apart. Everything before the cut
//! is the established release line, everything after it is an outlier.

use std::fmt;

use tracing::trace;

use crate::version::error::SplitError;

/// Smallest major-version jump between neighbours that starts the outlier region
pub const DEFAULT_MIN_MAJOR_GAP: u64 = 3;

/// Access to the major component of a version value
pub trait MajorVersion {
    fn major(&self) -> u64;
}

impl<T: MajorVersion + ?Sized> MajorVersion for &T {
    fn major(&self) -> u64 {
        (**self).major()
    }
}

/// Versions partitioned into the trusted release line and the outliers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlierSplit<V> {
    /// Leading contiguous cluster, ascending
    pub remaining: Vec<V>,
    /// Everything after the first large gap, ascending
    pub outliers: Vec<V>,
}

impl<V> OutlierSplit<V> {
    /// Greatest version of the release line
    pub fn latest_remaining(&self) -> Option<&V> {
        self.remaining.last()
    }
}

/// Split versions using [`DEFAULT_MIN_MAJOR_GAP`]
pub fn split_outliers<V, I>(versions: I) -> Result<OutlierSplit<V>, SplitError>
where
    I: IntoIterator<Item = V>,
    V: MajorVersion + Ord + fmt::Display,
{
    split_outliers_with_gap(versions, DEFAULT_MIN_MAJOR_GAP)
}

/// Split versions at the first neighbour pair whose major versions differ by `min_gap` or more.
///
/// Only the first qualifying gap counts: once it is found every later
/// version is an outlier, however tightly those later versions cluster.
pub fn split_outliers_with_gap<V, I>(versions: I, min_gap: u64) -> Result<OutlierSplit<V>, SplitError>
where
    I: IntoIterator<Item = V>,
    V: MajorVersion + Ord + fmt::Display,
{
    if min_gap == 0 {
        return Err(SplitError::InvalidThreshold(min_gap));
    }

    let mut sorted: Vec<V> = versions.into_iter().collect();
    sorted.sort();

    let boundary = sorted
        .windows(2)
        .position(|pair| pair[1].major().saturating_sub(pair[0].major()) >= min_gap);

    let outliers = match boundary {
        Some(index) => {
            trace!(
                "Outlier boundary between {} and {}",
                sorted[index],
                sorted[index + 1]
            );
            sorted.split_off(index + 1)
        }
        None => Vec::new(),
    };

    Ok(OutlierSplit {
        remaining: sorted,
        outliers,
    })
}
